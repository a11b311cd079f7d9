//! Snapshot/diff undo-redo engine.
//!
//! The engine never records commands. After every committed transition it is
//! handed the combined snapshot before and after, diffs them both ways and
//! keeps the resulting patch pair. Undo applies the inverse patch, redo
//! re-applies the forward patch.
//!
//! Gestures are grouped with batching: while a batch is open, commits are
//! applied live but not recorded, and closing the outermost batch records a
//! single entry from the baseline captured at open time.

use crate::error::{BoardError, BoardResult, PatchApplyError};
use crate::patch::{self, Patch};
use log::{debug, warn};
use serde_json::Value;
use std::collections::VecDeque;

/// Default maximum number of undo entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// How a committed transition relates to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A user edit: recorded, and clears the redo stack.
    Edit,
    /// Result of replaying an undo patch: never recorded.
    Undo,
    /// Result of replaying a redo patch: re-enters the undo stack without
    /// clearing the remaining redo entries.
    Redo,
    /// A step inside an open batch: recorded when the batch closes.
    Batched,
}

/// Undo, forward and redo patch stacks.
#[derive(Debug, Clone)]
pub struct History {
    /// Inverse patches (old <- new), oldest first.
    undo: VecDeque<Patch>,
    /// Forward patches (new <- old), parallel to `undo`.
    updates: VecDeque<Patch>,
    redo: Vec<Patch>,
    /// Maximum undo depth; 0 means unbounded.
    limit: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured when the outermost batch opened.
    batch_baseline: Option<Value>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            updates: VecDeque::new(),
            redo: Vec::new(),
            limit,
            batch_depth: 0,
            batch_baseline: None,
        }
    }

    /// Whether a commit of this kind needs before/after snapshots.
    pub fn records(&self, transition: Transition) -> bool {
        match transition {
            Transition::Edit | Transition::Redo => !self.is_batching(),
            Transition::Undo | Transition::Batched => false,
        }
    }

    /// Observe a committed transition. Returns true if an entry was recorded.
    ///
    /// Edits made while a batch is open are deferred to [`History::end_batch`].
    pub fn observe(
        &mut self,
        previous: &Value,
        current: &Value,
        transition: Transition,
    ) -> BoardResult<bool> {
        if !self.records(transition) {
            return Ok(false);
        }

        let forward = patch::diff(previous, current);
        let inverse = patch::diff(current, previous);
        if forward.is_empty() || inverse.is_empty() {
            return Ok(false);
        }

        self.push(forward, inverse);
        if transition == Transition::Edit {
            self.redo.clear();
        }
        debug!(
            "Recorded {:?} history entry (undo depth {})",
            transition,
            self.undo.len()
        );
        self.check_balance()?;
        Ok(true)
    }

    fn push(&mut self, forward: Patch, inverse: Patch) {
        self.undo.push_back(inverse);
        self.updates.push_back(forward);
        if self.limit > 0 && self.undo.len() > self.limit {
            self.undo.pop_front();
            self.updates.pop_front();
        }
    }

    /// Pop the last entry, apply its inverse patch to `current` and decode
    /// the result with `decode`.
    ///
    /// Returns `Ok(None)` when there is nothing to undo or a batch is open.
    /// An entry whose patch no longer applies, or whose result does not
    /// decode, is discarded and reported as [`BoardError::PatchApply`]; the
    /// caller keeps its state. The forward patch only moves to the redo
    /// stack once the restored snapshot decoded.
    pub fn undo<T, F>(&mut self, current: &Value, decode: F) -> BoardResult<Option<T>>
    where
        F: FnOnce(Value) -> Result<T, PatchApplyError>,
    {
        if self.is_batching() {
            debug!("Ignoring undo while a gesture is in progress");
            return Ok(None);
        }
        let (Some(inverse), Some(forward)) = (self.undo.pop_back(), self.updates.pop_back())
        else {
            self.check_balance()?;
            return Ok(None);
        };

        match patch::apply(&inverse, current).and_then(decode) {
            Ok(restored) => {
                self.redo.push(forward);
                Ok(Some(restored))
            }
            Err(err) => {
                warn!("Discarding undo entry that no longer applies: {err}");
                Err(err.into())
            }
        }
    }

    /// Pop the last redo entry, apply it to `current` and decode the result.
    ///
    /// The caller commits the result as [`Transition::Redo`] so it becomes
    /// undoable again.
    pub fn redo<T, F>(&mut self, current: &Value, decode: F) -> BoardResult<Option<T>>
    where
        F: FnOnce(Value) -> Result<T, PatchApplyError>,
    {
        if self.is_batching() {
            debug!("Ignoring redo while a gesture is in progress");
            return Ok(None);
        }
        let Some(forward) = self.redo.pop() else {
            return Ok(None);
        };

        match patch::apply(&forward, current).and_then(decode) {
            Ok(restored) => Ok(Some(restored)),
            Err(err) => {
                warn!("Discarding redo entry that no longer applies: {err}");
                Err(err.into())
            }
        }
    }

    /// Open a batch. Only the outermost call captures `current`.
    pub fn begin_batch(&mut self, current: &Value) {
        if self.batch_depth == 0 {
            self.batch_baseline = Some(current.clone());
        }
        self.batch_depth += 1;
    }

    /// Close a batch. When the outermost batch closes, the whole batch is
    /// recorded as one edit. Returns true if an entry was recorded.
    pub fn end_batch(&mut self, current: &Value) -> BoardResult<bool> {
        if self.batch_depth == 0 {
            return Ok(false);
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return Ok(false);
        }
        match self.batch_baseline.take() {
            Some(baseline) => self.observe(&baseline, current, Transition::Edit),
            None => Ok(false),
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn undo_is_possible(&self) -> bool {
        !self.undo.is_empty() && !self.is_batching()
    }

    pub fn redo_is_possible(&self) -> bool {
        !self.redo.is_empty() && !self.is_batching()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn updates_len(&self) -> usize {
        self.updates.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Maximum undo depth; 0 means unbounded.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The undo and forward stacks must always have the same length.
    pub fn check_balance(&self) -> BoardResult<()> {
        debug_assert_eq!(self.undo.len(), self.updates.len());
        if self.undo.len() != self.updates.len() {
            return Err(BoardError::InvariantViolation(format!(
                "undo stack has {} entries but updates stack has {}",
                self.undo.len(),
                self.updates.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(x: f64) -> Value {
        json!({"elements": {"a": {"styles": {"x": x}}}, "selection_state": {"a": {"selected": false}}})
    }

    #[test]
    fn test_edit_records_pair_and_clears_redo() {
        let mut history = History::default();
        assert!(history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap());
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.updates_len(), 1);

        let restored = history.undo(&tree(1.0), Ok).unwrap().unwrap();
        assert_eq!(restored, tree(0.0));
        assert!(history.redo_is_possible());

        history.observe(&tree(0.0), &tree(5.0), Transition::Edit).unwrap();
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_noop_transition_not_recorded() {
        let mut history = History::default();
        assert!(!history.observe(&tree(1.0), &tree(1.0), Transition::Edit).unwrap());
        assert!(!history.undo_is_possible());
    }

    #[test]
    fn test_undo_transition_not_recorded() {
        let mut history = History::default();
        assert!(!history.observe(&tree(0.0), &tree(1.0), Transition::Undo).unwrap());
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn test_redo_reenters_undo_without_clearing_redo() {
        let mut history = History::default();
        history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap();
        history.observe(&tree(1.0), &tree(2.0), Transition::Edit).unwrap();
        history.undo(&tree(2.0), Ok).unwrap();
        history.undo(&tree(1.0), Ok).unwrap();
        assert_eq!(history.redo_len(), 2);

        let redone = history.redo(&tree(0.0), Ok).unwrap().unwrap();
        assert_eq!(redone, tree(1.0));
        history.observe(&tree(0.0), &redone, Transition::Redo).unwrap();
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::default();
        assert_eq!(history.undo(&tree(0.0), Ok).unwrap(), None);
        assert_eq!(history.redo(&tree(0.0), Ok).unwrap(), None);
    }

    #[test]
    fn test_stale_patch_is_discarded() {
        let mut history = History::default();
        history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap();

        let stale = json!({"elements": {}, "selection_state": {}});
        let err = history.undo(&stale, Ok).unwrap_err();
        assert!(matches!(err, BoardError::PatchApply(_)));
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.updates_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undecodable_undo_is_discarded() {
        let mut history = History::default();
        history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap();
        history.observe(&tree(1.0), &tree(2.0), Transition::Edit).unwrap();

        let err = history
            .undo(&tree(2.0), |_| -> Result<Value, PatchApplyError> {
                Err(PatchApplyError::Malformed("bad snapshot".into()))
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::PatchApply(PatchApplyError::Malformed(_))
        ));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.updates_len(), 1);
        assert_eq!(history.redo_len(), 0);

        // The older entry is untouched
        assert_eq!(history.undo(&tree(2.0), Ok).unwrap(), Some(tree(0.0)));
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_undecodable_redo_is_discarded() {
        let mut history = History::default();
        history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap();
        history.undo(&tree(1.0), Ok).unwrap();

        let result: BoardResult<Option<Value>> = history.redo(&tree(0.0), |_| {
            Err(PatchApplyError::Malformed("bad snapshot".into()))
        });
        assert!(result.is_err());
        assert!(!history.redo_is_possible());
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn test_batch_records_single_entry() {
        let mut history = History::default();
        history.begin_batch(&tree(0.0));
        assert!(!history.observe(&tree(0.0), &tree(1.0), Transition::Edit).unwrap());
        assert!(!history.observe(&tree(1.0), &tree(2.0), Transition::Batched).unwrap());
        assert_eq!(history.undo(&tree(2.0), Ok).unwrap(), None);

        assert!(history.end_batch(&tree(2.0)).unwrap());
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo(&tree(2.0), Ok).unwrap(), Some(tree(0.0)));
    }

    #[test]
    fn test_nested_batch_records_on_outermost_close() {
        let mut history = History::default();
        history.begin_batch(&tree(0.0));
        history.begin_batch(&tree(1.0));
        assert!(!history.end_batch(&tree(2.0)).unwrap());
        assert!(history.is_batching());
        assert!(history.end_batch(&tree(3.0)).unwrap());
        assert_eq!(history.undo(&tree(3.0), Ok).unwrap(), Some(tree(0.0)));
    }

    #[test]
    fn test_unchanged_batch_records_nothing() {
        let mut history = History::default();
        history.begin_batch(&tree(4.0));
        assert!(!history.end_batch(&tree(4.0)).unwrap());
        assert!(!history.end_batch(&tree(4.0)).unwrap());
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn test_limit_drops_oldest_pair() {
        let mut history = History::new(2);
        for step in 0..4 {
            let from = tree(f64::from(step));
            let to = tree(f64::from(step + 1));
            history.observe(&from, &to, Transition::Edit).unwrap();
        }
        assert_eq!(history.limit(), 2);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.updates_len(), 2);
        assert_eq!(history.undo(&tree(4.0), Ok).unwrap(), Some(tree(3.0)));
        assert_eq!(history.undo(&tree(3.0), Ok).unwrap(), Some(tree(2.0)));
        assert_eq!(history.undo(&tree(2.0), Ok).unwrap(), None);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut history = History::new(0);
        for step in 0..150 {
            let from = tree(f64::from(step));
            let to = tree(f64::from(step + 1));
            history.observe(&from, &to, Transition::Edit).unwrap();
        }
        assert_eq!(history.limit(), 0);
        assert_eq!(history.undo_len(), 150);
    }
}
