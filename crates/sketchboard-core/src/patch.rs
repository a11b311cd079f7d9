//! Structural diff and patch over JSON trees.
//!
//! [`diff`] and [`apply`] are pure functions: `apply(&diff(a, b), a) == b`
//! for any pair of trees. Paths are JSON pointers (RFC 6901) and operations
//! follow the add/remove/replace subset of RFC 6902.

use crate::error::PatchApplyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single path-addressed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
}

impl PatchOp {
    pub fn path(&self) -> &str {
        match self {
            PatchOp::Add { path, .. } | PatchOp::Remove { path } | PatchOp::Replace { path, .. } => {
                path
            }
        }
    }
}

/// An ordered list of operations transforming one tree into another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Vec<PatchOp>);

impl Patch {
    pub fn new(ops: Vec<PatchOp>) -> Self {
        Self(ops)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.0
    }
}

/// Compute the patch that turns `from` into `to`.
///
/// Objects are diffed key by key. Arrays of equal length are diffed element
/// by element; arrays whose length changed are replaced whole.
pub fn diff(from: &Value, to: &Value) -> Patch {
    let mut ops = Vec::new();
    diff_into(from, to, "", &mut ops);
    Patch(ops)
}

fn diff_into(from: &Value, to: &Value, path: &str, ops: &mut Vec<PatchOp>) {
    if from == to {
        return;
    }
    match (from, to) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, old_value) in old {
                let child = push_token(path, key);
                match new.get(key) {
                    Some(new_value) => diff_into(old_value, new_value, &child, ops),
                    None => ops.push(PatchOp::Remove { path: child }),
                }
            }
            for (key, new_value) in new {
                if !old.contains_key(key) {
                    ops.push(PatchOp::Add {
                        path: push_token(path, key),
                        value: new_value.clone(),
                    });
                }
            }
        }
        (Value::Array(old), Value::Array(new)) if old.len() == new.len() => {
            for (index, (old_value, new_value)) in old.iter().zip(new).enumerate() {
                diff_into(old_value, new_value, &push_token(path, &index.to_string()), ops);
            }
        }
        _ => ops.push(PatchOp::Replace {
            path: path.to_string(),
            value: to.clone(),
        }),
    }
}

/// Apply `patch` to a copy of `target`.
///
/// Fails without touching `target` if any operation addresses a path that
/// does not exist.
pub fn apply(patch: &Patch, target: &Value) -> Result<Value, PatchApplyError> {
    let mut doc = target.clone();
    for op in patch.ops() {
        apply_op(&mut doc, op)?;
    }
    Ok(doc)
}

fn apply_op(doc: &mut Value, op: &PatchOp) -> Result<(), PatchApplyError> {
    match op {
        PatchOp::Replace { path, value } => {
            let slot = resolve_mut(doc, path)?;
            *slot = value.clone();
        }
        PatchOp::Remove { path } => {
            let (parent, key) = parent_mut(doc, path)?;
            match parent {
                Value::Object(map) => {
                    map.remove(&key)
                        .ok_or_else(|| PatchApplyError::PathNotFound(path.clone()))?;
                }
                Value::Array(items) => {
                    let index = array_index(&key, path)?;
                    if index >= items.len() {
                        return Err(PatchApplyError::PathNotFound(path.clone()));
                    }
                    items.remove(index);
                }
                _ => return Err(PatchApplyError::NotAContainer(path.clone())),
            }
        }
        PatchOp::Add { path, value } => {
            if path.is_empty() {
                *doc = value.clone();
                return Ok(());
            }
            let (parent, key) = parent_mut(doc, path)?;
            match parent {
                Value::Object(map) => {
                    map.insert(key, value.clone());
                }
                Value::Array(items) => {
                    let index = if key == "-" {
                        items.len()
                    } else {
                        array_index(&key, path)?
                    };
                    if index > items.len() {
                        return Err(PatchApplyError::PathNotFound(path.clone()));
                    }
                    items.insert(index, value.clone());
                }
                _ => return Err(PatchApplyError::NotAContainer(path.clone())),
            }
        }
    }
    Ok(())
}

fn resolve_mut<'a>(doc: &'a mut Value, path: &str) -> Result<&'a mut Value, PatchApplyError> {
    let mut current = doc;
    for token in split_pointer(path)? {
        current = match current {
            Value::Object(map) => map.get_mut(&token),
            Value::Array(items) => items.get_mut(array_index(&token, path)?),
            _ => None,
        }
        .ok_or_else(|| PatchApplyError::PathNotFound(path.to_string()))?;
    }
    Ok(current)
}

fn parent_mut<'a>(
    doc: &'a mut Value,
    path: &str,
) -> Result<(&'a mut Value, String), PatchApplyError> {
    let mut tokens = split_pointer(path)?;
    let key = tokens
        .pop()
        .ok_or_else(|| PatchApplyError::PathNotFound(path.to_string()))?;
    let mut parent = doc;
    for token in tokens {
        parent = match parent {
            Value::Object(map) => map.get_mut(&token),
            Value::Array(items) => items.get_mut(array_index(&token, path)?),
            _ => None,
        }
        .ok_or_else(|| PatchApplyError::PathNotFound(path.to_string()))?;
    }
    Ok((parent, key))
}

fn array_index(token: &str, path: &str) -> Result<usize, PatchApplyError> {
    if token.len() > 1 && token.starts_with('0') {
        return Err(PatchApplyError::BadIndex(path.to_string()));
    }
    token
        .parse()
        .map_err(|_| PatchApplyError::BadIndex(path.to_string()))
}

/// Append an escaped reference token to a JSON pointer.
fn push_token(path: &str, token: &str) -> String {
    format!("{}/{}", path, token.replace('~', "~0").replace('/', "~1"))
}

/// Split a JSON pointer into unescaped reference tokens.
fn split_pointer(path: &str) -> Result<Vec<String>, PatchApplyError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PatchApplyError::PathNotFound(path.to_string()));
    };
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}
