//! Element and selection stores.
//!
//! Selection lives apart from element data so that selecting an element
//! never touches its geometry or style.

use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All elements on the board, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, returning the element it replaced.
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id(), element)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    /// Elements sorted by ID, for deterministic output.
    pub fn ordered(&self) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.elements.values().collect();
        elements.sort_by_key(|e| e.id());
        elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Topmost element at a point (in board coordinates).
    ///
    /// Elements later in ID order win when several overlap.
    pub fn element_at_point(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.ordered()
            .into_iter()
            .rev()
            .find(|e| e.hit_test(point, tolerance))
            .map(Element::id)
    }

    /// Elements that intersect a rectangle.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.ordered()
            .into_iter()
            .filter(|e| e.intersects_rect(rect))
            .map(Element::id)
            .collect()
    }
}

/// Per-element interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: bool,
}

/// Interaction state for every element, keyed by element ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionStore {
    states: HashMap<ElementId, SelectionState>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element (unselected) if it is not tracked yet.
    pub fn track(&mut self, id: ElementId) {
        self.states.entry(id).or_default();
    }

    pub fn untrack(&mut self, id: ElementId) {
        self.states.remove(&id);
    }

    pub fn is_tracked(&self, id: ElementId) -> bool {
        self.states.contains_key(&id)
    }

    /// Get the state of an element.
    pub fn state(&self, id: ElementId) -> SelectionState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.state(id).selected
    }

    /// Set the selected flag of a tracked element. Returns false if the
    /// element is not tracked.
    pub fn set_selected(&mut self, id: ElementId, selected: bool) -> bool {
        match self.states.get_mut(&id) {
            Some(state) => {
                state.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Set the selected flag of one element. Unless `multi` is set, every
    /// other element is deselected first.
    pub fn set_current(&mut self, id: ElementId, selected: bool, multi: bool) -> bool {
        if !self.is_tracked(id) {
            return false;
        }
        if !multi {
            self.clear();
        }
        self.set_selected(id, selected)
    }

    /// Deselect every tracked element.
    pub fn clear(&mut self) {
        for state in self.states.values_mut() {
            state.selected = false;
        }
    }

    /// Select exactly the given elements.
    pub fn select_only(&mut self, ids: &[ElementId]) {
        for (id, state) in self.states.iter_mut() {
            state.selected = ids.contains(id);
        }
    }

    /// Selected element IDs, sorted.
    pub fn selected(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self
            .states
            .iter()
            .filter(|(_, state)| state.selected)
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    pub fn selected_count(&self) -> usize {
        self.states.values().filter(|state| state.selected).count()
    }

    /// Make the tracked set match the element store: every element gets an
    /// entry and entries for missing elements are dropped.
    pub fn reconcile(&mut self, elements: &ElementStore) {
        self.states.retain(|id, _| elements.contains(*id));
        for id in elements.ids() {
            self.track(id);
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
