//! Board controller: the single owner and writer of board state.
//!
//! Every operation builds the next [`BoardState`] on a copy and swaps it in
//! only when the whole operation succeeded, then hands the before/after
//! snapshots to the history engine.

use crate::config::BoardConfig;
use crate::drag;
use crate::elements::{Element, ElementId, ElementKind, ElementProperty, PropertyValue};
use crate::error::{BoardResult, ValidationError};
use crate::frame::{FrameElement, RenderFrame};
use crate::history::{History, Transition};
use crate::input::{InputEvent, KeyEvent, PointerEvent, WheelEvent};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::state::{BoardState, CombinedSnapshot};
use crate::store::{ElementStore, SelectionStore};
use crate::tools::{self, DragHandlers, ToolKind};
use crate::update::BoardUpdate;
use crate::viewport::Viewport;
use kurbo::{Rect, Size, Vec2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Payload of a finished text edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUpdate {
    pub id: ElementId,
    pub text: String,
    /// Font size as typed, before zoom scaling.
    pub font_size: f64,
}

/// The interactive board.
#[derive(Debug)]
pub struct Board {
    state: BoardState,
    handlers: DragHandlers,
    history: History,
    config: BoardConfig,
    /// A text edit opened a history batch that is still open.
    text_session: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    /// Create an empty board with the pan tool active.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            state: BoardState::new(config.initial_viewport()),
            handlers: DragHandlers::new(),
            history: History::new(config.history_limit),
            config,
            text_session: false,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn handlers(&self) -> &DragHandlers {
        &self.handlers
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn elements(&self) -> &ElementStore {
        &self.state.elements
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.state.selection
    }

    /// Look up an element by its stable ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.state.elements.get(id)
    }

    pub fn tool(&self) -> ToolKind {
        self.state.tool
    }

    pub fn is_dragging(&self) -> bool {
        self.state.session.dragging
    }

    /// Copy of the element being text-edited, as it was before the edit.
    pub fn text_editor(&self) -> Option<&Element> {
        self.state.text_editor.as_ref()
    }

    pub fn undo_is_possible(&self) -> bool {
        self.history.undo_is_possible()
    }

    pub fn redo_is_possible(&self) -> bool {
        self.history.redo_is_possible()
    }

    /// Run `mutate` on a copy of the state and swap it in on success.
    fn commit<F>(&mut self, transition: Transition, mutate: F) -> BoardResult<()>
    where
        F: FnOnce(&mut BoardState) -> BoardResult<()>,
    {
        let mut next = self.state.clone();
        mutate(&mut next)?;
        next.selection.reconcile(&next.elements);

        if self.history.records(transition) {
            let previous = self.state.snapshot_value()?;
            let current = next.snapshot_value()?;
            self.history.observe(&previous, &current, transition)?;
        }
        self.state = next;
        Ok(())
    }

    /// Commit a partial update produced by the drag pipeline.
    fn apply_update(&mut self, update: BoardUpdate) -> BoardResult<()> {
        if update.touches_snapshot() {
            return self.commit(Transition::Batched, |state| {
                update.apply_to(state);
                Ok(())
            });
        }
        // View and session fields only: nothing to diff
        update.apply_to(&mut self.state);
        Ok(())
    }

    // --- Viewport ---

    /// Zoom one step at the cursor, keeping the point under it fixed.
    pub fn zoom(&mut self, event: &WheelEvent) -> BoardResult<()> {
        ensure_finite(event.is_finite(), "wheel event")?;
        self.state.viewport = self.state.viewport.zoomed(event);
        debug!("Zoom level {}", self.state.viewport.zoom_level);
        Ok(())
    }

    /// Pan by a screen-space movement.
    pub fn pan_by(&mut self, movement: Vec2) -> BoardResult<()> {
        ensure_finite(movement.is_finite(), "pan movement")?;
        self.state.viewport = self.state.viewport.panned(movement);
        Ok(())
    }

    /// Center the view on an element without changing the zoom level.
    pub fn center_on_element(&mut self, id: ElementId, screen_size: Size) -> BoardResult<()> {
        ensure_finite(screen_size.is_finite(), "screen size")?;
        let bounds = self
            .state
            .elements
            .get(id)
            .map(Element::bounds)
            .ok_or(ValidationError::UnknownElement(id))?;
        self.state.viewport = self.state.viewport.centered_on(bounds, screen_size);
        Ok(())
    }

    // --- Tools ---

    /// Mark a tool as active. Installed drag handlers are left alone.
    pub fn select_tool(&mut self, tool: ToolKind) {
        if self.state.tool != tool {
            debug!("Tool changed: {} -> {}", self.state.tool, tool);
        }
        self.state.tool = tool;
    }

    /// Replace all three drag handler slots.
    pub fn set_drag_handlers(&mut self, handlers: DragHandlers) {
        debug!("Installing drag handlers {handlers:?}");
        self.handlers = handlers;
    }

    /// Select a tool and install its built-in handlers.
    pub fn activate_tool(&mut self, tool: ToolKind) {
        self.select_tool(tool);
        self.set_drag_handlers(tools::handlers_for(tool, self.config.tool_defaults()));
    }

    // --- Pointer gestures ---

    /// Start a drag gesture. The whole gesture becomes one history entry.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> BoardResult<()> {
        ensure_finite(event.is_finite(), "pointer event")?;
        if !self.state.session.dragging {
            self.history.begin_batch(&self.state.snapshot_value()?);
        }
        let update = drag::drag_start(&self.handlers, event, &self.state);
        self.apply_update(update)
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> BoardResult<()> {
        ensure_finite(event.is_finite(), "pointer event")?;
        match drag::drag_move(&self.handlers, event, &self.state) {
            Some(update) => self.apply_update(update),
            None => Ok(()),
        }
    }

    /// Finish a drag gesture and record it.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> BoardResult<()> {
        ensure_finite(event.is_finite(), "pointer event")?;
        let was_dragging = self.state.session.dragging;
        let update = drag::drag_end(&self.handlers, event, &self.state);
        self.apply_update(update)?;
        if was_dragging && self.history.end_batch(&self.state.snapshot_value()?)? {
            debug!("Recorded drag gesture");
        }
        Ok(())
    }

    // --- Element and selection mutators ---

    /// Add an element, unselected.
    pub fn add_element(&mut self, element: Element) -> BoardResult<ElementId> {
        ensure_finite(element.styles().is_finite(), "element geometry")?;
        let id = element.id();
        self.commit(Transition::Edit, |state| {
            if state.elements.contains(id) {
                return Err(ValidationError::DuplicateElement(id).into());
            }
            state.elements.insert(element);
            Ok(())
        })?;
        Ok(id)
    }

    /// Create an element of `kind` at board-coordinate `bounds`, scaled for
    /// the current zoom level.
    pub fn create_element(&mut self, kind: ElementKind, bounds: Rect) -> BoardResult<ElementId> {
        ensure_finite(bounds.is_finite(), "element bounds")?;
        let element = Element::create(
            kind,
            bounds,
            self.state.viewport.scale(),
            self.config.text_defaults(),
        );
        self.add_element(element)
    }

    pub fn remove_element(&mut self, id: ElementId) -> BoardResult<Element> {
        let removed = self
            .state
            .elements
            .get(id)
            .cloned()
            .ok_or(ValidationError::UnknownElement(id))?;
        self.commit(Transition::Edit, |state| {
            state.elements.remove(id);
            if state.current_element == Some(id) {
                state.current_element = None;
            }
            Ok(())
        })?;
        Ok(removed)
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn remove_selected(&mut self) -> BoardResult<usize> {
        let selected = self.state.selection.selected();
        if selected.is_empty() {
            return Ok(0);
        }
        self.commit(Transition::Edit, |state| {
            for &id in &selected {
                state.elements.remove(id);
            }
            state.current_element = None;
            Ok(())
        })?;
        Ok(selected.len())
    }

    /// Select `id`. Unless `is_multi_select` is set, every other element is
    /// deselected first.
    pub fn set_current_element(
        &mut self,
        id: ElementId,
        selected: bool,
        is_multi_select: bool,
    ) -> BoardResult<()> {
        self.commit(Transition::Edit, |state| {
            if !state.selection.set_current(id, selected, is_multi_select) {
                return Err(ValidationError::UnknownElement(id).into());
            }
            Ok(())
        })
    }

    pub fn select_all(&mut self) -> BoardResult<()> {
        self.commit(Transition::Edit, |state| {
            let ids: Vec<ElementId> = state.elements.ids().collect();
            state.selection.select_only(&ids);
            Ok(())
        })
    }

    pub fn clear_selection(&mut self) -> BoardResult<()> {
        self.commit(Transition::Edit, |state| {
            state.selection.clear();
            Ok(())
        })
    }

    /// Move every selected element by a screen-space delta.
    pub fn update_position(&mut self, delta: Vec2) -> BoardResult<()> {
        ensure_finite(delta.is_finite(), "position delta")?;
        self.commit(Transition::Edit, |state| {
            let scaled = state.viewport.scale_movement(delta);
            for id in state.selection.selected() {
                if let Some(element) = state.elements.get_mut(id) {
                    element.styles_mut().translate(scaled);
                }
            }
            Ok(())
        })
    }

    /// Set an element's height from editor input, scaled by the zoom level.
    pub fn set_element_height(&mut self, id: ElementId, height: &str) -> BoardResult<()> {
        let value: f64 = height
            .trim()
            .parse()
            .map_err(|_| ValidationError::NonNumericHeight(height.to_string()))?;
        if !value.is_finite() {
            return Err(ValidationError::NonNumericHeight(height.to_string()).into());
        }

        self.commit(Transition::Edit, |state| {
            let scale = state.viewport.scale();
            let element = state
                .elements
                .get_mut(id)
                .ok_or(ValidationError::UnknownElement(id))?;
            element.styles_mut().height = value * scale;
            Ok(())
        })
    }

    pub fn update_element_property(
        &mut self,
        id: ElementId,
        property: ElementProperty,
        value: PropertyValue,
    ) -> BoardResult<()> {
        self.commit(Transition::Edit, |state| {
            let element = state
                .elements
                .get_mut(id)
                .ok_or(ValidationError::UnknownElement(id))?;
            element.set_property(property, value)?;
            Ok(())
        })
    }

    /// [`Board::update_element_property`] with a property name as editors
    /// send it.
    pub fn update_element_property_by_name(
        &mut self,
        id: ElementId,
        property: &str,
        value: PropertyValue,
    ) -> BoardResult<()> {
        let property: ElementProperty = property.parse()?;
        self.update_element_property(id, property, value)
    }

    // --- Text editing ---

    /// Open the text overlay for an element: keep a copy in the editor slot
    /// and hide the element's own text while the overlay shows it.
    pub fn begin_text_edit(&mut self, id: ElementId) -> BoardResult<()> {
        let element = self
            .state
            .elements
            .get(id)
            .ok_or(ValidationError::UnknownElement(id))?;
        if element.label().is_none() {
            return Err(ValidationError::UnsupportedProperty {
                property: ElementProperty::Text,
                kind: element.kind(),
            }
            .into());
        }
        if self.state.text_editor.is_some() {
            self.cancel_text_edit()?;
        }

        self.history.begin_batch(&self.state.snapshot_value()?);
        self.text_session = true;
        let result = self.commit(Transition::Batched, |state| {
            let element = state
                .elements
                .get_mut(id)
                .ok_or(ValidationError::UnknownElement(id))?;
            state.text_editor = Some(element.clone());
            if let Some(label) = element.label_mut() {
                label.text.clear();
            }
            Ok(())
        });
        if result.is_err() {
            self.close_text_session()?;
        }
        result
    }

    /// Apply the text editor's result and close the overlay.
    pub fn update_text(&mut self, update: TextUpdate) -> BoardResult<()> {
        if !update.font_size.is_finite() || update.font_size <= 0.0 {
            return Err(ValidationError::InvalidValue {
                property: ElementProperty::Text,
                reason: format!("font size {} is not positive", update.font_size),
            }
            .into());
        }
        let text_padding = self.config.text_padding;

        self.commit(Transition::Edit, |state| {
            let scale = state.viewport.scale();
            if let Some(editor) = state.text_editor.take() {
                if editor.id() != update.id {
                    restore_text(&mut state.elements, &editor);
                }
            }
            let element = state
                .elements
                .get_mut(update.id)
                .ok_or(ValidationError::UnknownElement(update.id))?;
            let kind = element.kind();
            element.styles_mut().font_size = Some(update.font_size * scale);
            let label = element
                .label_mut()
                .ok_or(ValidationError::UnsupportedProperty {
                    property: ElementProperty::Text,
                    kind,
                })?;
            label.text = update.text;
            label.un_scaled_font_size = update.font_size;
            label.padding = text_padding * scale;
            Ok(())
        })?;
        self.close_text_session()
    }

    /// Close the overlay without changes. Returns false if no edit was open.
    pub fn cancel_text_edit(&mut self) -> BoardResult<bool> {
        if self.state.text_editor.is_none() {
            return Ok(false);
        }
        self.commit(Transition::Batched, |state| {
            if let Some(editor) = state.text_editor.take() {
                restore_text(&mut state.elements, &editor);
            }
            Ok(())
        })?;
        self.close_text_session()?;
        Ok(true)
    }

    fn close_text_session(&mut self) -> BoardResult<()> {
        if self.text_session {
            self.text_session = false;
            if self.history.end_batch(&self.state.snapshot_value()?)? {
                debug!("Recorded text edit");
            }
        }
        Ok(())
    }

    // --- History ---

    /// Revert the last recorded change. Returns false if there was nothing
    /// to undo.
    pub fn undo(&mut self) -> BoardResult<bool> {
        let current = self.state.snapshot_value()?;
        let Some(snapshot) = self.history.undo(&current, CombinedSnapshot::from_value)? else {
            return Ok(false);
        };
        self.commit(Transition::Undo, |state| {
            state.restore(snapshot);
            Ok(())
        })?;
        Ok(true)
    }

    /// Re-apply the last undone change. Returns false if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> BoardResult<bool> {
        let current = self.state.snapshot_value()?;
        let Some(snapshot) = self.history.redo(&current, CombinedSnapshot::from_value)? else {
            return Ok(false);
        };
        self.commit(Transition::Redo, |state| {
            state.restore(snapshot);
            Ok(())
        })?;
        Ok(true)
    }

    // --- Input routing ---

    /// Route one input event from the host event loop.
    pub fn handle_event(&mut self, event: &InputEvent) -> BoardResult<()> {
        let result = match event {
            InputEvent::PointerDown(pointer) => self.pointer_down(pointer),
            InputEvent::PointerMove(pointer) => self.pointer_move(pointer),
            InputEvent::PointerUp(pointer) => self.pointer_up(pointer),
            InputEvent::Wheel(wheel) => self.zoom(wheel),
            InputEvent::Key(key) => self.handle_key(key).map(|_| ()),
        };
        if let Err(err) = &result {
            warn!("Rejected {event:?}: {err}");
        }
        result
    }

    /// Run the shortcut bound to a key, if any.
    pub fn handle_key(&mut self, event: &KeyEvent) -> BoardResult<Option<ShortcutAction>> {
        let Some(action) = ShortcutRegistry::lookup(event) else {
            return Ok(None);
        };
        match action {
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::Redo => {
                self.redo()?;
            }
            ShortcutAction::SelectAll => self.select_all()?,
            ShortcutAction::DeleteSelection => {
                self.remove_selected()?;
            }
            ShortcutAction::Cancel => {
                self.cancel_text_edit()?;
                self.clear_selection()?;
            }
            ShortcutAction::Tool(tool) => self.activate_tool(tool),
        }
        Ok(Some(action))
    }

    // --- Render boundary ---

    /// Read-only view of the board for a screen of the given size.
    pub fn frame(&self, screen_size: Size) -> RenderFrame {
        let viewport = self.state.viewport;
        RenderFrame {
            elements: self
                .state
                .elements
                .ordered()
                .into_iter()
                .map(|element| FrameElement {
                    element: element.clone(),
                    selected: self.state.selection.is_selected(element.id()),
                })
                .collect(),
            viewport,
            view_box: viewport.view_box(screen_size),
            grid_position: viewport.grid_position(),
            marquee: self.state.session.marquee,
            tool: self.state.tool,
            text_editor: self.state.text_editor.as_ref().map(Element::id),
            undo_is_possible: self.undo_is_possible(),
            redo_is_possible: self.redo_is_possible(),
        }
    }
}

fn ensure_finite(finite: bool, what: &'static str) -> Result<(), ValidationError> {
    if finite {
        Ok(())
    } else {
        Err(ValidationError::NonFinite(what))
    }
}

/// Put the text kept in the editor copy back into the live element.
fn restore_text(elements: &mut ElementStore, editor: &Element) {
    let text = editor.label().map(|label| label.text.clone());
    if let (Some(text), Some(label)) = (
        text,
        elements.get_mut(editor.id()).and_then(Element::label_mut),
    ) {
        label.text = text;
    }
}
