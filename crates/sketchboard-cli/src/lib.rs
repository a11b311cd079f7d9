//! Headless replay of board scripts.
//!
//! A script is a JSON document listing board operations and raw input
//! events. Elements are referred to by the order they appeared on the
//! board, since their IDs are generated at run time.

mod error;

pub use error::{ReplayError, ReplayResult};

use kurbo::{Point, Rect, Size, Vec2};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sketchboard_core::{
    Board, BoardConfig, BoardResult, ElementId, ElementKind, InputEvent, PropertyValue,
    RenderFrame, TextUpdate, ToolKind, WheelEvent,
};
use std::collections::HashSet;
use std::path::Path;

/// Screen size used when a script does not give one.
pub const DEFAULT_SCREEN_SIZE: Size = Size::new(1280.0, 720.0);

/// A replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: BoardConfig,
    #[serde(default = "default_screen_size")]
    pub screen_size: Size,
    pub steps: Vec<ScriptStep>,
}

fn default_screen_size() -> Size {
    DEFAULT_SCREEN_SIZE
}

impl Script {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// One scripted operation. `element` fields index the elements in the
/// order they first appeared on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    ActivateTool { tool: ToolKind },
    SelectTool { tool: ToolKind },
    Create { kind: ElementKind, bounds: Rect },
    Remove { element: usize },
    RemoveSelected,
    Select {
        element: usize,
        #[serde(default = "selected_default")]
        selected: bool,
        #[serde(default)]
        multi: bool,
    },
    SelectAll,
    ClearSelection,
    Move { delta: Vec2 },
    SetHeight { element: usize, height: String },
    SetProperty {
        element: usize,
        property: String,
        value: PropertyValue,
    },
    BeginTextEdit { element: usize },
    UpdateText {
        element: usize,
        text: String,
        font_size: f64,
    },
    CancelTextEdit,
    Zoom { position: Point, delta: Vec2 },
    Pan { movement: Vec2 },
    CenterOn { element: usize },
    Undo,
    Redo,
    Input { event: InputEvent },
}

fn selected_default() -> bool {
    true
}

/// A step the board rejected. Replay continues after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedStep {
    pub step: usize,
    pub error: String,
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Element IDs in the order the script can refer to them.
    pub element_ids: Vec<ElementId>,
    pub frame: RenderFrame,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub rejected: Vec<RejectedStep>,
}

/// Runs script steps against a board.
pub struct Replayer {
    board: Board,
    screen_size: Size,
    element_ids: Vec<ElementId>,
    rejected: Vec<RejectedStep>,
}

impl Replayer {
    pub fn new(config: BoardConfig, screen_size: Size) -> Self {
        Self {
            board: Board::new(config),
            screen_size,
            element_ids: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run one step. Board errors are collected; only script errors abort.
    pub fn step(&mut self, index: usize, step: &ScriptStep) -> ReplayResult<()> {
        if let Err(err) = self.apply(index, step)? {
            warn!("Step {index} rejected: {err}");
            self.rejected.push(RejectedStep {
                step: index,
                error: err.to_string(),
            });
        }
        self.track_new_elements();
        Ok(())
    }

    fn apply(&mut self, index: usize, step: &ScriptStep) -> ReplayResult<BoardResult<()>> {
        let ids = &self.element_ids;
        let lookup = |position: usize| {
            ids.get(position)
                .copied()
                .ok_or(ReplayError::UnknownElement {
                    step: index,
                    index: position,
                    known: ids.len(),
                })
        };
        let screen_size = self.screen_size;
        let board = &mut self.board;
        let result = match step {
            ScriptStep::ActivateTool { tool } => {
                board.activate_tool(*tool);
                Ok(())
            }
            ScriptStep::SelectTool { tool } => {
                board.select_tool(*tool);
                Ok(())
            }
            ScriptStep::Create { kind, bounds } => {
                board.create_element(*kind, *bounds).map(|_| ())
            }
            ScriptStep::Remove { element: target } => {
                let id = lookup(*target)?;
                board.remove_element(id).map(|_| ())
            }
            ScriptStep::RemoveSelected => board.remove_selected().map(|_| ()),
            ScriptStep::Select {
                element: target,
                selected,
                multi,
            } => {
                let id = lookup(*target)?;
                board.set_current_element(id, *selected, *multi)
            }
            ScriptStep::SelectAll => board.select_all(),
            ScriptStep::ClearSelection => board.clear_selection(),
            ScriptStep::Move { delta } => board.update_position(*delta),
            ScriptStep::SetHeight { element: target, height } => {
                let id = lookup(*target)?;
                board.set_element_height(id, height)
            }
            ScriptStep::SetProperty {
                element: target,
                property,
                value,
            } => {
                let id = lookup(*target)?;
                board.update_element_property_by_name(id, property, value.clone())
            }
            ScriptStep::BeginTextEdit { element: target } => {
                let id = lookup(*target)?;
                board.begin_text_edit(id)
            }
            ScriptStep::UpdateText {
                element: target,
                text,
                font_size,
            } => {
                let id = lookup(*target)?;
                board.update_text(TextUpdate {
                    id,
                    text: text.clone(),
                    font_size: *font_size,
                })
            }
            ScriptStep::CancelTextEdit => board.cancel_text_edit().map(|_| ()),
            ScriptStep::Zoom { position, delta } => board.zoom(&WheelEvent {
                position: *position,
                delta: *delta,
            }),
            ScriptStep::Pan { movement } => board.pan_by(*movement),
            ScriptStep::CenterOn { element: target } => {
                let id = lookup(*target)?;
                board.center_on_element(id, screen_size)
            }
            ScriptStep::Undo => board.undo().map(|_| ()),
            ScriptStep::Redo => board.redo().map(|_| ()),
            ScriptStep::Input { event } => board.handle_event(event),
        };
        Ok(result)
    }

    /// Append IDs of elements that appeared since the last step.
    fn track_new_elements(&mut self) {
        let known: HashSet<ElementId> = self.element_ids.iter().copied().collect();
        let mut fresh: Vec<ElementId> = self
            .board
            .elements()
            .ids()
            .filter(|id| !known.contains(id))
            .collect();
        fresh.sort();
        self.element_ids.extend(fresh);
    }

    pub fn finish(self) -> ReplayReport {
        let history = self.board.history();
        ReplayReport {
            frame: self.board.frame(self.screen_size),
            undo_depth: history.undo_len(),
            redo_depth: history.redo_len(),
            element_ids: self.element_ids,
            rejected: self.rejected,
        }
    }
}

/// Run a whole script.
pub fn run_script(script: &Script) -> ReplayResult<ReplayReport> {
    let mut replayer = Replayer::new(script.config.clone(), script.screen_size);
    for (index, step) in script.steps.iter().enumerate() {
        replayer.step(index, step)?;
    }
    let report = replayer.finish();
    info!(
        "Replayed {} steps: {} elements, {} rejected",
        script.steps.len(),
        report.frame.elements.len(),
        report.rejected.len()
    );
    Ok(report)
}
