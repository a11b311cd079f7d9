//! Sketchboard Core Library
//!
//! State engine for an infinite, pannable and zoomable diagram board:
//! viewport transform, drag delegation pipeline, element and selection
//! stores, and a snapshot/diff undo-redo engine.

pub mod board;
pub mod config;
pub mod drag;
pub mod elements;
pub mod error;
pub mod frame;
pub mod history;
pub mod input;
pub mod patch;
pub mod shortcuts;
pub mod state;
pub mod store;
pub mod tools;
pub mod update;
pub mod viewport;

pub use board::{Board, TextUpdate};
pub use config::BoardConfig;
pub use elements::{Element, ElementId, ElementKind, ElementProperty, PropertyValue};
pub use error::{BoardError, BoardResult, PatchApplyError, ValidationError};
pub use frame::{FrameElement, RenderFrame};
pub use history::{History, Transition};
pub use input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use patch::{Patch, PatchOp};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use state::{BoardState, CombinedSnapshot, InteractionSession};
pub use store::{ElementStore, SelectionState, SelectionStore};
pub use tools::{DragHandlerFn, DragHandlers, ToolDefaults, ToolKind};
pub use update::BoardUpdate;
pub use viewport::Viewport;
