//! Keyboard shortcut registry.

use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// What a shortcut does on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    SelectAll,
    DeleteSelection,
    /// Clear the selection and abandon any text edit.
    Cancel,
    Tool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Keys compare case-insensitively; Ctrl and Cmd are interchangeable.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key)
            && self.ctrl == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("A", true, false, SelectAll, "Select all elements"),
            Shortcut::new("Delete", false, false, DeleteSelection, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, DeleteSelection, "Delete selected elements"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel current action"),
            Shortcut::new("H", false, false, Tool(ToolKind::Pan), "Pan tool"),
            Shortcut::new("V", false, false, Tool(ToolKind::Select), "Select tool"),
            Shortcut::new("R", false, false, Tool(ToolKind::Rect), "Rectangle tool"),
            Shortcut::new("T", false, false, Tool(ToolKind::Text), "Text tool"),
            Shortcut::new("P", false, false, Tool(ToolKind::PostitSquare), "Post-it tool"),
            Shortcut::new("C", false, false, Tool(ToolKind::Circle), "Circle tool"),
        ]
    }

    /// Find the action bound to a key event.
    pub fn lookup(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.action)
    }
}
