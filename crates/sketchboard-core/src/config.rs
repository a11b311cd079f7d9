//! Board configuration.

use crate::elements::{DEFAULT_FONT_SIZE, DEFAULT_TEXT_PADDING, TextDefaults};
use crate::error::BoardResult;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::tools::ToolDefaults;
use crate::viewport::{DEFAULT_ZOOM_LEVEL, Viewport};
use serde::{Deserialize, Serialize};

/// Settings a [`Board`](crate::board::Board) is created with.
///
/// Missing fields in JSON fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Zoom level of a fresh board.
    pub initial_zoom_level: u32,
    /// Maximum undo depth; 0 keeps every entry.
    pub history_limit: usize,
    /// Unscaled inner padding of text-bearing elements.
    pub text_padding: f64,
    /// Unscaled font size of new text-bearing elements.
    pub default_font_size: f64,
    /// Unscaled side of an element created by a click.
    pub default_element_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            initial_zoom_level: DEFAULT_ZOOM_LEVEL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            text_padding: DEFAULT_TEXT_PADDING,
            default_font_size: DEFAULT_FONT_SIZE,
            default_element_size: 200.0,
        }
    }
}

impl BoardConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn initial_viewport(&self) -> Viewport {
        Viewport::with_zoom_level(self.initial_zoom_level)
    }

    pub fn text_defaults(&self) -> TextDefaults {
        TextDefaults {
            font_size: self.default_font_size,
            padding: self.text_padding,
        }
    }

    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults {
            text: self.text_defaults(),
            element_size: self.default_element_size,
        }
    }
}
