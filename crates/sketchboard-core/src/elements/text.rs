//! Free-standing text element.

use super::{ElementId, ElementKind, ElementTrait, Label, Styles, TextDefaults};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block of text without fill or outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub(crate) id: ElementId,
    pub styles: Styles,
    pub label: Label,
}

impl TextBlock {
    /// Create an empty text block covering `bounds`.
    pub fn new(bounds: Rect, scale: f64, text: TextDefaults) -> Self {
        let mut styles = Styles::new(bounds);
        styles.stroke = None;
        styles.stroke_width = 0.0;
        let label = Label::scaled(&mut styles, text, scale);
        Self {
            id: Uuid::new_v4(),
            styles,
            label,
        }
    }
}

impl ElementTrait for TextBlock {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn styles(&self) -> &Styles {
        &self.styles
    }

    fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    fn label(&self) -> Option<&Label> {
        Some(&self.label)
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.label)
    }
}
