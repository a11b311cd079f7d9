//! Rectangle element.

use super::{ElementId, ElementKind, ElementTrait, Label, SerializableColor, Styles, TextDefaults};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle with an optional label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    pub styles: Styles,
    pub label: Label,
}

impl Rectangle {
    /// Create a new rectangle covering `bounds`.
    pub fn new(bounds: Rect, scale: f64, text: TextDefaults) -> Self {
        let mut styles = Styles::new(bounds);
        styles.fill = Some(SerializableColor::white());
        let label = Label::scaled(&mut styles, text, scale);
        Self {
            id: Uuid::new_v4(),
            styles,
            label,
        }
    }
}

impl ElementTrait for Rectangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Rect
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
