//! Post-it note element.

use super::{ElementId, ElementKind, ElementTrait, Label, SerializableColor, Styles, TextDefaults};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A square sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostitSquare {
    pub(crate) id: ElementId,
    pub styles: Styles,
    pub label: Label,
}

impl PostitSquare {
    /// Create a post-it covering `bounds`, squared to its longer side.
    pub fn new(bounds: Rect, scale: f64, text: TextDefaults) -> Self {
        let bounds = bounds.abs();
        let side = bounds.width().max(bounds.height());
        let mut styles = Styles::new(Rect::from_origin_size(bounds.origin(), (side, side)));
        styles.fill = Some(SerializableColor::postit());
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

impl ElementTrait for PostitSquare {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::PostitSquare
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
