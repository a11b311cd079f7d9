//! Circle element.

use super::{ElementId, ElementKind, ElementTrait, SerializableColor, Styles};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle (or ellipse, once resized unevenly) inscribed in its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ElementId,
    pub styles: Styles,
}

impl Circle {
    /// Create a circle inscribed in `bounds`.
    pub fn new(bounds: Rect) -> Self {
        let mut styles = Styles::new(bounds);
        styles.fill = Some(SerializableColor::white());
        Self {
            id: Uuid::new_v4(),
            styles,
        }
    }

    pub fn center(&self) -> Point {
        self.styles.rect().center()
    }
}

impl ElementTrait for Circle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Circle
    }

    fn styles(&self) -> &Styles {
        &self.styles
    }

    fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.styles.rect();
        let rx = bounds.width() / 2.0 + tolerance;
        let ry = bounds.height() / 2.0 + tolerance;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let center = bounds.center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }
}
