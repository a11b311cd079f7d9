//! Element definitions for the board.

mod circle;
mod postit;
mod rectangle;
mod text;

pub use circle::Circle;
pub use postit::PostitSquare;
pub use rectangle::Rectangle;
pub use text::TextBlock;

use crate::error::ValidationError;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Font size used for new text-bearing elements, in unscaled units.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Padding between a label and its element border, in unscaled units.
pub const DEFAULT_TEXT_PADDING: f64 = 8.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Yellow used for post-it notes.
    pub fn postit() -> Self {
        Self::new(255, 240, 140, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Geometry and render attributes of an element.
///
/// Geometric fields are stored in screen-scaled logical units: they already
/// include the zoom level that was active when they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no outline).
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Scaled font size, only present on text-bearing elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

fn default_opacity() -> f64 {
    1.0
}

impl Styles {
    /// Create styles covering the given bounds with a black outline.
    pub fn new(bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            fill: None,
            stroke: Some(SerializableColor::black()),
            stroke_width: 2.0,
            opacity: 1.0,
            font_size: None,
        }
    }

    /// Bounding box in board coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Replace the geometry with the given bounds.
    pub fn set_rect(&mut self, bounds: Rect) {
        let bounds = bounds.abs();
        self.x = bounds.x0;
        self.y = bounds.y0;
        self.width = bounds.width();
        self.height = bounds.height();
    }

    /// Move by a delta already expressed in scaled units.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Whether every numeric field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.rect().is_finite()
            && self.stroke_width.is_finite()
            && self.opacity.is_finite()
            && self.font_size.is_none_or(f64::is_finite)
    }

    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(|c| c.into())
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke.map(|c| c.into())
    }
}

/// Text content of a text-bearing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Font size as typed by the user, kept so a later zoom can re-derive
    /// the scaled size without compounding.
    pub un_scaled_font_size: f64,
    /// Scaled inner padding.
    pub padding: f64,
}

/// Font and padding used when creating text-bearing elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDefaults {
    pub font_size: f64,
    pub padding: f64,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_TEXT_PADDING,
        }
    }
}

impl Label {
    /// Create an empty label scaled for the given zoom factor, and apply
    /// the matching font size to `styles`.
    pub fn scaled(styles: &mut Styles, defaults: TextDefaults, scale: f64) -> Self {
        styles.font_size = Some(defaults.font_size * scale);
        Self {
            text: String::new(),
            un_scaled_font_size: defaults.font_size,
            padding: defaults.padding * scale,
        }
    }
}

/// The type tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Rect,
    Text,
    PostitSquare,
    Circle,
}

impl ElementKind {
    /// Whether elements of this kind carry a label.
    pub fn is_text_bearing(&self) -> bool {
        !matches!(self, ElementKind::Circle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Text => "text",
            ElementKind::PostitSquare => "postit_square",
            ElementKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common trait for all element types.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Get the type tag.
    fn kind(&self) -> ElementKind;

    fn styles(&self) -> &Styles;

    fn styles_mut(&mut self) -> &mut Styles;

    /// Label of text-bearing elements.
    fn label(&self) -> Option<&Label> {
        None
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        None
    }

    /// Get the bounding box in board coordinates.
    fn bounds(&self) -> Rect {
        self.styles().rect()
    }

    /// Check if a point (in board coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

/// Enum wrapper for all element types.
///
/// Serialized with a `type` tag so snapshot paths read
/// `/elements/<id>/styles/x` regardless of the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Rect(Rectangle),
    Text(TextBlock),
    PostitSquare(PostitSquare),
    Circle(Circle),
}

impl Element {
    /// Create an element of the given kind covering `bounds`.
    ///
    /// `scale` is the zoom level the geometry was computed at; it is applied
    /// to the font size and padding of text-bearing kinds.
    pub fn create(kind: ElementKind, bounds: Rect, scale: f64, text: TextDefaults) -> Self {
        match kind {
            ElementKind::Rect => Element::Rect(Rectangle::new(bounds, scale, text)),
            ElementKind::Text => Element::Text(TextBlock::new(bounds, scale, text)),
            ElementKind::PostitSquare => {
                Element::PostitSquare(PostitSquare::new(bounds, scale, text))
            }
            ElementKind::Circle => Element::Circle(Circle::new(bounds)),
        }
    }

    fn as_trait(&self) -> &dyn ElementTrait {
        match self {
            Element::Rect(e) => e,
            Element::Text(e) => e,
            Element::PostitSquare(e) => e,
            Element::Circle(e) => e,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ElementTrait {
        match self {
            Element::Rect(e) => e,
            Element::Text(e) => e,
            Element::PostitSquare(e) => e,
            Element::Circle(e) => e,
        }
    }

    pub fn id(&self) -> ElementId {
        self.as_trait().id()
    }

    pub fn kind(&self) -> ElementKind {
        self.as_trait().kind()
    }

    pub fn styles(&self) -> &Styles {
        self.as_trait().styles()
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        self.as_trait_mut().styles_mut()
    }

    pub fn label(&self) -> Option<&Label> {
        self.as_trait().label()
    }

    pub fn label_mut(&mut self) -> Option<&mut Label> {
        self.as_trait_mut().label_mut()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    /// Test if this element intersects a selection rectangle.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        rect.intersect(self.bounds().inflate(1.0, 1.0)).area() > 0.0
    }

    /// Set one of the editable properties, validating the value.
    pub fn set_property(
        &mut self,
        property: ElementProperty,
        value: PropertyValue,
    ) -> Result<(), ValidationError> {
        let kind = self.kind();
        match (property, value) {
            (ElementProperty::Fill, PropertyValue::Color(color)) => {
                self.styles_mut().fill = color;
            }
            (ElementProperty::Stroke, PropertyValue::Color(color)) => {
                self.styles_mut().stroke = color;
            }
            (ElementProperty::StrokeWidth, PropertyValue::Number(width)) => {
                if !width.is_finite() || width < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        property,
                        reason: format!("{width} is not a non-negative number"),
                    });
                }
                self.styles_mut().stroke_width = width;
            }
            (ElementProperty::Opacity, PropertyValue::Number(opacity)) => {
                if !(0.0..=1.0).contains(&opacity) {
                    return Err(ValidationError::InvalidValue {
                        property,
                        reason: format!("{opacity} is outside 0..=1"),
                    });
                }
                self.styles_mut().opacity = opacity;
            }
            (ElementProperty::Text, PropertyValue::Text(text)) => {
                let label = self
                    .label_mut()
                    .ok_or(ValidationError::UnsupportedProperty { property, kind })?;
                label.text = text;
            }
            (ElementProperty::Padding, PropertyValue::Number(padding)) => {
                if !padding.is_finite() || padding < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        property,
                        reason: format!("{padding} is not a non-negative number"),
                    });
                }
                let label = self
                    .label_mut()
                    .ok_or(ValidationError::UnsupportedProperty { property, kind })?;
                label.padding = padding;
            }
            (property, value) => {
                return Err(ValidationError::InvalidValue {
                    property,
                    reason: format!("expected {}, got {}", property.expects(), value.type_name()),
                });
            }
        }
        Ok(())
    }
}

/// The closed set of element fields editors may change by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementProperty {
    Fill,
    Stroke,
    StrokeWidth,
    Opacity,
    Text,
    Padding,
}

impl ElementProperty {
    pub fn name(&self) -> &'static str {
        match self {
            ElementProperty::Fill => "fill",
            ElementProperty::Stroke => "stroke",
            ElementProperty::StrokeWidth => "stroke_width",
            ElementProperty::Opacity => "opacity",
            ElementProperty::Text => "text",
            ElementProperty::Padding => "padding",
        }
    }

    fn expects(&self) -> &'static str {
        match self {
            ElementProperty::Fill | ElementProperty::Stroke => "a color",
            ElementProperty::Text => "text",
            ElementProperty::StrokeWidth | ElementProperty::Opacity | ElementProperty::Padding => {
                "a number"
            }
        }
    }
}

impl fmt::Display for ElementProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementProperty {
    type Err = ValidationError;

    /// Accepts both snake_case and the camelCase keys overlay widgets send.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "fill" => Ok(ElementProperty::Fill),
            "stroke" => Ok(ElementProperty::Stroke),
            "stroke_width" | "strokeWidth" => Ok(ElementProperty::StrokeWidth),
            "opacity" => Ok(ElementProperty::Opacity),
            "text" => Ok(ElementProperty::Text),
            "padding" => Ok(ElementProperty::Padding),
            other => Err(ValidationError::UnknownProperty(other.to_string())),
        }
    }
}

/// A value for [`Element::set_property`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Color(Option<SerializableColor>),
    Text(String),
}

impl PropertyValue {
    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Number(_) => "a number",
            PropertyValue::Color(_) => "a color",
            PropertyValue::Text(_) => "text",
        }
    }
}

impl From<Color> for PropertyValue {
    fn from(color: Color) -> Self {
        PropertyValue::Color(Some(color.into()))
    }
}
