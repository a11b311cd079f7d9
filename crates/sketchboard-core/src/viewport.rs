//! Viewport module for pan/zoom transforms.
//!
//! Board coordinates relate to screen coordinates through an offset and an
//! integer zoom level: `board = offset + screen * zoom_level`. A larger zoom
//! level shows more of the board, so one screen pixel covers `zoom_level`
//! board units.

use crate::input::WheelEvent;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level a new board starts at.
pub const DEFAULT_ZOOM_LEVEL: u32 = 100;

/// Lowest reachable zoom level.
pub const MIN_ZOOM_LEVEL: u32 = 1;

/// Viewport manages the view transform for the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Board coordinate shown at the top-left screen corner. Unclamped.
    pub offset: Vec2,
    /// Unitless magnification, never below [`MIN_ZOOM_LEVEL`].
    pub zoom_level: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport at the origin with the given zoom level.
    pub fn with_zoom_level(zoom_level: u32) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom_level: zoom_level.max(MIN_ZOOM_LEVEL),
        }
    }

    /// Zoom level as a scale factor.
    pub fn scale(&self) -> f64 {
        f64::from(self.zoom_level)
    }

    /// Get the affine transform from board coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale()) * Affine::translate(-self.offset)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to board coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale())
    }

    /// Convert a screen point to board coordinates.
    pub fn screen_to_board(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a board point to screen coordinates.
    pub fn board_to_screen(&self, board_point: Point) -> Point {
        self.transform() * board_point
    }

    /// Scale a screen-space movement into board units.
    pub fn scale_movement(&self, movement: Vec2) -> Vec2 {
        movement * self.scale()
    }

    /// Viewport after one wheel step, keeping the point under the cursor fixed.
    ///
    /// Each event moves the zoom level by the sign of its vertical delta. An
    /// event with a non-finite position or delta leaves the viewport as is.
    pub fn zoomed(&self, event: &WheelEvent) -> Viewport {
        if !event.is_finite() {
            return *self;
        }
        let direction: i64 = if event.delta.y > 0.0 {
            1
        } else if event.delta.y < 0.0 {
            -1
        } else {
            0
        };
        let stepped = i64::from(self.zoom_level) + direction;
        let next_zoom_level = u32::try_from(stepped.max(i64::from(MIN_ZOOM_LEVEL)))
            .unwrap_or(u32::MAX);

        let cursor = event.position.to_vec2();
        let before = cursor * self.scale();
        let after = cursor * f64::from(next_zoom_level);

        Viewport {
            offset: self.offset - (after - before),
            zoom_level: next_zoom_level,
        }
    }

    /// Viewport after dragging the board by a screen-space movement.
    ///
    /// Movement is scaled by the zoom level so panning keeps pace with the
    /// pointer at every magnification.
    pub fn panned(&self, movement: Vec2) -> Viewport {
        if !movement.is_finite() {
            return *self;
        }
        Viewport {
            offset: self.offset - self.scale_movement(movement),
            zoom_level: self.zoom_level,
        }
    }

    /// Visible board region for a screen of the given size.
    pub fn view_box(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.offset.to_point(), size * self.scale())
    }

    /// Background grid offset in screen pixels.
    pub fn grid_position(&self) -> Vec2 {
        -self.offset / self.scale()
    }

    /// Viewport at the current zoom level with `target` centered on screen.
    pub fn centered_on(&self, target: Rect, size: Size) -> Viewport {
        let half_view = (size * self.scale()).to_vec2() / 2.0;
        Viewport {
            offset: target.center().to_vec2() - half_view,
            zoom_level: self.zoom_level,
        }
    }
}
