//! Slide-space geometry: points, normalized rectangles and the viewport.
//!
//! Slides are authored in a fixed 1280x720 space. `Viewport` scales that
//! space to fit the editor container and converts pointer positions back.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{SLIDE_HEIGHT, SLIDE_WIDTH, VIEWPORT_FILL};

/// A point in either screen or slide space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Axis-aligned rectangle. `width` and `height` are non-negative when built
/// with [`Rect::from_corners`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two corners, independent of drag direction.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// `true` when the rectangle encloses no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Maps the fixed-size slide into a host container.
///
/// `scale` converts slide units to CSS pixels; `origin` is the screen
/// position of the slide's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Point,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin: Point::new(0.0, 0.0), scale: 1.0 }
    }
}

impl Viewport {
    /// Fit the slide inside a `width` x `height` container, leaving a margin.
    /// The slide is centered; a degenerate container keeps scale 1.0.
    #[must_use]
    pub fn fit(container_width: f64, container_height: f64) -> Self {
        let raw = (container_width / SLIDE_WIDTH).min(container_height / SLIDE_HEIGHT) * VIEWPORT_FILL;
        let scale = if raw.is_finite() && raw > 0.0 { raw } else { 1.0 };
        let origin = Point::new(
            (container_width - SLIDE_WIDTH * scale) / 2.0,
            (container_height - SLIDE_HEIGHT * scale) / 2.0,
        );
        Self { origin, scale }
    }

    /// Convert a screen-space point (CSS pixels) to slide coordinates.
    #[must_use]
    pub fn screen_to_slide(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin.x) / self.scale,
            y: (screen.y - self.origin.y) / self.scale,
        }
    }

    /// Convert a slide-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn slide_to_screen(&self, slide: Point) -> Point {
        Point {
            x: slide.x * self.scale + self.origin.x,
            y: slide.y * self.scale + self.origin.y,
        }
    }
}
