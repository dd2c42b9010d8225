//! Viewport geometry.

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport covering a terminal area of `cols` x `rows` cells, each
    /// cell measuring `cell_width` x `cell_height` pixels.
    pub fn from_cells(cols: u16, rows: u16, cell_width: f64, cell_height: f64) -> Self {
        Self::new(cols as f64 * cell_width, rows as f64 * cell_height)
    }

    /// Center of the viewport, the origin of particle coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether there is nothing to draw on.
    pub fn is_empty(&self) -> bool {
        self.width.is_nan() || self.height.is_nan() || self.width <= 0.0 || self.height <= 0.0
    }
}
