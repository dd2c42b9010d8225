//! Drawing surface abstraction.

use warpfield_core::{StarColor, Viewport};

/// A 2D surface the starfield draws onto.
///
/// Coordinates are pixels with the origin at the top-left corner and `y`
/// growing downward. Color and opacity apply to subsequent draw calls.
pub trait Surface {
    /// Current size.
    fn size(&self) -> Viewport;

    /// Match a new viewport size. Clears the surface.
    fn resize(&mut self, viewport: Viewport);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill and stroke color.
    fn set_color(&mut self, color: StarColor);

    /// Opacity of the whole surface, `0.0..=1.0`.
    fn set_opacity(&mut self, opacity: f64);

    /// Draw a filled circle; `alpha` scales the coverage of this dot only.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64);

    /// Draw a line segment of the given thickness.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64);
}

/// Hands out a drawing surface when the animator mounts.
///
/// Returning `None` means no surface is available; the animator then stays
/// inert instead of failing the host.
pub trait SurfaceProvider {
    type Surface: Surface;

    fn acquire(&mut self, viewport: Viewport) -> Option<Self::Surface>;
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Dot {
        x: f64,
        y: f64,
        radius: f64,
        alpha: f64,
        color: StarColor,
    },
    Streak {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: StarColor,
    },
}

/// In-memory surface keeping the shapes of the current frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Viewport,
    color: StarColor,
    opacity: f64,
    shapes: Vec<Shape>,
    dot_calls: u64,
    streak_calls: u64,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            opacity: 1.0,
            ..Default::default()
        }
    }

    /// Shapes drawn since the last clear.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Total draw calls over the surface's lifetime.
    pub fn draw_calls(&self) -> u64 {
        self.dot_calls + self.streak_calls
    }

    pub fn dot_calls(&self) -> u64 {
        self.dot_calls
    }

    pub fn streak_calls(&self) -> u64 {
        self.streak_calls
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
        self.shapes.clear();
    }

    fn clear(&mut self) {
        self.shapes.clear();
        self.clears += 1;
    }

    fn set_color(&mut self, color: StarColor) {
        self.color = color;
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64) {
        self.dot_calls += 1;
        self.shapes.push(Shape::Dot {
            x,
            y,
            radius,
            alpha,
            color: self.color,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64) {
        self.streak_calls += 1;
        self.shapes.push(Shape::Streak {
            from,
            to,
            width,
            color: self.color,
        });
    }
}

/// Provider of [`RecordingSurface`]s for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurfaces;

impl SurfaceProvider for HeadlessSurfaces {
    type Surface = RecordingSurface;

    fn acquire(&mut self, viewport: Viewport) -> Option<RecordingSurface> {
        Some(RecordingSurface::new(viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_counts() {
        let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
        surface.set_color(StarColor::WHITE);
        surface.fill_circle(1.0, 1.0, 0.5, 1.0);
        surface.stroke_line((0.0, 0.0), (1.0, 1.0), 2.0);
        assert_eq!(surface.draw_calls(), 2);
        assert_eq!(surface.shapes().len(), 2);

        surface.clear();
        assert!(surface.shapes().is_empty());
        assert_eq!(surface.draw_calls(), 2);
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn test_recording_resize() {
        let mut surface = RecordingSurface::new(Viewport::new(10.0, 10.0));
        surface.resize(Viewport::new(20.0, 5.0));
        assert_eq!(surface.size(), Viewport::new(20.0, 5.0));
    }
}
