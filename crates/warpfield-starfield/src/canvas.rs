//! Terminal drawing surface backed by a braille canvas.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Context, Line, Points},
    },
};
use warpfield_core::{StarColor, Viewport};

use crate::surface::{Shape, Surface, SurfaceProvider};

/// Braille dots per terminal cell, horizontally and vertically.
const DOTS_PER_CELL: (f64, f64) = (2.0, 4.0);

/// Surface collecting one frame of shapes for a ratatui [`Canvas`].
///
/// The surface is measured in virtual pixels; each terminal cell covers
/// `cell_width` x `cell_height` of them. Transparency is emulated by
/// blending the star color toward the terminal background.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    size: Viewport,
    color: StarColor,
    background: StarColor,
    opacity: f64,
    /// Width and height of one braille dot in pixels.
    dot: (f64, f64),
    shapes: Vec<Shape>,
}

impl CanvasSurface {
    pub fn new(size: Viewport, cell_width: f64, cell_height: f64, background: StarColor) -> Self {
        Self {
            size,
            color: StarColor::default(),
            background,
            opacity: 1.0,
            dot: (cell_width / DOTS_PER_CELL.0, cell_height / DOTS_PER_CELL.1),
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Longest distance visible on the surface. Dots and strokes are never
    /// painted larger than this.
    fn reach(&self) -> f64 {
        self.size.width.hypot(self.size.height)
    }

    /// Paint a recorded shape, flipping `y` into canvas coordinates.
    fn paint_shape(&self, ctx: &mut Context<'_>, shape: &Shape) {
        let height = self.size.height;
        let (dot_w, dot_h) = self.dot;
        let reach = self.reach();

        match *shape {
            Shape::Dot {
                x,
                y,
                radius,
                alpha,
                color,
            } => {
                let color = self.shade(color, alpha);
                let (x, y) = (x, height - y);
                let radius = clamp_extent(radius, reach);
                if radius < dot_w.max(dot_h) {
                    ctx.draw(&Points {
                        coords: &[(x, y)],
                        color,
                    });
                    return;
                }
                // fill with concentric rings one dot apart
                let rings = (radius / dot_w).ceil() as usize;
                for i in 0..rings {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: radius - i as f64 * dot_w,
                        color,
                    });
                }
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color,
                });
            }
            Shape::Streak {
                from,
                to,
                width,
                color,
            } => {
                let color = self.shade(color, 1.0);
                let (x1, y1) = (from.0, height - from.1);
                let (x2, y2) = (to.0, height - to.1);
                let (dx, dy) = (x2 - x1, y2 - y1);
                let len = (dx * dx + dy * dy).sqrt();
                if len.is_nan() || len <= 0.0 {
                    ctx.draw(&Points {
                        coords: &[(x1, y1)],
                        color,
                    });
                    return;
                }

                // thick strokes become parallel lines one dot apart
                let width = clamp_extent(width, reach);
                let strokes = (width / dot_w).round().max(1.0) as usize;
                let (nx, ny) = (-dy / len, dx / len);
                let middle = (strokes - 1) as f64 / 2.0;
                for i in 0..strokes {
                    let offset = (i as f64 - middle) * dot_w;
                    let (ox, oy) = (nx * offset, ny * offset);
                    ctx.draw(&Line::new(x1 + ox, y1 + oy, x2 + ox, y2 + oy, color));
                }
            }
        }
    }

    fn shade(&self, color: StarColor, alpha: f64) -> ratatui::style::Color {
        color
            .blend(self.background, alpha * self.opacity)
            .to_color()
    }
}

/// `extent` limited to `[0, reach]`, with NaN treated as zero.
fn clamp_extent(extent: f64, reach: f64) -> f64 {
    if extent.is_nan() {
        0.0
    } else {
        extent.clamp(0.0, reach)
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
        self.shapes.clear();
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn set_color(&mut self, color: StarColor) {
        self.color = color;
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, alpha: f64) {
        self.shapes.push(Shape::Dot {
            x,
            y,
            radius,
            alpha,
            color: self.color,
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64) {
        self.shapes.push(Shape::Streak {
            from,
            to,
            width,
            color: self.color,
        });
    }
}

impl Widget for &CanvasSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.opacity.is_nan() || self.opacity <= 0.0 || self.size.is_empty() {
            return;
        }

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, self.size.width])
            .y_bounds([0.0, self.size.height])
            .paint(|ctx| {
                for shape in &self.shapes {
                    self.paint_shape(ctx, shape);
                }
            })
            .render(area, buf);
    }
}

/// Provider of [`CanvasSurface`]s for a terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSurfaces {
    pub cell_width: f64,
    pub cell_height: f64,
    pub background: StarColor,
}

impl TerminalSurfaces {
    /// Viewport in pixels for a terminal of `cols` x `rows` cells.
    pub fn viewport(&self, cols: u16, rows: u16) -> Viewport {
        Viewport::from_cells(cols, rows, self.cell_width, self.cell_height)
    }
}

impl SurfaceProvider for TerminalSurfaces {
    type Surface = CanvasSurface;

    fn acquire(&mut self, viewport: Viewport) -> Option<CanvasSurface> {
        if viewport.is_empty() || !has_area(self.cell_width, self.cell_height) {
            return None;
        }
        Some(CanvasSurface::new(
            viewport,
            self.cell_width,
            self.cell_height,
            self.background,
        ))
    }
}

fn has_area(width: f64, height: f64) -> bool {
    width > 0.0 && height > 0.0
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    fn surfaces() -> TerminalSurfaces {
        TerminalSurfaces {
            cell_width: 8.0,
            cell_height: 16.0,
            background: StarColor::BLACK,
        }
    }

    fn lit_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|c| c.symbol() != " ").count()
    }

    #[test]
    fn test_acquire_requires_area() {
        let mut provider = surfaces();
        assert!(provider.acquire(Viewport::default()).is_none());
        assert!(provider.acquire(provider.viewport(10, 5)).is_some());
    }

    #[test]
    fn test_renders_dot_and_streak() {
        let mut provider = surfaces();
        let mut surface = provider.acquire(provider.viewport(10, 5)).unwrap();
        surface.set_color(StarColor::WHITE);
        surface.fill_circle(40.0, 40.0, 1.0, 1.0);
        surface.stroke_line((0.0, 0.0), (79.0, 79.0), 1.0);

        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(lit_cells(&buf) > 1);
        assert!(
            buf.content()
                .iter()
                .any(|c| c.symbol() != " " && c.fg == Color::Rgb(255, 255, 255))
        );
    }

    #[test]
    fn test_transparent_surface_paints_nothing() {
        let mut provider = surfaces();
        let mut surface = provider.acquire(provider.viewport(10, 5)).unwrap();
        surface.fill_circle(40.0, 40.0, 4.0, 1.0);
        surface.set_opacity(0.0);

        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert_eq!(lit_cells(&buf), 0);
    }

    #[test]
    fn test_faded_dot_blends_toward_background() {
        let mut provider = surfaces();
        let mut surface = provider.acquire(provider.viewport(4, 2)).unwrap();
        surface.set_color(StarColor::rgb(200, 200, 200));
        surface.set_opacity(0.5);
        surface.fill_circle(16.0, 16.0, 0.5, 1.0);

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(
            buf.content()
                .iter()
                .any(|c| c.symbol() != " " && c.fg == Color::Rgb(100, 100, 100))
        );
    }

    #[test]
    fn test_oversized_shapes_fill_viewport() {
        let mut provider = surfaces();
        let mut surface = provider.acquire(provider.viewport(80, 24)).unwrap();
        surface.fill_circle(320.0, 192.0, f64::INFINITY, 1.0);
        surface.fill_circle(320.0, 192.0, 4.0e6, 1.0);
        surface.stroke_line((0.0, 0.0), (639.0, 383.0), f64::INFINITY);
        surface.fill_circle(10.0, 10.0, f64::NAN, 1.0);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(lit_cells(&buf) > 80 * 24 / 2);
    }

    #[test]
    fn test_acquire_rejects_bad_cell_size() {
        let mut provider = TerminalSurfaces {
            cell_width: f64::NAN,
            ..surfaces()
        };
        assert!(provider.acquire(Viewport::new(64.0, 64.0)).is_none());
    }

    #[test]
    fn test_resize_clears_shapes() {
        let mut provider = surfaces();
        let mut surface = provider.acquire(provider.viewport(4, 2)).unwrap();
        surface.fill_circle(1.0, 1.0, 1.0, 1.0);
        surface.resize(Viewport::new(64.0, 64.0));
        assert!(surface.shapes().is_empty());
        assert_eq!(surface.size(), Viewport::new(64.0, 64.0));
    }
}
