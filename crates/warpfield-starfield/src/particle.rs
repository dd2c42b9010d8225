//! A single star.

use rand::Rng;
use warpfield_core::Viewport;

/// One star of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal offset from the viewport center.
    pub x: f64,
    /// Vertical offset from the viewport center.
    pub y: f64,
    /// Depth, shrinking toward the viewer.
    pub z: f64,
}

impl Particle {
    /// Spawn a particle anywhere in the viewing volume, `z` in `(0, width]`.
    pub fn spawn<R: Rng>(rng: &mut R, viewport: Viewport) -> Self {
        let far = far_plane(viewport);
        let (x, y) = random_offset(rng, viewport);
        Self {
            x,
            y,
            z: far - uniform(rng, far),
        }
    }

    /// Move to a new random offset on the far plane.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, viewport: Viewport) {
        let (x, y) = random_offset(rng, viewport);
        self.x = x;
        self.y = y;
        self.z = far_plane(viewport);
    }

    /// Advance toward the viewer. Returns true once the particle has passed
    /// the camera.
    pub fn advance(&mut self, speed: f64) -> bool {
        self.z -= speed;
        self.z <= 0.0
    }

    /// Screen position at the particle's own depth.
    pub fn project(&self, viewport: Viewport, projection: f64) -> (f64, f64) {
        self.project_at(self.z, viewport, projection)
    }

    /// Screen position the particle would have at `depth`.
    pub fn project_at(&self, depth: f64, viewport: Viewport, projection: f64) -> (f64, f64) {
        let (cx, cy) = viewport.center();
        let scale = projection / depth;
        (cx + self.x * scale, cy + self.y * scale)
    }

    /// `0.0` at the far plane, approaching `1.0` near the viewer.
    pub fn proximity(&self, viewport: Viewport) -> f64 {
        1.0 - self.z / far_plane(viewport)
    }
}

/// Depth of the far plane: the viewport width, or one pixel when the width
/// is not a positive finite number.
pub(crate) fn far_plane(viewport: Viewport) -> f64 {
    if viewport.width.is_finite() && viewport.width > 0.0 {
        viewport.width
    } else {
        1.0
    }
}

fn random_offset<R: Rng>(rng: &mut R, viewport: Viewport) -> (f64, f64) {
    let (cx, cy) = viewport.center();
    (
        uniform(rng, viewport.width) - cx,
        uniform(rng, viewport.height) - cy,
    )
}

/// Uniform in `[0, extent)`, or `0` for a degenerate extent.
fn uniform<R: Rng>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_spawn_within_volume() {
        let mut rng = StdRng::seed_from_u64(7);
        let vp = Viewport::new(800.0, 600.0);
        for _ in 0..10_000 {
            let p = Particle::spawn(&mut rng, vp);
            assert!(p.z > 0.0 && p.z <= 800.0, "z out of range: {}", p.z);
            assert!((-400.0..400.0).contains(&p.x));
            assert!((-300.0..300.0).contains(&p.y));
        }
    }

    #[test]
    fn test_respawn_at_far_plane() {
        let mut rng = StdRng::seed_from_u64(7);
        let vp = Viewport::new(800.0, 600.0);
        let mut p = Particle { x: 1.0, y: 2.0, z: -3.0 };
        p.respawn(&mut rng, vp);
        assert_eq!(p.z, 800.0);
    }

    #[test]
    fn test_advance_reports_passing_camera() {
        let mut p = Particle { x: 0.0, y: 0.0, z: 5.0 };
        assert!(!p.advance(4.0));
        assert!(p.advance(1.0));
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_projection() {
        let vp = Viewport::new(800.0, 600.0);
        let p = Particle { x: 100.0, y: -50.0, z: 400.0 };
        // scale = 200 / 400 = 0.5
        assert_eq!(p.project(vp, 200.0), (450.0, 275.0));
        // deeper tail point sits closer to the center
        let (tx, ty) = p.project_at(800.0, vp, 200.0);
        assert_eq!((tx, ty), (425.0, 287.5));
        assert_eq!(p.proximity(vp), 0.5);
    }

    #[test]
    fn test_degenerate_viewport() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::spawn(&mut rng, Viewport::default());
        assert!(p.z > 0.0 && p.z <= 1.0);
    }

    #[test]
    fn test_sub_pixel_viewport() {
        let mut rng = StdRng::seed_from_u64(3);
        let vp = Viewport::new(0.5, 10.0);
        for _ in 0..1000 {
            let mut p = Particle::spawn(&mut rng, vp);
            assert!(p.z > 0.0 && p.z <= 0.5, "z out of range: {}", p.z);
            p.respawn(&mut rng, vp);
            assert_eq!(p.z, 0.5);
        }
    }
}
