//! Starfield tuning parameters and render modes.

/// Fixed per-field parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Number of particles in the field.
    pub count: usize,
    /// Perspective constant `K` in `scale = K / z`.
    pub projection: f64,
    /// Smallest dot radius or streak width.
    pub min_size: f64,
    /// Size reached by a particle right at the viewer.
    pub size_gain: f64,
    /// Speeds strictly above this switch to streaks.
    pub warp_threshold: f64,
    /// Streak tail sits at depth `z + streak_factor * speed`.
    pub streak_factor: f64,
    /// Fade distant dots in drift mode.
    pub depth_fade: bool,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            count: 500,
            projection: 200.0,
            min_size: 0.5,
            size_gain: 4.0,
            warp_threshold: 10.0,
            streak_factor: 2.0,
            depth_fade: true,
        }
    }
}

impl FieldParams {
    /// Render mode used at `speed`.
    pub fn render_mode(&self, speed: f64) -> RenderMode {
        RenderMode::for_speed(speed, self.warp_threshold)
    }
}

/// How particles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Filled dots.
    Drift,
    /// Motion streaks.
    Warp,
}

impl RenderMode {
    pub fn for_speed(speed: f64, threshold: f64) -> Self {
        if speed > threshold {
            RenderMode::Warp
        } else {
            RenderMode::Drift
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Drift => "drift",
            RenderMode::Warp => "warp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_threshold() {
        let params = FieldParams::default();
        assert_eq!(params.render_mode(0.0), RenderMode::Drift);
        assert_eq!(params.render_mode(10.0), RenderMode::Drift);
        assert_eq!(params.render_mode(10.001), RenderMode::Warp);
        assert_eq!(params.render_mode(11.0), RenderMode::Warp);
    }
}
