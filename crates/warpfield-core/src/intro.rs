//! Intro launch timeline.
//!
//! The field starts still and hidden, jumps to warp speed, then settles
//! into a slow cruise once the foreground content is revealed.

use std::time::Duration;

/// Phase of the intro sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntroPhase {
    /// Field hidden and frozen.
    #[default]
    Dashboard,
    /// Field visible at warp speed.
    Warp,
    /// Field visible at cruise speed; foreground shown.
    Cruise,
}

impl IntroPhase {
    /// Whether the field is visible in this phase.
    pub fn is_active(&self) -> bool {
        !matches!(self, IntroPhase::Dashboard)
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            IntroPhase::Dashboard => "standby",
            IntroPhase::Warp => "warp",
            IntroPhase::Cruise => "cruise",
        }
    }
}

/// Times and speeds of the intro phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroTimeline {
    /// Elapsed time at which warp begins.
    pub warp_at: Duration,
    /// Elapsed time at which cruise begins.
    pub cruise_at: Duration,
    pub warp_speed: f64,
    pub cruise_speed: f64,
}

impl Default for IntroTimeline {
    fn default() -> Self {
        Self {
            warp_at: Duration::from_millis(2000),
            cruise_at: Duration::from_millis(3500),
            warp_speed: 40.0,
            cruise_speed: 2.0,
        }
    }
}

impl IntroTimeline {
    /// Phase reached after `elapsed` since the intro started.
    pub fn phase_at(&self, elapsed: Duration) -> IntroPhase {
        if elapsed >= self.cruise_at {
            IntroPhase::Cruise
        } else if elapsed >= self.warp_at {
            IntroPhase::Warp
        } else {
            IntroPhase::Dashboard
        }
    }

    /// Field speed during `phase`.
    pub fn speed(&self, phase: IntroPhase) -> f64 {
        match phase {
            IntroPhase::Dashboard => 0.0,
            IntroPhase::Warp => self.warp_speed,
            IntroPhase::Cruise => self.cruise_speed,
        }
    }
}
