//! Speed control: the intro launch sequence or manual input.

use std::time::Instant;

use warpfield_core::{IntroPhase, IntroTimeline};

/// Amount `+`/`-` change the speed by.
pub const SPEED_STEP: f64 = 1.0;

/// Where the field speed comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedControl {
    /// Follow the intro timeline started at `started`.
    Intro {
        timeline: IntroTimeline,
        started: Instant,
    },
    /// Fixed speed chosen by the user.
    Manual { speed: f64 },
}

impl SpeedControl {
    pub fn intro(timeline: IntroTimeline, now: Instant) -> Self {
        SpeedControl::Intro {
            timeline,
            started: now,
        }
    }

    /// Intro phase at `now`. Manual control counts as cruising.
    pub fn phase(&self, now: Instant) -> IntroPhase {
        match self {
            SpeedControl::Intro { timeline, started } => {
                timeline.phase_at(now.saturating_duration_since(*started))
            }
            SpeedControl::Manual { .. } => IntroPhase::Cruise,
        }
    }

    pub fn speed(&self, now: Instant) -> f64 {
        match self {
            SpeedControl::Intro { timeline, .. } => timeline.speed(self.phase(now)),
            SpeedControl::Manual { speed } => *speed,
        }
    }

    pub fn active(&self, now: Instant) -> bool {
        self.phase(now).is_active()
    }

    /// Take over manually, nudging the current speed by `delta`.
    pub fn adjust(&mut self, now: Instant, delta: f64) {
        let speed = (self.speed(now) + delta).max(0.0);
        *self = SpeedControl::Manual { speed };
    }

    /// Take over manually, jumping between cruise and warp speed.
    pub fn toggle_warp(&mut self, now: Instant, timeline: &IntroTimeline, threshold: f64) {
        let speed = if self.speed(now) > threshold {
            timeline.cruise_speed
        } else {
            timeline.warp_speed
        };
        *self = SpeedControl::Manual { speed };
    }
}
