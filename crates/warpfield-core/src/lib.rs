//! Core types for the warpfield starfield animation.
//!
//! Shared between the animator, the configuration loader and the terminal
//! host: star colors, viewport geometry, field parameters, render modes and
//! the intro launch timeline.

mod color;
mod geometry;
mod intro;
mod params;

pub use color::{ColorParseError, ColorPreset, StarColor};
pub use geometry::Viewport;
pub use intro::{IntroPhase, IntroTimeline};
pub use params::{FieldParams, RenderMode};
