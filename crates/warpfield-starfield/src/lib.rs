//! Parallax starfield animation.
//!
//! A fixed population of particles flies toward the viewer. Each display
//! frame every particle loses depth by the current speed, is projected onto
//! the drawing surface and drawn either as a dot (drift) or as a motion
//! streak (warp). Particles that pass the camera respawn at the far plane.
//!
//! The animator never owns the display loop. The host drives it through a
//! [`FrameScheduler`], forwards resizes and supplies a [`Surface`] through a
//! [`SurfaceProvider`].

mod animator;
mod canvas;
mod field;
mod particle;
mod scheduler;
mod surface;

pub use animator::{AnimatorState, FieldStats, WarpAnimator, WarpOptions};
pub use canvas::{CanvasSurface, TerminalSurfaces};
pub use field::Starfield;
pub use particle::Particle;
pub use scheduler::{FrameHandle, FrameScheduler};
pub use surface::{HeadlessSurfaces, RecordingSurface, Shape, Surface, SurfaceProvider};
