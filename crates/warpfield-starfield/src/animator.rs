//! The warp animator: lifecycle around a starfield and its surface.

use std::time::Duration;

use log::{debug, trace, warn};
use warpfield_core::{FieldParams, RenderMode, StarColor, Viewport};

use crate::field::Starfield;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::{Surface, SurfaceProvider};

/// Externally controlled options, read at the start of every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpOptions {
    /// Depth removed from every particle per frame.
    pub speed: f64,
    /// Surface visibility. The simulation runs either way.
    pub active: bool,
    pub star_color: StarColor,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            speed: 0.0,
            active: true,
            star_color: StarColor::TEAL,
        }
    }
}

/// Lifecycle state of a [`WarpAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    /// Frame loop scheduled, resize listener attached.
    Running,
    /// Torn down. Terminal.
    Disposed,
    /// Mounted without a surface; never draws or schedules. Terminal.
    Inert,
}

/// Aggregate counters of a running field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub frames: u64,
    pub respawns: u64,
    pub particles: usize,
    pub min_depth: f64,
    pub max_depth: f64,
    pub mode: RenderMode,
}

/// What a mounted animator owns.
#[derive(Debug)]
struct Stage<S> {
    surface: S,
    field: Starfield,
    pending: Option<FrameHandle>,
}

/// Opacity easing toward the `active` target.
#[derive(Debug, Clone, Copy)]
struct Fade {
    opacity: f64,
    duration: Duration,
}

impl Fade {
    fn new(active: bool, duration: Duration) -> Self {
        Self {
            opacity: if active { 1.0 } else { 0.0 },
            duration,
        }
    }

    fn advance(&mut self, active: bool, elapsed: Duration) {
        let target = if active { 1.0 } else { 0.0 };
        if self.duration.is_zero() {
            self.opacity = target;
            return;
        }
        let step = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // snap to the target within rounding error
        self.opacity = if (target - self.opacity).abs() <= step + 1e-9 {
            target
        } else if target > self.opacity {
            (self.opacity + step).min(target)
        } else {
            (self.opacity - step).max(target)
        };
    }
}

/// A starfield animation mounted on a drawing surface.
///
/// Mounting acquires a surface, populates the field and requests the first
/// frame. Every handled frame requests the next one until [`dispose`]
/// cancels it.
///
/// [`dispose`]: WarpAnimator::dispose
#[derive(Debug)]
pub struct WarpAnimator<S: Surface> {
    state: AnimatorState,
    options: WarpOptions,
    stage: Option<Stage<S>>,
    fade: Fade,
    frames: u64,
}

impl<S: Surface> WarpAnimator<S> {
    /// Mount a new animator.
    ///
    /// When `provider` has no surface to give the animator is inert: it
    /// draws nothing and schedules nothing.
    pub fn mount<P>(
        provider: &mut P,
        viewport: Viewport,
        params: FieldParams,
        options: WarpOptions,
        fade: Duration,
        seed: Option<u64>,
        scheduler: &mut FrameScheduler,
    ) -> Self
    where
        P: SurfaceProvider<Surface = S>,
    {
        let options = WarpOptions {
            speed: sanitize_speed(options.speed),
            ..options
        };
        let fade = Fade::new(options.active, fade);

        let Some(mut surface) = provider.acquire(viewport) else {
            warn!("no drawing surface available, starfield disabled");
            return Self {
                state: AnimatorState::Inert,
                options,
                stage: None,
                fade,
                frames: 0,
            };
        };

        surface.resize(viewport);
        let field = Starfield::new(viewport, params, seed);
        let pending = Some(scheduler.request_frame());
        debug!(
            "starfield mounted: {} particles on {}x{}",
            params.count, viewport.width, viewport.height
        );

        Self {
            state: AnimatorState::Running,
            options,
            stage: Some(Stage {
                surface,
                field,
                pending,
            }),
            fade,
            frames: 0,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn options(&self) -> WarpOptions {
        self.options
    }

    /// Replace all options; applied on the next frame.
    pub fn set_options(&mut self, options: WarpOptions) {
        self.options = WarpOptions {
            speed: sanitize_speed(options.speed),
            ..options
        };
    }

    /// Negative and non-finite speeds are clamped to zero.
    pub fn set_speed(&mut self, speed: f64) {
        self.options.speed = sanitize_speed(speed);
    }

    pub fn set_active(&mut self, active: bool) {
        self.options.active = active;
    }

    pub fn set_star_color(&mut self, color: StarColor) {
        self.options.star_color = color;
    }

    /// Current surface opacity.
    pub fn opacity(&self) -> f64 {
        self.fade.opacity
    }

    /// Frames handled since mounting.
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// The drawing surface, while mounted.
    pub fn surface(&self) -> Option<&S> {
        self.stage.as_ref().map(|stage| &stage.surface)
    }

    pub fn stats(&self) -> Option<FieldStats> {
        let stage = self.stage.as_ref()?;
        let (min_depth, max_depth) = stage.field.depth_range().unwrap_or((0.0, 0.0));
        Some(FieldStats {
            frames: self.frames,
            respawns: stage.field.respawns(),
            particles: stage.field.particles().len(),
            min_depth,
            max_depth,
            mode: stage.field.params().render_mode(self.options.speed),
        })
    }

    /// Resize listener: match the surface to the new viewport.
    ///
    /// Particles keep their coordinates; they move into the new frame as
    /// they respawn.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.state != AnimatorState::Running {
            return;
        }
        if let Some(stage) = self.stage.as_mut() {
            debug!("starfield resized to {}x{}", viewport.width, viewport.height);
            stage.surface.resize(viewport);
        }
    }

    /// Handle a fired frame. Returns false when the frame was not ours or
    /// the animator is no longer running.
    pub fn on_frame(&mut self, handle: FrameHandle, scheduler: &mut FrameScheduler) -> bool {
        if self.state != AnimatorState::Running {
            return false;
        }
        let Some(stage) = self.stage.as_mut() else {
            return false;
        };
        if stage.pending != Some(handle) {
            return false;
        }
        stage.pending = None;

        let WarpOptions {
            speed,
            active,
            star_color,
        } = self.options;
        self.fade.advance(active, scheduler.interval());

        let viewport = stage.surface.size();
        stage.surface.set_opacity(self.fade.opacity);
        stage.surface.clear();
        stage.surface.set_color(star_color);

        if !viewport.is_empty() {
            let respawned = stage.field.advance(speed, viewport);
            if respawned > 0 {
                trace!("frame {}: {} particles respawned", self.frames, respawned);
            }
            stage.field.draw(&mut stage.surface, speed, viewport);
        }

        self.frames += 1;
        stage.pending = Some(scheduler.request_frame());
        true
    }

    /// Tear down: cancel the pending frame, detach from resizes and drop
    /// the field and surface.
    pub fn dispose(&mut self, scheduler: &mut FrameScheduler) {
        if self.state != AnimatorState::Running {
            return;
        }
        if let Some(handle) = self.stage.take().and_then(|stage| stage.pending) {
            scheduler.cancel_frame(handle);
        }
        self.state = AnimatorState::Disposed;
        debug!("starfield disposed after {} frames", self.frames);
    }
}

fn sanitize_speed(speed: f64) -> f64 {
    if speed.is_finite() { speed.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::surface::{HeadlessSurfaces, RecordingSurface, Shape};

    struct NoSurface;

    impl SurfaceProvider for NoSurface {
        type Surface = RecordingSurface;

        fn acquire(&mut self, _viewport: Viewport) -> Option<RecordingSurface> {
            None
        }
    }

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn mount(
        options: WarpOptions,
        scheduler: &mut FrameScheduler,
    ) -> WarpAnimator<RecordingSurface> {
        WarpAnimator::mount(
            &mut HeadlessSurfaces,
            VIEWPORT,
            FieldParams::default(),
            options,
            Duration::from_millis(1000),
            Some(1234),
            scheduler,
        )
    }

    /// Fire `frames` refreshes, one interval apart.
    fn run(
        animator: &mut WarpAnimator<RecordingSurface>,
        scheduler: &mut FrameScheduler,
        start: Instant,
        frames: u32,
    ) -> Instant {
        let mut now = start;
        for _ in 0..frames {
            for handle in scheduler.take_due(now) {
                animator.on_frame(handle, scheduler);
            }
            now += scheduler.interval();
        }
        now
    }

    fn depths(animator: &WarpAnimator<RecordingSurface>) -> Vec<f64> {
        let stage = animator.stage.as_ref().unwrap();
        stage.field.particles().iter().map(|p| p.z).collect()
    }

    #[test]
    fn test_mount_schedules_first_frame() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let animator = mount(WarpOptions::default(), &mut scheduler);
        assert_eq!(animator.state(), AnimatorState::Running);
        assert_eq!(
            scheduler.time_until_due(Instant::now()),
            Some(Duration::ZERO)
        );
        assert_eq!(animator.surface().unwrap().size(), VIEWPORT);
    }

    #[test]
    fn test_long_run_keeps_depth_in_range() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let options = WarpOptions {
            speed: 1.0,
            ..Default::default()
        };
        let mut animator = mount(options, &mut scheduler);
        run(&mut animator, &mut scheduler, Instant::now(), 1000);

        assert_eq!(animator.frames_drawn(), 1000);
        for z in depths(&animator) {
            assert!(z > 0.0 && z <= 800.0, "depth {z} out of range");
        }
        let stats = animator.stats().unwrap();
        assert_eq!(stats.particles, 500);
        assert!(stats.respawns >= 1);
        assert_eq!(stats.mode, RenderMode::Drift);
    }

    #[test]
    fn test_zero_speed_is_frozen() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let mut animator = mount(WarpOptions::default(), &mut scheduler);
        let before = depths(&animator);
        run(&mut animator, &mut scheduler, Instant::now(), 200);
        assert_eq!(animator.frames_drawn(), 200);
        assert_eq!(depths(&animator), before);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let options = WarpOptions {
            speed: 25.0,
            ..Default::default()
        };
        let start = Instant::now();

        let mut sa = FrameScheduler::from_fps(60);
        let mut a = mount(options, &mut sa);
        run(&mut a, &mut sa, start, 120);

        let mut sb = FrameScheduler::from_fps(60);
        let mut b = mount(options, &mut sb);
        run(&mut b, &mut sb, start, 120);

        assert_eq!(a.surface().unwrap().shapes(), b.surface().unwrap().shapes());
    }

    #[test]
    fn test_mode_boundary() {
        let start = Instant::now();
        for (speed, streak) in [(10.0, false), (11.0, true)] {
            let mut scheduler = FrameScheduler::from_fps(60);
            let options = WarpOptions {
                speed,
                ..Default::default()
            };
            let mut animator = mount(options, &mut scheduler);
            run(&mut animator, &mut scheduler, start, 1);

            let shapes = animator.surface().unwrap().shapes();
            assert_eq!(shapes.len(), 500);
            assert!(
                shapes
                    .iter()
                    .all(|s| matches!(s, Shape::Streak { .. }) == streak),
                "speed {speed}"
            );
        }
    }

    #[test]
    fn test_speed_change_applies_next_frame() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let mut animator = mount(WarpOptions::default(), &mut scheduler);
        let start = run(&mut animator, &mut scheduler, Instant::now(), 1);

        animator.set_speed(40.0);
        run(&mut animator, &mut scheduler, start, 1);
        assert_eq!(animator.surface().unwrap().streak_calls(), 500);
        assert_eq!(animator.stats().unwrap().mode, RenderMode::Warp);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let mut animator = mount(WarpOptions::default(), &mut scheduler);
        let before = animator.stage.as_ref().unwrap().field.particles().to_vec();

        let smaller = Viewport::new(320.0, 200.0);
        animator.on_resize(smaller);
        assert_eq!(animator.surface().unwrap().size(), smaller);
        assert_eq!(animator.stage.as_ref().unwrap().field.particles(), &before[..]);
    }

    #[test]
    fn test_inactive_still_simulates() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let options = WarpOptions {
            speed: 5.0,
            active: false,
            ..Default::default()
        };
        let mut animator = mount(options, &mut scheduler);
        assert_eq!(animator.opacity(), 0.0);

        let before = depths(&animator);
        run(&mut animator, &mut scheduler, Instant::now(), 10);
        assert_ne!(depths(&animator), before);
        assert_eq!(animator.surface().unwrap().opacity(), 0.0);
        assert_eq!(animator.surface().unwrap().dot_calls(), 5000);
    }

    #[test]
    fn test_opacity_fades_with_active() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(100));
        let options = WarpOptions {
            active: false,
            ..Default::default()
        };
        let mut animator = mount(options, &mut scheduler);

        animator.set_active(true);
        let now = run(&mut animator, &mut scheduler, Instant::now(), 5);
        assert!((animator.opacity() - 0.5).abs() < 1e-9);
        let now = run(&mut animator, &mut scheduler, now, 5);
        assert_eq!(animator.opacity(), 1.0);
        let now = run(&mut animator, &mut scheduler, now, 5);
        assert_eq!(animator.opacity(), 1.0);

        animator.set_active(false);
        run(&mut animator, &mut scheduler, now, 20);
        assert_eq!(animator.opacity(), 0.0);
    }

    #[test]
    fn test_negative_speed_is_clamped() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let options = WarpOptions {
            speed: -5.0,
            ..Default::default()
        };
        let mut animator = mount(options, &mut scheduler);
        assert_eq!(animator.options().speed, 0.0);
        animator.set_speed(f64::NAN);
        assert_eq!(animator.options().speed, 0.0);
        animator.set_speed(-1.0);
        assert_eq!(animator.options().speed, 0.0);
    }

    #[test]
    fn test_dispose_stops_drawing() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let options = WarpOptions {
            speed: 3.0,
            ..Default::default()
        };
        let mut animator = mount(options, &mut scheduler);
        let now = run(&mut animator, &mut scheduler, Instant::now(), 10);
        assert_eq!(animator.frames_drawn(), 10);

        animator.dispose(&mut scheduler);
        assert_eq!(animator.state(), AnimatorState::Disposed);
        assert!(animator.surface().is_none());
        assert_eq!(scheduler.time_until_due(now), None);

        run(&mut animator, &mut scheduler, now, 100);
        assert_eq!(animator.frames_drawn(), 10);

        // no way back
        animator.on_resize(VIEWPORT);
        animator.dispose(&mut scheduler);
        assert_eq!(animator.state(), AnimatorState::Disposed);
    }

    #[test]
    fn test_foreign_frame_is_ignored() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let mut animator = mount(WarpOptions::default(), &mut scheduler);
        let foreign = scheduler.request_frame();
        let due = scheduler.take_due(Instant::now());
        assert_eq!(due.len(), 2);
        assert!(!animator.on_frame(foreign, &mut scheduler));
        assert!(animator.on_frame(due[0], &mut scheduler));
        assert_eq!(animator.frames_drawn(), 1);
    }

    #[test]
    fn test_missing_surface_is_inert() {
        let mut scheduler = FrameScheduler::from_fps(60);
        let mut animator: WarpAnimator<RecordingSurface> = WarpAnimator::mount(
            &mut NoSurface,
            VIEWPORT,
            FieldParams::default(),
            WarpOptions::default(),
            Duration::ZERO,
            None,
            &mut scheduler,
        );
        assert_eq!(animator.state(), AnimatorState::Inert);
        assert_eq!(scheduler.time_until_due(Instant::now()), None);
        assert!(animator.surface().is_none());
        assert!(animator.stats().is_none());

        animator.dispose(&mut scheduler);
        assert_eq!(animator.state(), AnimatorState::Inert);
    }
}
