//! Headless simulation command.

use std::time::Instant;

use color_eyre::eyre::eyre;
use log::info;
use serde::Serialize;
use warpfield_config::Config;
use warpfield_core::Viewport;
use warpfield_starfield::{FrameScheduler, HeadlessSurfaces, WarpAnimator, WarpOptions};

use crate::cli::SimulateArgs;

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub frames: u64,
    pub particles: usize,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub mode: &'static str,
    pub respawns: u64,
    pub dot_calls: u64,
    pub streak_calls: u64,
    pub min_depth: f64,
    pub max_depth: f64,
}

/// Run the field for `args.frames` refreshes on an in-memory surface.
///
/// Refreshes are fired on a synthetic clock, so the run takes as long as
/// the computation and not the wall time of the frames.
pub fn simulate(args: &SimulateArgs, config: &Config) -> color_eyre::Result<SimulationReport> {
    let viewport = Viewport::new(args.width, args.height);
    let mut params = config.field.params();
    if let Some(count) = args.count {
        params.count = count;
    }
    let options = WarpOptions {
        speed: args.speed,
        active: true,
        star_color: config.star_color,
    };

    let mut scheduler = FrameScheduler::from_fps(config.fps);
    let mut animator = WarpAnimator::mount(
        &mut HeadlessSurfaces,
        viewport,
        params,
        options,
        config.field.fade(),
        args.seed.or(config.seed),
        &mut scheduler,
    );

    let mut now = Instant::now();
    while animator.frames_drawn() < args.frames {
        let due = scheduler.take_due(now);
        if due.is_empty() && scheduler.time_until_due(now).is_none() {
            break;
        }
        for handle in due {
            animator.on_frame(handle, &mut scheduler);
        }
        now += scheduler.interval();
    }

    let stats = animator
        .stats()
        .ok_or_else(|| eyre!("starfield could not be mounted"))?;
    let surface = animator
        .surface()
        .ok_or_else(|| eyre!("starfield has no surface"))?;
    info!(
        "simulated {} frames, {} respawns, depth {:.2}..={:.2}",
        stats.frames, stats.respawns, stats.min_depth, stats.max_depth
    );

    let report = SimulationReport {
        frames: stats.frames,
        particles: stats.particles,
        width: viewport.width,
        height: viewport.height,
        speed: animator.options().speed,
        mode: stats.mode.name(),
        respawns: stats.respawns,
        dot_calls: surface.dot_calls(),
        streak_calls: surface.streak_calls(),
        min_depth: stats.min_depth,
        max_depth: stats.max_depth,
    };
    animator.dispose(&mut scheduler);
    Ok(report)
}

/// Run the `simulate` command.
pub fn execute(args: &SimulateArgs, config: &Config) -> color_eyre::Result<()> {
    let report = simulate(args, config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("frames        {}", report.frames);
        println!("particles     {}", report.particles);
        println!("viewport      {}x{}", report.width, report.height);
        println!("speed         {} ({})", report.speed, report.mode);
        println!("respawns      {}", report.respawns);
        println!("dots drawn    {}", report.dot_calls);
        println!("streaks drawn {}", report.streak_calls);
        println!(
            "depth range   {:.2} ..= {:.2}",
            report.min_depth, report.max_depth
        );
    }
    Ok(())
}
