//! Interactive terminal host for the starfield.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Size},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use warpfield_config::Config;
use warpfield_core::{ColorPreset, IntroPhase, IntroTimeline};
use warpfield_starfield::{
    CanvasSurface, FrameScheduler, TerminalSurfaces, WarpAnimator, WarpOptions,
};

use crate::control::{SPEED_STEP, SpeedControl};

/// How long to wait for input when no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Title shown once the intro settles.
const TITLE: &str = "W A R P F I E L D";

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    surfaces: TerminalSurfaces,
    scheduler: FrameScheduler,
    animator: WarpAnimator<CanvasSurface>,
    /// Speed source: intro sequence or manual.
    control: SpeedControl,
    /// Visibility forced by the user, overriding the intro.
    active_override: Option<bool>,
    /// Current star color preset.
    preset: Option<ColorPreset>,
    seed: Option<u64>,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `size` cells.
    pub fn new(config: Config, size: Size, speed: Option<f64>, seed: Option<u64>) -> Self {
        let now = Instant::now();
        let surfaces = TerminalSurfaces {
            cell_width: config.cell_width_px,
            cell_height: config.cell_height_px,
            background: config.background,
        };
        let control = match speed {
            Some(speed) => SpeedControl::Manual { speed },
            None => SpeedControl::intro(config.intro.timeline(), now),
        };
        let seed = seed.or(config.seed);
        let mut scheduler = FrameScheduler::from_fps(config.fps);
        let animator = Self::mount(
            &config,
            surfaces,
            size,
            &control,
            now,
            seed,
            &mut scheduler,
        );

        Self {
            running: false,
            config,
            surfaces,
            scheduler,
            animator,
            control,
            active_override: None,
            preset: None,
            seed,
        }
    }

    fn mount(
        config: &Config,
        mut surfaces: TerminalSurfaces,
        size: Size,
        control: &SpeedControl,
        now: Instant,
        seed: Option<u64>,
        scheduler: &mut FrameScheduler,
    ) -> WarpAnimator<CanvasSurface> {
        let options = WarpOptions {
            speed: control.speed(now),
            active: control.active(now),
            star_color: config.star_color,
        };
        let viewport = surfaces.viewport(size.width, size.height);
        WarpAnimator::mount(
            &mut surfaces,
            viewport,
            config.field.params(),
            options,
            config.field.fade(),
            seed,
            scheduler,
        )
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let now = Instant::now();
            self.apply_controls(now);

            let due = self.scheduler.take_due(now);
            if !due.is_empty() {
                for handle in due {
                    self.animator.on_frame(handle, &mut self.scheduler);
                }
                terminal.draw(|frame| self.render(frame, now))?;
            }

            let timeout = self
                .scheduler
                .time_until_due(Instant::now())
                .unwrap_or(IDLE_POLL);
            self.handle_crossterm_events(timeout, terminal)?;
        }
        self.animator.dispose(&mut self.scheduler);
        Ok(())
    }

    /// Push the current speed, visibility and color into the animator.
    fn apply_controls(&mut self, now: Instant) {
        let active = self
            .active_override
            .unwrap_or_else(|| self.control.active(now));
        let star_color = self
            .preset
            .map(|preset| preset.color())
            .unwrap_or(self.config.star_color);
        self.animator.set_options(WarpOptions {
            speed: self.control.speed(now),
            active,
            star_color,
        });
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        if let Some(surface) = self.animator.surface() {
            frame.render_widget(surface, area);
        }

        let color = self.animator.options().star_color.to_color();
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(2), // Spacing
            Constraint::Length(1), // Tagline
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let phase = self.control.phase(now);
        if phase == IntroPhase::Cruise {
            frame.render_widget(
                Paragraph::new(TITLE.bold())
                    .style(Style::new().fg(color))
                    .alignment(Alignment::Center),
                chunks[1],
            );
            frame.render_widget(
                Paragraph::new("launch sequence complete")
                    .style(Style::new().fg(color))
                    .alignment(Alignment::Center),
                chunks[3],
            );
        }

        let options = self.animator.options();
        let mode = self.config.field.params().render_mode(options.speed);
        let status = Line::from(vec![
            phase.name().bold().fg(color),
            format!("  speed {:.1}  ", options.speed).dark_gray(),
            mode.name().fg(color),
            format!("  frames {}", self.animator.frames_drawn()).dark_gray(),
        ])
        .centered();
        frame.render_widget(status, chunks[5]);

        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "space".bold().fg(color),
            " show/hide  ".dark_gray(),
            "+/-".bold().fg(color),
            " speed  ".dark_gray(),
            "w".bold().fg(color),
            " warp  ".dark_gray(),
            "c".bold().fg(color),
            " color  ".dark_gray(),
            "r".bold().fg(color),
            " replay".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[6]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most until the next frame is due.
    fn handle_crossterm_events(
        &mut self,
        timeout: Duration,
        terminal: &mut DefaultTerminal,
    ) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.on_key_event(key, terminal)?
                }
                Event::Resize(cols, rows) => {
                    self.animator.on_resize(self.surfaces.viewport(cols, rows));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(
        &mut self,
        key: KeyEvent,
        terminal: &mut DefaultTerminal,
    ) -> color_eyre::Result<()> {
        let now = Instant::now();
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_active(now),
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.control.adjust(now, SPEED_STEP),
            (_, KeyCode::Char('-') | KeyCode::Char('_')) => {
                self.control.adjust(now, -SPEED_STEP)
            }
            (_, KeyCode::Char('w')) => self.toggle_warp(now),
            (_, KeyCode::Char('c')) => self.cycle_color(),
            (_, KeyCode::Char('r')) => self.replay(now, terminal.size()?),
            _ => {}
        }
        Ok(())
    }

    fn toggle_active(&mut self, now: Instant) {
        let active = self
            .active_override
            .unwrap_or_else(|| self.control.active(now));
        self.active_override = Some(!active);
    }

    fn toggle_warp(&mut self, now: Instant) {
        let timeline: IntroTimeline = self.config.intro.timeline();
        let threshold = self.config.field.warp_threshold;
        self.control.toggle_warp(now, &timeline, threshold);
    }

    /// Cycle through the star color presets.
    fn cycle_color(&mut self) {
        let preset = self.preset.unwrap_or_default().next();
        self.preset = Some(preset);
        info!("star color preset: {}", preset.name());
    }

    /// Tear the field down and launch a fresh one from the start of the
    /// intro.
    fn replay(&mut self, now: Instant, size: Size) {
        self.animator.dispose(&mut self.scheduler);
        self.control = SpeedControl::intro(self.config.intro.timeline(), now);
        self.active_override = None;
        self.animator = Self::mount(
            &self.config,
            self.surfaces,
            size,
            &self.control,
            now,
            self.seed,
            &mut self.scheduler,
        );
        info!("intro replayed");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
