//! Particle population: simulation step and draw pass.

use rand::{SeedableRng, rngs::StdRng};
use warpfield_core::{FieldParams, RenderMode, Viewport};

use crate::particle::Particle;
use crate::surface::Surface;

/// The particle population of one animator.
#[derive(Debug, Clone)]
pub struct Starfield {
    particles: Vec<Particle>,
    params: FieldParams,
    rng: StdRng,
    /// Respawns since creation.
    respawns: u64,
}

impl Starfield {
    /// Populate a field for `viewport`. A seed makes the field reproducible.
    pub fn new(viewport: Viewport, params: FieldParams, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let particles = (0..params.count)
            .map(|_| Particle::spawn(&mut rng, viewport))
            .collect();

        Self {
            particles,
            params,
            rng,
            respawns: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Move every particle `speed` closer and respawn the ones that passed
    /// the camera. Returns the number respawned this step.
    pub fn advance(&mut self, speed: f64, viewport: Viewport) -> usize {
        let mut respawned = 0;
        for particle in &mut self.particles {
            if particle.advance(speed) {
                particle.respawn(&mut self.rng, viewport);
                respawned += 1;
            }
        }
        self.respawns += respawned as u64;
        respawned
    }

    /// Draw every particle onto `surface` in the style for `speed`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, speed: f64, viewport: Viewport) {
        let FieldParams {
            projection,
            min_size,
            size_gain,
            streak_factor,
            depth_fade,
            ..
        } = self.params;
        let mode = self.params.render_mode(speed);

        for particle in &self.particles {
            let head = particle.project(viewport, projection);
            let proximity = particle.proximity(viewport);
            let size = (proximity * size_gain).max(min_size);

            match mode {
                RenderMode::Warp => {
                    let tail =
                        particle.project_at(particle.z + speed * streak_factor, viewport, projection);
                    surface.stroke_line(head, tail, size);
                }
                RenderMode::Drift => {
                    let alpha = if depth_fade {
                        proximity.clamp(0.0, 1.0)
                    } else {
                        1.0
                    };
                    surface.fill_circle(head.0, head.1, size, alpha);
                }
            }
        }
    }

    /// Smallest and largest depth in the field.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        self.particles.iter().fold(None, |range, p| match range {
            None => Some((p.z, p.z)),
            Some((lo, hi)) => Some((lo.min(p.z), hi.max(p.z))),
        })
    }
}
