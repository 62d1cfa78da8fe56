use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use crate::{
    error::EngineError,
    formation::{ImageConfig, ImageParticles, LoadState},
    sampler::Raster,
    stage::{Animation, SimContext},
    surface::Surface,
    timer::FrameGate,
};

const UPDATE_RATE: u32 = 30;

/// Portrait revealed by [`ImageParticles`] once its section is shown.
pub struct Avatar {
    particles: ImageParticles,
    shown: bool,
    gate: FrameGate,
}

impl Avatar {
    /// Denser, larger particles than the [`ImageConfig`] defaults.
    pub fn config() -> ImageConfig {
        ImageConfig::default()
            .particle_size(1.9)
            .stride(3)
            .target_size(280)
    }

    pub fn new(particles: ImageParticles) -> Self {
        Self {
            particles,
            shown: false,
            gate: FrameGate::per_second(UPDATE_RATE),
        }
    }

    /// Loads `image` centered in `canvas`.
    pub fn load<R: Rng>(
        &mut self,
        image: Result<Raster, EngineError>,
        canvas: Vec2,
        rng: &mut R,
    ) -> &LoadState {
        self.particles.load(image, canvas, rng)
    }

    /// The reveal starts on the next tick; nothing happens until the image is loaded.
    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn particles(&self) -> &ImageParticles {
        &self.particles
    }
}

impl Animation for Avatar {
    fn tick(&mut self, _ctx: &SimContext, now: Duration) {
        if !self.shown || !self.particles.is_loaded() || !self.gate.ready(now) {
            return;
        }
        self.particles.start(now);
        self.particles.update(now);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.particles.draw(surface);
    }
}
