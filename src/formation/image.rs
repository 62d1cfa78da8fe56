use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};
use rand::Rng;

use crate::{
    error::EngineError,
    sampler::{Placement, Raster, Sampler},
    surface::{RoundedRect, Surface},
    timer::{Deadline, FrameGate},
};

use super::Particle;

/// Configuration for [`ImageParticles`]
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub particle_size: f32,
    pub stride: u32,
    /// Longest side of the image once fitted
    pub target_size: u32,
    pub alpha_threshold: u8,
    /// Appear delays are drawn from `[0, reveal_window]`; completion fires at this offset
    pub reveal_window: Duration,
    pub fade_duration: Duration,
    pub min_update_interval: Duration,
    pub corner_radius: f32,
}

impl ImageConfig {
    pub fn particle_size(mut self, size: f32) -> Self {
        self.particle_size = size;
        self
    }

    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    pub fn target_size(mut self, size: u32) -> Self {
        self.target_size = size;
        self
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            particle_size: 1.5,
            stride: 4,
            target_size: 200,
            alpha_threshold: 50,
            reveal_window: Duration::from_millis(4800),
            fade_duration: Duration::from_millis(400),
            min_update_interval: Duration::from_millis(16),
            corner_radius: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    Failed(EngineError),
}

/// Image revealed by particles fading in at random, staggered moments.
pub struct ImageParticles {
    config: ImageConfig,
    state: LoadState,
    particles: Vec<Particle>,
    frame: Option<RoundedRect>,
    started_at: Option<Duration>,
    gate: FrameGate,
    formed: bool,
    completion: Option<Deadline>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl ImageParticles {
    pub fn new(config: ImageConfig) -> Self {
        let gate = FrameGate::new(config.min_update_interval);
        Self {
            config,
            state: LoadState::NotLoaded,
            particles: vec![],
            frame: None,
            started_at: None,
            gate,
            formed: false,
            completion: None,
            on_complete: None,
        }
    }

    /// Called once, `reveal_window` after `start`. Particles still fading in at that
    /// point do not delay it.
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Takes the outcome of the host's image fetch/decode. A failure leaves the
    /// formation inert; a later successful `load` revives it.
    ///
    /// Every load disarms the reveal: a pending completion is dropped and
    /// `start` must be called again.
    pub fn load<R: Rng>(
        &mut self,
        image: Result<Raster, EngineError>,
        canvas: Vec2,
        rng: &mut R,
    ) -> &LoadState {
        let result = image.and_then(|raster| {
            if raster.is_empty() {
                Err(EngineError::EmptyImage)
            } else {
                Ok(raster)
            }
        });
        self.started_at = None;
        self.gate.reset();
        self.completion = None;
        self.formed = false;
        match result {
            Ok(raster) => {
                self.generate_particles(&raster, canvas, rng);
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!("image particles disabled: {}", err);
                self.particles.clear();
                self.frame = None;
                self.state = LoadState::Failed(err);
            }
        }
        &self.state
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Display bounds of the fitted image on the canvas.
    pub fn frame(&self) -> Option<RoundedRect> {
        self.frame
    }

    /// Size of the image once fitted into `target_size`, keeping its aspect ratio.
    pub fn fitted_size(&self, width: u32, height: u32) -> (u32, u32) {
        let target = self.config.target_size as f32;
        let aspect = width as f32 / height as f32;
        let (w, h) = if aspect > 1.0 {
            (target, target / aspect)
        } else {
            (target * aspect, target)
        };
        ((w as u32).max(1), (h as u32).max(1))
    }

    /// Samples the fitted image, centered on `canvas`, into fading particles.
    pub fn generate_particles<R: Rng>(&mut self, image: &Raster, canvas: Vec2, rng: &mut R) {
        let (w, h) = self.fitted_size(image.width(), image.height());
        let fitted = image.resized(w, h);
        let size = Vec2::new(w as f32, h as f32);
        let top_left = canvas / 2.0 - size / 2.0;

        let samples = Sampler::new(self.config.stride, self.config.alpha_threshold)
            .with_color()
            .sample(&fitted, &Placement::translate(top_left));

        let window = self.config.reveal_window.as_secs_f64();
        self.particles = samples
            .into_iter()
            .filter_map(|s| {
                let delay = Duration::from_secs_f64(rng.gen_range(0.0..=window));
                s.color.map(|color| Particle::fading(s.position, color, delay))
            })
            .collect();
        self.frame = Some(RoundedRect::new(top_left, size, self.config.corner_radius));
        self.formed = false;
        self.completion = None;
        info!("image formation: {} particles ({}x{})", self.particles.len(), w, h);
    }

    /// Arms the reveal. Later calls are ignored.
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Every particle has passed its appear delay.
    pub fn is_formed(&self) -> bool {
        self.formed
    }

    pub fn update(&mut self, now: Duration) {
        if !self.is_loaded() {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };

        self.poll_completion(now);

        if !self.gate.ready(now) {
            return;
        }

        let elapsed = now.saturating_sub(started_at);
        let fade = self.config.fade_duration.as_nanos() as f64;
        let mut all_visible = true;

        for particle in self.particles.iter_mut() {
            let delay = particle.appear_delay.unwrap_or_default();
            if elapsed >= delay {
                let faded = (elapsed - delay).as_nanos() as f64 / fade;
                particle.opacity = faded.min(1.0) as f32;
            } else {
                particle.opacity = 0.0;
                all_visible = false;
            }
        }

        if all_visible && !self.formed {
            self.formed = true;
            let remaining = self.config.reveal_window.saturating_sub(elapsed);
            debug!("all particles appearing after {:?}, completing in {:?}", elapsed, remaining);
            self.completion = Some(Deadline::after(now, remaining));
            self.poll_completion(now);
        }
    }

    fn poll_completion(&mut self, now: Duration) {
        let Some(deadline) = self.completion.as_mut() else {
            return;
        };
        if deadline.poll(now) {
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        if !self.is_loaded() || self.started_at.is_none() {
            return;
        }
        let Some(frame) = self.frame else {
            return;
        };

        surface.push_clip(frame);
        let size = Vec2::splat(self.config.particle_size);
        let half = size / 2.0;
        for particle in self.particles.iter().filter(|p| p.opacity > 0.0) {
            let Some(color) = particle.color else {
                continue;
            };
            surface.fill_rect(
                particle.current - half,
                size,
                color.with_alpha(color.a * particle.opacity),
            );
        }
        surface.pop_clip();
    }
}
