use glam::Vec2;
use log::info;

use crate::{
    error::EngineError,
    properties::Body,
    sampler::{Placement, Sample, Sampler, TextRasterizer},
    surface::{palette, Surface},
    vector::VectorOps,
};

use super::Particle;

/// Configuration for [`TextParticles`]
#[derive(Clone, Debug)]
pub struct TextConfig {
    /// Offscreen raster the text is rendered into
    pub raster_size: (u32, u32),
    /// Where the text is centered horizontally and where its baseline sits
    pub text_center_x: f32,
    pub baseline: f32,
    /// Point of the raster that maps onto the formation origin
    pub anchor: Vec2,
    /// Horizontal squeeze applied when mapping raster pixels to the target
    pub scale: Vec2,
    pub stride: u32,
    pub alpha_threshold: u8,
    pub spring: f32,
    pub damping: f32,
    /// A particle counts as settled once closer than this to its target
    pub settle_distance: f32,
    pub particle_size: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            raster_size: (800, 100),
            text_center_x: 400.0,
            baseline: 60.0,
            anchor: Vec2::new(400.0, 50.0),
            scale: Vec2::new(0.8, 1.0),
            stride: 6,
            alpha_threshold: 128,
            spring: 0.10,
            damping: 0.86,
            settle_distance: 2.0,
            particle_size: 2.0,
        }
    }
}

/// Particles that fly from node positions into the shape of a string.
#[derive(Clone, Debug)]
pub struct TextParticles {
    text: String,
    origin: Vec2,
    config: TextConfig,
    particles: Vec<Particle>,
}

impl TextParticles {
    pub fn new(text: impl Into<String>, origin: Vec2) -> Self {
        Self::with_config(text, origin, TextConfig::default())
    }

    pub fn with_config(text: impl Into<String>, origin: Vec2, config: TextConfig) -> Self {
        Self {
            text: text.into(),
            origin,
            config,
            particles: vec![],
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Grid samples of the rendered text, already mapped around the origin.
    pub fn sample(&self, rasterizer: &dyn TextRasterizer) -> Vec<Sample> {
        let (w, h) = self.config.raster_size;
        let raster = rasterizer.rasterize(
            &self.text,
            w,
            h,
            self.config.text_center_x,
            self.config.baseline,
        );
        let placement = Placement {
            origin: self.origin,
            anchor: self.config.anchor,
            scale: self.config.scale,
        };
        Sampler::new(self.config.stride, self.config.alpha_threshold).sample(&raster, &placement)
    }

    /// Seeds one particle per text sample; particle `i` starts on body `i % bodies.len()`.
    pub fn form_from_nodes(
        &mut self,
        bodies: &[Body],
        rasterizer: &dyn TextRasterizer,
    ) -> Result<(), EngineError> {
        let starts: Vec<Vec2> = bodies.iter().map(|b| b.position).collect();
        let samples = self.sample(rasterizer);
        self.form_from_samples(&samples, &starts)
    }

    pub fn form_from_samples(
        &mut self,
        samples: &[Sample],
        starts: &[Vec2],
    ) -> Result<(), EngineError> {
        if starts.is_empty() {
            return Err(EngineError::NoSourceBodies);
        }
        self.particles = samples
            .iter()
            .enumerate()
            .map(|(i, s)| Particle::travelling(starts[i % starts.len()], s.position))
            .collect();
        info!(
            "text formation {:?}: {} particles from {} sources",
            self.text,
            self.particles.len(),
            starts.len()
        );
        Ok(())
    }

    /// Spring-damper step towards the targets. `dt` is in 60 fps frames.
    pub fn update(&mut self, dt: f32) {
        let k = self.config.spring * dt;
        let damping = self.config.damping.powf(dt);

        for particle in self.particles.iter_mut() {
            let mut force = particle.target;
            force.sub_mut(particle.current).mult(k);
            particle.velocity.add_mut(force).mult(damping);
            particle.current.add_mut(particle.velocity);
        }
    }

    pub fn is_formed(&self) -> bool {
        self.particles
            .iter()
            .all(|p| p.distance_to_target() < self.config.settle_distance)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let size = Vec2::splat(self.config.particle_size);
        let color = palette::light(0.9);
        for particle in self.particles.iter() {
            surface.fill_rect(particle.current, size, color);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        font::BlockFont,
        surface::{DrawCommand, RecordingSurface},
    };

    fn samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                position: Vec2::new(i as f32 * 10.0, 0.0),
                color: None,
            })
            .collect()
    }

    #[test]
    fn test_round_robin_seeding() {
        let starts = [
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(3.0, 3.0),
        ];
        let mut text = TextParticles::new("x", Vec2::ZERO);
        text.form_from_samples(&samples(7), &starts).unwrap();

        assert_eq!(text.particles().len(), 7);
        assert_eq!(text.particles()[5].current, starts[5 % 3]);
        assert_eq!(text.particles()[6].current, starts[0]);
        assert_eq!(text.particles()[5].target, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_empty_sources_rejected() {
        let mut text = TextParticles::new("x", Vec2::ZERO);
        assert_eq!(
            text.form_from_samples(&samples(3), &[]),
            Err(EngineError::NoSourceBodies)
        );
    }

    #[test]
    fn test_converges_within_200_ticks() {
        let mut text = TextParticles::new("x", Vec2::ZERO);
        let target = [Sample {
            position: Vec2::new(100.0, 0.0),
            color: None,
        }];
        text.form_from_samples(&target, &[Vec2::ZERO]).unwrap();
        assert!(!text.is_formed());

        let mut ticks = 0;
        while !text.is_formed() {
            text.update(1.0);
            ticks += 1;
            assert!(ticks < 200, "did not settle");
        }
    }

    #[test]
    fn test_variable_dt_settles() {
        let mut text = TextParticles::new("x", Vec2::ZERO);
        let target = [Sample {
            position: Vec2::new(-40.0, 80.0),
            color: None,
        }];
        text.form_from_samples(&target, &[Vec2::ZERO]).unwrap();
        for i in 0..400 {
            text.update(if i % 2 == 0 { 0.5 } else { 2.0 });
        }
        assert!(text.is_formed());
    }

    #[test]
    fn test_form_from_nodes_uses_rendered_text() {
        let bodies = vec![
            Body::new(Vec2::new(10.0, 10.0)),
            Body::new(Vec2::new(20.0, 20.0)),
        ];
        let origin = Vec2::new(640.0, 360.0);
        let mut text = TextParticles::new("Code as interface", origin);
        text.form_from_nodes(&bodies, &BlockFont::default()).unwrap();

        let particles = text.particles();
        assert!(!particles.is_empty());
        assert!(!text.is_formed());
        assert_eq!(particles[0].current, bodies[0].position);
        assert_eq!(particles[1].current, bodies[1].position);
        // targets stay within the squeezed raster mapped around the origin
        for p in particles {
            assert!((p.target.x - origin.x).abs() <= 400.0 * 0.8);
            assert!((p.target.y - origin.y).abs() <= 50.0);
        }
    }

    #[test]
    fn test_draw_one_rect_per_particle() {
        let mut text = TextParticles::new("x", Vec2::ZERO);
        text.form_from_samples(&samples(4), &[Vec2::ZERO]).unwrap();
        let mut surface = RecordingSurface::new();
        text.draw(&mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::FillRect { .. })), 4);
    }
}
