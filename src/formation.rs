//! Particle formations: sampled targets that particles animate towards.

use std::time::Duration;

use glam::Vec2;

use crate::surface::Color;

mod image;
mod text;

pub use image::{ImageConfig, ImageParticles, LoadState};
pub use text::{TextConfig, TextParticles};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub current: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    pub color: Option<Color>,
    pub appear_delay: Option<Duration>,
    pub opacity: f32,
}

impl Particle {
    /// Particle that starts at `start` and travels to `target`.
    pub fn travelling(start: Vec2, target: Vec2) -> Self {
        Self {
            current: start,
            velocity: Vec2::ZERO,
            target,
            color: None,
            appear_delay: None,
            opacity: 1.0,
        }
    }

    /// Particle already sitting on its target, invisible until `delay` has passed.
    pub fn fading(at: Vec2, color: Color, delay: Duration) -> Self {
        Self {
            current: at,
            velocity: Vec2::ZERO,
            target: at,
            color: Some(color),
            appear_delay: Some(delay),
            opacity: 0.0,
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        self.current.distance(self.target)
    }
}
