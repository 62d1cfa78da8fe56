use glam::Vec2;

use crate::{
    surface::{palette, Surface},
    vector::VectorOps,
};

pub const DEFAULT_ATTRACT_STRENGTH: f32 = 0.05;
pub const DEFAULT_REPEL_STRENGTH: f32 = 50.0;
const REPEL_FALLOFF: f32 = 0.1;
const FRICTION: f32 = 0.95;
const RETURN_STRENGTH: f32 = 0.02;

/// Handle of a [`Body`] inside a [`crate::network::Network`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// A point mass tethered to the position it was spawned at.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    anchor: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub max_speed: f32,
    pub radius: f32,
    pub label: String,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            anchor: position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            max_speed: 2.0,
            radius: 4.0,
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// `mass` must be positive.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Spawn position. Never changes after construction.
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn apply_force(&mut self, force: Vec2) {
        let mut f = force;
        f.mult(1.0 / self.mass);
        self.acceleration.add_mut(f);
    }

    /// Linear spring towards `target`: the force grows with `distance * strength`.
    pub fn attract_to(&mut self, target: Vec2, strength: f32) {
        let mut force = target;
        force.sub_mut(self.position);
        let dist = force.mag();
        force.normalize_mut().mult(strength * dist);
        self.apply_force(force);
    }

    /// Pushes away from `point` with `(strength - d) * 0.1` while `0 < d < strength`.
    pub fn repel_from(&mut self, point: Vec2, strength: f32) {
        let mut force = self.position;
        force.sub_mut(point);
        let dist = force.mag();
        if dist < strength && dist > 0.0 {
            force.normalize_mut().mult((strength - dist) * REPEL_FALLOFF);
            self.apply_force(force);
        }
    }

    /// One integration step.
    ///
    /// Order matters: integrate, clamp, move, reset the accumulator, apply
    /// friction, then queue the pull back to the anchor for the next step.
    pub fn update(&mut self) {
        self.velocity.add_mut(self.acceleration);
        self.velocity.limit(self.max_speed);
        self.position.add_mut(self.velocity);
        self.acceleration.mult(0.0);

        self.velocity.mult(FRICTION);
        self.attract_to(self.anchor, RETURN_STRENGTH);
    }

    pub fn draw(&self, surface: &mut dyn Surface, highlight: bool) {
        let fill = if highlight {
            palette::accent(0.9)
        } else {
            palette::light(0.8)
        };
        surface.fill_circle(self.position, self.radius, fill);

        if highlight {
            surface.stroke_circle(self.position, self.radius + 8.0, 2.0, palette::accent(0.3));
            if !self.label.is_empty() {
                surface.label(
                    self.position - Vec2::new(0.0, 20.0),
                    &self.label,
                    palette::light(1.0),
                );
            }
        }
    }
}

/// Visual link between two bodies of the same network.
#[derive(Debug, Clone)]
pub struct Connector {
    pub a: BodyId,
    pub b: BodyId,
    pub opacity: f32,
}

impl Connector {
    pub const DEFAULT_OPACITY: f32 = 0.2;

    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self {
            a,
            b,
            opacity: Self::DEFAULT_OPACITY,
        }
    }

    pub fn touches(&self, id: BodyId) -> bool {
        self.a == id || self.b == id
    }

    pub fn draw(&self, bodies: &[Body], surface: &mut dyn Surface, highlight: bool) {
        let (Some(a), Some(b)) = (bodies.get(self.a.0), bodies.get(self.b.0)) else {
            return;
        };
        if highlight {
            surface.line(
                a.position,
                b.position,
                1.5,
                palette::accent(self.opacity * 0.6),
            );
        } else {
            surface.line(a.position, b.position, 0.5, palette::light(self.opacity));
        }
    }
}
