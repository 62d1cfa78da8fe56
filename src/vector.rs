use glam::Vec2;

/// Point/vector type used throughout the engine.
pub type Vector2 = Vec2;

/// In-place, chainable vector arithmetic on top of `glam::Vec2`.
///
/// Every mutating method returns `&mut Self` so calls can be chained:
/// `force.normalize_mut().mult(strength)`. Copying a vector (`let b = a;`)
/// gives an independent value.
pub trait VectorOps {
    fn add_mut(&mut self, v: Vec2) -> &mut Self;

    fn sub_mut(&mut self, v: Vec2) -> &mut Self;

    fn mult(&mut self, n: f32) -> &mut Self;

    /// Euclidean norm
    fn mag(&self) -> f32;

    /// Scales to unit length. A zero vector is left untouched.
    fn normalize_mut(&mut self) -> &mut Self;

    /// Rescales to exactly `max` if the magnitude exceeds it.
    fn limit(&mut self, max: f32) -> &mut Self;

    fn dist(&self, v: Vec2) -> f32;
}

impl VectorOps for Vec2 {
    fn add_mut(&mut self, v: Vec2) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self
    }

    fn sub_mut(&mut self, v: Vec2) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self
    }

    fn mult(&mut self, n: f32) -> &mut Self {
        self.x *= n;
        self.y *= n;
        self
    }

    fn mag(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn normalize_mut(&mut self) -> &mut Self {
        let m = self.mag();
        if m > 0.0 {
            self.mult(1.0 / m);
        }
        self
    }

    fn limit(&mut self, max: f32) -> &mut Self {
        if self.mag() > max {
            self.normalize_mut().mult(max);
        }
        self
    }

    fn dist(&self, v: Vec2) -> f32 {
        let dx = self.x - v.x;
        let dy = self.y - v.y;
        (dx * dx + dy * dy).sqrt()
    }
}
