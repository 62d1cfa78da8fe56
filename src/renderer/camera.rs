use glam::{Mat4, Vec2};

/// Maps window pixels (origin top-left, y down) to clip space.
pub struct Camera {
    pub size: Vec2,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(0.0, self.size.x, self.size.y, 0.0, -1.0, 1.0)
    }
}
