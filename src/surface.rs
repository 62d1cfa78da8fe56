//! Drawing surface abstraction.
//!
//! Everything in the engine paints through [`Surface`]. The windowed
//! renderer implements it on top of glium; [`RecordingSurface`] keeps the
//! calls as [`DrawCommand`]s for headless hosts and tests.

use glam::Vec2;

/// Normalized RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels and a `[0, 1]` alpha.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0);

    /// rgba(232, 232, 232, a)
    pub fn light(a: f32) -> Color {
        Color::from_rgba8(232, 232, 232, a)
    }

    /// rgba(74, 222, 128, a)
    pub fn accent(a: f32) -> Color {
        Color::from_rgba8(74, 222, 128, a)
    }
}

/// Axis aligned rectangle with rounded corners, used as a clip region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub origin: Vec2,
    pub size: Vec2,
    pub radius: f32,
}

impl RoundedRect {
    pub fn new(origin: Vec2, size: Vec2, radius: f32) -> Self {
        Self {
            origin,
            size,
            radius,
        }
    }

    /// Point-in-shape test including the rounded corners.
    pub fn contains(&self, p: Vec2) -> bool {
        let min = self.origin;
        let max = self.origin + self.size;
        if p.x < min.x || p.y < min.y || p.x > max.x || p.y > max.y {
            return false;
        }
        let r = self.radius.min(self.size.x / 2.0).min(self.size.y / 2.0);
        let inner_min = min + Vec2::splat(r);
        let inner_max = max - Vec2::splat(r);
        let nearest = p.clamp(inner_min, inner_max);
        p.distance_squared(nearest) <= r * r
    }
}

pub trait Surface {
    fn clear(&mut self, color: Color);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Small text centered horizontally on `anchor`.
    fn label(&mut self, anchor: Vec2, text: &str, color: Color);

    /// Restricts subsequent drawing to `clip` until the matching `pop_clip`.
    fn push_clip(&mut self, clip: RoundedRect);

    fn pop_clip(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    Label {
        anchor: Vec2,
        text: String,
        color: Color,
    },
    PushClip(RoundedRect),
    PopClip,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count<F>(&self, filter: F) -> usize
    where
        F: Fn(&DrawCommand) -> bool,
    {
        self.commands.iter().filter(|c| filter(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn label(&mut self, anchor: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Label {
            anchor,
            text: text.to_string(),
            color,
        });
    }

    fn push_clip(&mut self, clip: RoundedRect) {
        self.commands.push(DrawCommand::PushClip(clip));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}
