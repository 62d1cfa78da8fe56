use glam::Vec2;
use glium::{
    glutin::surface::WindowSurface, uniform, Display, DrawParameters, Frame, Program,
    Surface as _,
};
use log::error;

use crate::{
    font::BlockFont,
    surface::{Color, RoundedRect, Surface},
};

use super::{camera::Camera, shapes, Vertex};

pub static VERTEX_SHADER_SRC: &str = r#"
#version 150

in vec2 position;
in vec4 color;
out vec4 vertex_color;

uniform mat4 matrix;

void main() {
    vertex_color = color;
    gl_Position = matrix * vec4(position, 0.0, 1.0);
}
"#;

pub static FRAGMENT_SHADER_SRC: &str = r#"
#version 140

in vec4 vertex_color;
out vec4 color;

void main() {
    color = vec4(vertex_color);
}
"#;

const CIRCLE_RES: usize = 16;
const LABEL_SCALE: u32 = 2;

/// Triangles that share one clip rectangle.
pub struct Batch {
    pub clip: Option<RoundedRect>,
    pub vertices: Vec<Vertex>,
}

/// Collects one frame of drawing as triangle batches, split wherever the clip changes.
pub struct FrameSurface {
    pub background: Option<Color>,
    pub batches: Vec<Batch>,
    clips: Vec<RoundedRect>,
    font: BlockFont,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self {
            background: None,
            batches: vec![Batch {
                clip: None,
                vertices: vec![],
            }],
            clips: vec![],
            font: BlockFont::new(LABEL_SCALE),
        }
    }

    fn push(&mut self, mut vertices: Vec<Vertex>) {
        if let Some(batch) = self.batches.last_mut() {
            batch.vertices.append(&mut vertices);
        }
    }

    fn start_batch(&mut self) {
        self.batches.push(Batch {
            clip: self.clips.last().copied(),
            vertices: vec![],
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Clears the frame and draws every non-empty batch.
    pub fn flush(
        self,
        target: &mut Frame,
        display: &Display<WindowSurface>,
        program: &Program,
        camera: &Camera,
    ) {
        if let Some(bg) = self.background {
            target.clear_color(bg.r, bg.g, bg.b, bg.a);
        }

        let uniforms = uniform! {
            matrix: camera.matrix().to_cols_array_2d(),
        };
        let indices = glium::index::NoIndices(glium::index::PrimitiveType::TrianglesList);

        for batch in self.batches.iter().filter(|b| !b.vertices.is_empty()) {
            let params = DrawParameters {
                blend: glium::Blend::alpha_blending(),
                scissor: batch.clip.map(|c| scissor(c, camera.size)),
                ..Default::default()
            };

            let vertex_buffer = match glium::VertexBuffer::new(display, &batch.vertices) {
                Ok(buffer) => buffer,
                Err(err) => {
                    error!("vertex buffer: {}", err);
                    continue;
                }
            };
            if let Err(err) = target.draw(&vertex_buffer, indices, program, &uniforms, &params) {
                error!("draw: {}", err);
            }
        }
    }
}

/// Scissor box of the clip's bounds, in bottom-left origin window pixels.
pub fn scissor(clip: RoundedRect, window: Vec2) -> glium::Rect {
    let left = clip.origin.x.max(0.0);
    let top = clip.origin.y.max(0.0);
    let right = (clip.origin.x + clip.size.x).min(window.x).max(left);
    let bottom = (clip.origin.y + clip.size.y).min(window.y).max(top);
    glium::Rect {
        left: left as u32,
        bottom: (window.y - bottom).max(0.0) as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    }
}

impl Surface for FrameSurface {
    fn clear(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.push(shapes::line(from, to, width, color.to_array()));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(shapes::circle(center, color.to_array(), radius, CIRCLE_RES));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.push(shapes::ring(center, color.to_array(), radius, width, CIRCLE_RES * 2));
    }

    /// Rects centered outside the rounded corners of the active clip are dropped;
    /// the scissor box only covers its straight edges.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        if let Some(clip) = self.clips.last() {
            if !clip.contains(origin + size / 2.0) {
                return;
            }
        }
        self.push(shapes::rectangle(origin, size, color.to_array()));
    }

    fn label(&mut self, anchor: Vec2, text: &str, color: Color) {
        let s = self.font.scale() as f32;
        let left = anchor.x - self.font.text_width(text) as f32 / 2.0;
        let top = anchor.y - self.font.height() as f32 / 2.0;
        let color = color.to_array();
        let mut cells = vec![];
        self.font.for_each_cell(text, |x, y| {
            let origin = Vec2::new(left + x as f32 * s, top + y as f32 * s);
            cells.append(&mut shapes::rectangle(origin, Vec2::splat(s), color));
        });
        self.push(cells);
    }

    fn push_clip(&mut self, clip: RoundedRect) {
        self.clips.push(clip);
        self.start_batch();
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
        self.start_batch();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::surface::palette;

    #[test]
    fn test_clip_splits_batches() {
        let mut surface = FrameSurface::new();
        surface.clear(palette::BACKGROUND);
        surface.line(Vec2::ZERO, Vec2::new(5.0, 5.0), 1.0, palette::light(0.2));

        let frame = RoundedRect::new(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 20.0);
        surface.push_clip(frame);
        surface.fill_rect(Vec2::new(20.0, 20.0), Vec2::ONE, palette::light(1.0));
        surface.pop_clip();
        surface.fill_circle(Vec2::ZERO, 4.0, palette::accent(1.0));

        assert_eq!(surface.background, Some(palette::BACKGROUND));
        assert_eq!(surface.batches.len(), 3);
        assert_eq!(surface.batches[0].clip, None);
        assert_eq!(surface.batches[1].clip, Some(frame));
        assert_eq!(surface.batches[1].vertices.len(), 6);
        assert_eq!(surface.batches[2].clip, None);
        assert_eq!(surface.batches[2].vertices.len(), CIRCLE_RES * 3);
    }

    #[test]
    fn test_rounded_corners_drop_rects() {
        let mut surface = FrameSurface::new();
        surface.push_clip(RoundedRect::new(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 20.0));
        surface.fill_rect(Vec2::new(10.0, 10.0), Vec2::ONE, palette::light(1.0));
        assert_eq!(surface.vertex_count(), 0);
        surface.fill_rect(Vec2::new(34.0, 10.0), Vec2::ONE, palette::light(1.0));
        assert_eq!(surface.vertex_count(), 6);
    }

    #[test]
    fn test_label_draws_glyph_cells() {
        let mut surface = FrameSurface::new();
        surface.label(Vec2::new(100.0, 100.0), "I", palette::light(1.0));
        // 'I' has 11 lit cells
        assert_eq!(surface.vertex_count(), 11 * 6);
    }

    #[test]
    fn test_scissor_flips_y_and_clamps() {
        let clip = RoundedRect::new(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0), 0.0);
        let rect = scissor(clip, Vec2::new(200.0, 100.0));
        assert_eq!((rect.left, rect.bottom, rect.width, rect.height), (10, 30, 100, 50));

        let outside = RoundedRect::new(Vec2::new(-10.0, 80.0), Vec2::new(50.0, 50.0), 0.0);
        let rect = scissor(outside, Vec2::new(200.0, 100.0));
        assert_eq!((rect.left, rect.bottom, rect.width, rect.height), (0, 0, 40, 20));
    }
}
