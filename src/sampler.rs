//! Turns rasterized text or images into grid samples.

use glam::Vec2;

use crate::{error::EngineError, surface::Color};

/// Plain RGBA8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::InvalidRaster {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fills a rectangle, clipped to the raster bounds.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, rgba: [u8; 4]) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width as i64);
        let y1 = (y + h as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px as u32, py as u32, rgba);
            }
        }
    }

    /// Nearest-neighbour resample to `width` x `height`.
    pub fn resized(&self, width: u32, height: u32) -> Raster {
        let mut out = Raster::new(width, height);
        if self.is_empty() {
            return out;
        }
        for y in 0..height {
            let sy = ((y as u64 * self.height as u64) / height as u64) as u32;
            for x in 0..width {
                let sx = ((x as u64 * self.width as u64) / width as u64) as u32;
                if let Some(p) = self.pixel(sx, sy) {
                    out.set_pixel(x, y, p);
                }
            }
        }
        out
    }
}

/// Renders a string into a raster. Implemented by [`crate::font::BlockFont`].
pub trait TextRasterizer {
    /// Draws `text` horizontally centered on `center_x` with its baseline on
    /// `baseline`, into a transparent `width` x `height` raster.
    fn rasterize(&self, text: &str, width: u32, height: u32, center_x: f32, baseline: f32)
        -> Raster;
}

/// A sampled grid point mapped into target space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub position: Vec2,
    pub color: Option<Color>,
}

/// Maps raster coordinates into target space: `origin + (p - anchor) * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub origin: Vec2,
    pub anchor: Vec2,
    pub scale: Vec2,
}

impl Placement {
    pub fn translate(origin: Vec2) -> Self {
        Self {
            origin,
            anchor: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }

    pub fn map(&self, x: u32, y: u32) -> Vec2 {
        self.origin + (Vec2::new(x as f32, y as f32) - self.anchor) * self.scale
    }
}

/// Grid sampler: visits every `stride`-th pixel, row by row, and keeps those
/// whose alpha is strictly above the threshold.
#[derive(Clone, Debug)]
pub struct Sampler {
    stride: u32,
    alpha_threshold: u8,
    capture_color: bool,
}

impl Sampler {
    pub fn new(stride: u32, alpha_threshold: u8) -> Self {
        Self {
            stride: stride.max(1),
            alpha_threshold,
            capture_color: false,
        }
    }

    /// Record the pixel color (alpha = source alpha / 255) on each sample.
    pub fn with_color(mut self) -> Self {
        self.capture_color = true;
        self
    }

    pub fn sample(&self, raster: &Raster, placement: &Placement) -> Vec<Sample> {
        let mut samples = vec![];
        for y in (0..raster.height()).step_by(self.stride as usize) {
            for x in (0..raster.width()).step_by(self.stride as usize) {
                let Some([r, g, b, a]) = raster.pixel(x, y) else {
                    continue;
                };
                if a <= self.alpha_threshold {
                    continue;
                }
                samples.push(Sample {
                    position: placement.map(x, y),
                    color: self
                        .capture_color
                        .then(|| Color::from_rgba8(r, g, b, a as f32 / 255.0)),
                });
            }
        }
        samples
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn checker(w: u32, h: u32) -> Raster {
        let mut raster = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let a = if (x + y) % 2 == 0 { 255 } else { 0 };
                raster.set_pixel(x, y, [x as u8, y as u8, 7, a]);
            }
        }
        raster
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert_eq!(
            Raster::from_rgba(2, 2, vec![0; 15]),
            Err(EngineError::InvalidRaster {
                expected: 16,
                actual: 15
            })
        );
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_row_major_order_and_stride() {
        let raster = checker(6, 6);
        let samples = Sampler::new(2, 128).sample(&raster, &Placement::translate(Vec2::ZERO));
        let positions: Vec<Vec2> = samples.iter().map(|s| s.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(4.0, 0.0),
                Vec2::new(0.0, 2.0),
                Vec2::new(2.0, 2.0),
                Vec2::new(4.0, 2.0),
                Vec2::new(0.0, 4.0),
                Vec2::new(2.0, 4.0),
                Vec2::new(4.0, 4.0),
            ]
        );
        assert!(samples.iter().all(|s| s.color.is_none()));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut raster = Raster::new(2, 1);
        raster.set_pixel(0, 0, [0, 0, 0, 128]);
        raster.set_pixel(1, 0, [0, 0, 0, 129]);
        let samples = Sampler::new(1, 128).sample(&raster, &Placement::translate(Vec2::ZERO));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_placement_and_color() {
        let mut raster = Raster::new(4, 4);
        raster.set_pixel(2, 1, [255, 0, 0, 255]);
        let placement = Placement {
            origin: Vec2::new(100.0, 100.0),
            anchor: Vec2::new(2.0, 2.0),
            scale: Vec2::new(0.5, 1.0),
        };
        let samples = Sampler::new(1, 50).with_color().sample(&raster, &placement);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position, Vec2::new(100.0, 99.0));
        assert_eq!(samples[0].color, Some(Color::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let raster = checker(31, 17);
        let sampler = Sampler::new(3, 0).with_color();
        let placement = Placement::translate(Vec2::new(5.0, 5.0));
        assert_eq!(sampler.sample(&raster, &placement), sampler.sample(&raster, &placement));
    }

    #[test]
    fn test_resize_nearest() {
        let mut raster = Raster::new(2, 2);
        raster.set_pixel(1, 1, [9, 9, 9, 255]);
        let big = raster.resized(4, 4);
        assert_eq!(big.pixel(3, 3), Some([9, 9, 9, 255]));
        assert_eq!(big.pixel(2, 2), Some([9, 9, 9, 255]));
        assert_eq!(big.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(big.pixel(4, 0), None);
    }
}
