use std::f32::consts::PI;

use glam::Vec2;

use super::Vertex;

fn vertex(p: Vec2, color: [f32; 4]) -> Vertex {
    Vertex {
        position: p.to_array(),
        color,
    }
}

/// Two triangles covering `origin..origin + size`.
pub fn rectangle(origin: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let a = origin;
    let b = origin + Vec2::new(size.x, 0.0);
    let c = origin + Vec2::new(0.0, size.y);
    let d = origin + size;
    vec![
        vertex(a, color),
        vertex(b, color),
        vertex(c, color),
        vertex(d, color),
        vertex(b, color),
        vertex(c, color),
    ]
}

/// A line of the given width as a quad, so width works on core profiles.
pub fn line(p1: Vec2, p2: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = p2 - p1;
    if dir.length_squared() == 0.0 {
        return vec![];
    }
    let n = dir.perp().normalize() * (width / 2.0);
    vec![
        vertex(p1 + n, color),
        vertex(p2 + n, color),
        vertex(p1 - n, color),
        vertex(p2 - n, color),
        vertex(p2 + n, color),
        vertex(p1 - n, color),
    ]
}

/// Triangle fan around `pos`, unrolled into a triangle list.
pub fn circle(pos: Vec2, color: [f32; 4], r: f32, res: usize) -> Vec<Vertex> {
    let mut shape = Vec::with_capacity(3 * res);
    let a = 2.0 * PI / res as f32;

    for i in 0..res {
        let i = i as f32;
        shape.push(vertex(pos, color));
        shape.push(vertex(
            pos + Vec2::new(r * f32::sin(a * i), r * f32::cos(a * i)),
            color,
        ));
        shape.push(vertex(
            pos + Vec2::new(r * f32::sin(a * (i + 1.0)), r * f32::cos(a * (i + 1.0))),
            color,
        ));
    }

    shape
}

/// Circle outline centered on radius `r`, `width` thick.
pub fn ring(pos: Vec2, color: [f32; 4], r: f32, width: f32, res: usize) -> Vec<Vertex> {
    let mut shape = Vec::with_capacity(6 * res);
    let a = 2.0 * PI / res as f32;
    let inner = (r - width / 2.0).max(0.0);
    let outer = r + width / 2.0;

    for i in 0..res {
        let (s0, c0) = (a * i as f32).sin_cos();
        let (s1, c1) = (a * (i + 1) as f32).sin_cos();
        let i0 = pos + Vec2::new(s0, c0) * inner;
        let o0 = pos + Vec2::new(s0, c0) * outer;
        let i1 = pos + Vec2::new(s1, c1) * inner;
        let o1 = pos + Vec2::new(s1, c1) * outer;
        shape.extend([
            vertex(i0, color),
            vertex(o0, color),
            vertex(o1, color),
            vertex(i0, color),
            vertex(o1, color),
            vertex(i1, color),
        ]);
    }

    shape
}

#[cfg(test)]
mod test {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_line_quad_has_requested_width() {
        let quad = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(quad.len(), 6);
        for v in quad.iter() {
            assert_eq!(v.position[1].abs(), 1.0);
        }
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let fan = circle(Vec2::new(5.0, 5.0), WHITE, 3.0, 12);
        assert_eq!(fan.len(), 36);
        for v in fan {
            let d = Vec2::from(v.position).distance(Vec2::new(5.0, 5.0));
            assert!(d <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_ring_bounds() {
        let outline = ring(Vec2::ZERO, WHITE, 10.0, 2.0, 16);
        assert_eq!(outline.len(), 96);
        for v in outline {
            let d = Vec2::from(v.position).length();
            assert!((9.0 - 1e-4..=11.0 + 1e-4).contains(&d));
        }
    }

    #[test]
    fn test_rectangle_corners() {
        let rect = rectangle(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), WHITE);
        assert_eq!(rect[0].position, [1.0, 2.0]);
        assert_eq!(rect[3].position, [4.0, 6.0]);
    }
}
