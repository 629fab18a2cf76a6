//! Triangle generation for sprites and lines

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::TexelGrid;

/// Two triangles covering the axis-aligned rectangle `min..max`
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Append one quad per visible texel of `sprite`, centred on `center`
///
/// Each texel covers `scale` x `scale` pixels; texel rows run down the screen.
pub fn sprite_quads(out: &mut Vec<Vertex>, sprite: &TexelGrid, center: Vec2, scale: f32) {
    let origin = center - Vec2::splat(sprite.center() * scale);
    for (x, y, texel) in sprite.visible() {
        let min = origin + Vec2::new(x as f32, y as f32) * scale;
        out.extend_from_slice(&quad(min, min + Vec2::splat(scale), texel.rgba()));
    }
}

/// Append a line of the given pixel width as a thin quad
///
/// Degenerate (zero-length) lines produce nothing.
pub fn line_segment(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    out.push(Vertex::at(a1, color));
    out.push(Vertex::at(a2, color));
    out.push(Vertex::at(b1, color));

    out.push(Vertex::at(b1, color));
    out.push(Vertex::at(a2, color));
    out.push(Vertex::at(b2, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Texel;

    #[test]
    fn test_quad_covers_rect() {
        let q = quad(Vec2::new(1.0, 2.0), Vec2::new(3.0, 5.0), [1.0; 4]);
        let xs: Vec<f32> = q.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = q.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 3.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 5.0);
    }

    #[test]
    fn test_sprite_quads_only_visible_texels() {
        let mut sprite = TexelGrid::new(4);
        sprite.set(0, 0, Texel::new(255, 255));
        sprite.set(3, 2, Texel::new(0, 128));
        let mut out = Vec::new();
        sprite_quads(&mut out, &sprite, Vec2::new(100.0, 50.0), 2.0);
        assert_eq!(out.len(), 12);

        // Texel (0, 0) sits at the top-left corner: centre minus half the side
        assert_eq!(out[0].position, [96.0, 46.0]);
        assert_eq!(out[0].color, [1.0, 1.0, 1.0, 1.0]);
        // Texel (3, 2) spans x 102..104, y 50..52
        assert_eq!(out[6].position, [102.0, 50.0]);
        assert_eq!(out[11].position, [104.0, 52.0]);
    }

    #[test]
    fn test_line_segment_width() {
        let mut out = Vec::new();
        line_segment(&mut out, Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, [0.0; 4]);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.position[1].abs() == 1.0));
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        let mut out = Vec::new();
        line_segment(&mut out, Vec2::ONE, Vec2::ONE, 1.0, [0.0; 4]);
        assert!(out.is_empty());
    }
}
