//! CPU-side draw surface that collects a painter-ordered triangle list

use glam::DVec3;

use super::compositor::DrawSurface;
use super::shapes;
use super::vertex::Vertex;
use crate::sim::TexelGrid;

/// Collects triangles in draw order, in screen pixels
#[derive(Debug, Clone)]
pub struct VertexSurface {
    vertices: Vec<Vertex>,
    /// Trail line width in pixels
    pub line_width: f32,
    sprites: usize,
    lines: usize,
}

impl Default for VertexSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSurface {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            line_width: 1.0,
            sprites: 0,
            lines: 0,
        }
    }

    /// Forget the previous frame, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.sprites = 0;
        self.lines = 0;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }
}

impl DrawSurface for VertexSurface {
    fn draw_sprite(&mut self, sprite: &TexelGrid, center: DVec3, scale: f64) {
        let center = center.truncate().as_vec2();
        shapes::sprite_quads(&mut self.vertices, sprite, center, scale as f32);
        self.sprites += 1;
    }

    fn draw_line(&mut self, from: DVec3, to: DVec3, color: [f32; 4]) {
        shapes::line_segment(
            &mut self.vertices,
            from.truncate().as_vec2(),
            to.truncate().as_vec2(),
            self.line_width,
            color,
        );
        self.lines += 1;
    }
}
