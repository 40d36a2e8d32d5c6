//! Vertex types for 2D rendering and a tessellating render target

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{Layer, RenderTarget, Sprite, shapes};
use crate::assets::{Font, Image};
use crate::sim::color::Rgb;
use crate::sim::geom::Rect;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Tint used for images, which this target draws as placeholders
const IMAGE_PLACEHOLDER: Rgb = Rgb(255, 0, 255);

/// Render target that tessellates everything into a triangle list
///
/// Text is not rasterized here; it is counted so callers can hand it to a
/// glyph renderer.
#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    clear_color: Option<[f32; 4]>,
    /// First vertex index of each layer, in draw order
    layer_starts: Vec<(Layer, usize)>,
    text_runs: usize,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    pub fn layer_starts(&self) -> &[(Layer, usize)] {
        &self.layer_starts
    }

    pub fn text_runs(&self) -> usize {
        self.text_runs
    }

    /// Drop all geometry, keeping the allocation
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.layer_starts.clear();
        self.clear_color = None;
        self.text_runs = 0;
    }
}

impl RenderTarget for VertexBatch {
    fn begin_layer(&mut self, layer: Layer) {
        self.layer_starts.push((layer, self.vertices.len()));
    }

    fn clear(&mut self, color: Rgb) {
        self.clear_color = Some(color.to_rgba(1.0));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        self.vertices
            .extend(shapes::rect(rect, color.to_rgba(alpha)));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, thickness: f32) {
        self.vertices
            .extend(shapes::rect_outline(rect, thickness, color.to_rgba(1.0)));
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, thickness: f32) {
        self.vertices
            .extend(shapes::line(from, to, thickness, color.to_rgba(1.0)));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color.to_rgba(alpha),
            shapes::circle_segments(radius),
        ));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb, alpha: f32) {
        self.vertices
            .extend(shapes::polygon(points, color.to_rgba(alpha)));
    }

    /// Corners are emitted in image order (top-left of the image first), so
    /// a flipped sprite starts at the right edge of `dest`
    fn draw_image(&mut self, _image: &Image, dest: Rect, sprite: Sprite) {
        let mut corners = dest.corners();
        if sprite.flip_x {
            let mirror = 2.0 * dest.center().x;
            for corner in &mut corners {
                corner.x = mirror - corner.x;
            }
        }
        let angle = -sprite.rotation_deg.to_radians();
        shapes::rotate_about(&mut corners, dest.center(), angle);
        let color = IMAGE_PLACEHOLDER.to_rgba(sprite.alpha);
        self.vertices.extend(shapes::quad(corners, color));
    }

    fn draw_text(&mut self, _text: &str, _pos: Vec2, _font: &Font, _color: Rgb) {
        self.text_runs += 1;
    }
}
