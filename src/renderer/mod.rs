//! Frame rendering
//!
//! The simulation is drawn through the [`RenderTarget`] trait in a fixed layer
//! order. Two targets ship with the crate: [`VertexBatch`] tessellates into
//! coloured triangles for a GPU upload, [`DrawList`] records commands for
//! inspection.

pub mod draw_list;
pub mod frame;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::assets::{Font, Image};
use crate::sim::color::Rgb;
use crate::sim::geom::Rect;

pub use draw_list::{DrawCommand, DrawList};
pub use frame::{render_frame, render_particles};
pub use vertex::{Vertex, VertexBatch};

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Platforms,
    Enemies,
    Player,
    Projectiles,
    Particles,
    Hud,
}

impl Layer {
    pub const ORDER: [Layer; 7] = [
        Layer::Background,
        Layer::Platforms,
        Layer::Enemies,
        Layer::Player,
        Layer::Projectiles,
        Layer::Particles,
        Layer::Hud,
    ];
}

/// How an image is placed into its destination rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Counter-clockwise rotation about the rect centre, in degrees
    pub rotation_deg: f32,
    pub alpha: f32,
    pub flip_x: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            alpha: 1.0,
            flip_x: false,
        }
    }
}

/// A surface the frame can be drawn onto
///
/// Colours are opaque RGB plus a separate alpha in 0..=1.
pub trait RenderTarget {
    /// Called once before each layer is drawn
    fn begin_layer(&mut self, _layer: Layer) {}
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32);
    fn stroke_rect(&mut self, rect: Rect, color: Rgb, thickness: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, thickness: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    /// Convex polygon, points in order
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb, alpha: f32);
    fn draw_image(&mut self, image: &Image, dest: Rect, sprite: Sprite);
    fn draw_text(&mut self, text: &str, pos: Vec2, font: &Font, color: Rgb);
}
