//! Recording render target

use glam::Vec2;

use super::{Layer, RenderTarget, Sprite};
use crate::assets::{Font, Image};
use crate::sim::color::Rgb;
use crate::sim::geom::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    FillRect { rect: Rect, color: Rgb, alpha: f32 },
    StrokeRect {
        rect: Rect,
        color: Rgb,
        thickness: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        thickness: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: Rgb,
        alpha: f32,
    },
    Image {
        name: String,
        dest: Rect,
        sprite: Sprite,
    },
    Text {
        text: String,
        pos: Vec2,
        font: Font,
        color: Rgb,
    },
}

/// Records every command together with the layer it was issued in
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<(Layer, DrawCommand)>,
    current: Option<Layer>,
    layers: Vec<Layer>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[(Layer, DrawCommand)] {
        &self.commands
    }

    /// Layers in the order they were begun
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Commands issued in `layer`
    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |(l, _)| *l == layer)
            .map(|(_, cmd)| cmd)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|(_, cmd)| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear_list(&mut self) {
        self.commands.clear();
        self.layers.clear();
        self.current = None;
    }

    fn push(&mut self, cmd: DrawCommand) {
        let layer = self.current.unwrap_or(Layer::Background);
        self.commands.push((layer, cmd));
    }
}

impl RenderTarget for DrawList {
    fn begin_layer(&mut self, layer: Layer) {
        self.current = Some(layer);
        self.layers.push(layer);
    }

    fn clear(&mut self, color: Rgb) {
        self.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        self.push(DrawCommand::FillRect { rect, color, alpha });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, thickness: f32) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            thickness,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, thickness: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb, alpha: f32) {
        self.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
            alpha,
        });
    }

    fn draw_image(&mut self, image: &Image, dest: Rect, sprite: Sprite) {
        self.push(DrawCommand::Image {
            name: image.name.clone(),
            dest,
            sprite,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, font: &Font, color: Rgb) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            font: font.clone(),
            color,
        });
    }
}
