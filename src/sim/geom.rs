//! Axis-aligned rectangle geometry for platforms, bodies and bolts
//!
//! Screen space: x grows right, y grows down. A rect is defined by its
//! top-left corner and a non-negative size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn from_facing_right(facing_right: bool) -> Self {
        if facing_right {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Round a heading (radians) to the nearer horizontal direction
    pub fn from_heading(heading: f32) -> Self {
        if heading.cos() > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// An axis-aligned box in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a top-left position and a size vector
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x.max(0.0), size.y.max(0.0))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal extents overlap or touch
    #[inline]
    pub fn touches_x(&self, other: &Rect) -> bool {
        self.left() <= other.right() && self.right() >= other.left()
    }

    /// Vertical extents overlap strictly
    #[inline]
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Horizontal extents overlap by more than `inset` on both sides
    #[inline]
    pub fn overlaps_x_inset(&self, other: &Rect, inset: f32) -> bool {
        self.right() > other.left() + inset && self.left() < other.right() - inset
    }

    /// Same size, moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Corner points, clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left(), self.bottom()),
        ]
    }
}
