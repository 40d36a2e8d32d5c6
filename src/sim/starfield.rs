//! Slowly drifting background stars
//!
//! Cosmetic only: drawn when no background image is available.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::STAR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Radius in pixels
    pub size: f32,
    /// Leftward drift per tick
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    bounds: Vec2,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        Self::with_count(seed, bounds, STAR_COUNT)
    }

    pub fn with_count(seed: u64, bounds: Vec2, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let width = bounds.x.max(1.0);
        let height = bounds.y.max(1.0);
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height)),
                size: rng.random_range(0.5..3.0),
                speed: rng.random_range(0.05..0.2),
            })
            .collect();
        Self { stars, bounds, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Drift left; stars leaving the left edge re-enter on the right at a
    /// random height
    pub fn update(&mut self) {
        let height = self.bounds.y.max(1.0);
        for star in &mut self.stars {
            star.pos.x -= star.speed;
            if star.pos.x < 0.0 {
                star.pos.x = self.bounds.x;
                star.pos.y = self.rng.random_range(0.0..height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_start_inside_bounds() {
        let field = Starfield::new(3, Vec2::new(800.0, 600.0));
        assert_eq!(field.stars().len(), STAR_COUNT);
        for s in field.stars() {
            assert!(s.pos.x >= 0.0 && s.pos.x < 800.0);
            assert!(s.pos.y >= 0.0 && s.pos.y < 600.0);
            assert!(s.speed >= 0.05 && s.speed < 0.2);
        }
    }

    #[test]
    fn test_stars_wrap_at_left_edge() {
        let mut field = Starfield::with_count(4, Vec2::new(800.0, 600.0), 1);
        field.stars[0].pos.x = 0.01;
        field.stars[0].speed = 0.1;
        field.update();
        assert_eq!(field.stars()[0].pos.x, 800.0);
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = Starfield::new(9, Vec2::new(800.0, 600.0));
        let b = Starfield::new(9, Vec2::new(800.0, 600.0));
        assert_eq!(a.stars(), b.stars());
    }
}
