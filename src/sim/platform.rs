//! Static level layout: solid platforms plus spawn points
//!
//! Built once when a session starts and never mutated afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Direction, Rect};

/// Surface material, used for rendering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Wood,
}

/// A solid axis-aligned platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Rect,
    pub material: Material,
}

impl Platform {
    pub const fn wood(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            bounds: Rect::new(x, y, w, h),
            material: Material::Wood,
        }
    }
}

/// Where and how an enemy patrols when the level starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub patrol_min: f32,
    pub patrol_max: f32,
    pub speed: f32,
    pub direction: Direction,
}

/// Complete level description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub player_spawn: Vec2,
}

/// Height of the ground strip along the bottom of the standard level
pub const GROUND_HEIGHT: f32 = 50.0;

impl Level {
    /// The standard arena: a full-width ground strip, two mid ledges, a centre
    /// ledge and two high ledges, with three patrolling enemies
    pub fn standard(width: f32, height: f32) -> Self {
        let platforms = vec![
            Platform::wood(0.0, height - GROUND_HEIGHT, width, GROUND_HEIGHT),
            Platform::wood(100.0, 420.0, 250.0, 25.0),
            Platform::wood(450.0, 420.0, 250.0, 25.0),
            Platform::wood(300.0, 300.0, 200.0, 25.0),
            Platform::wood(150.0, 200.0, 150.0, 25.0),
            Platform::wood(500.0, 200.0, 150.0, 25.0),
        ];

        let enemy_spawns = vec![
            EnemySpawn {
                pos: Vec2::new(200.0, 380.0),
                patrol_min: 120.0,
                patrol_max: 330.0,
                speed: 1.0,
                direction: Direction::Right,
            },
            EnemySpawn {
                pos: Vec2::new(550.0, 380.0),
                patrol_min: 470.0,
                patrol_max: 680.0,
                speed: 1.0,
                direction: Direction::Left,
            },
            EnemySpawn {
                pos: Vec2::new(350.0, 260.0),
                patrol_min: 310.0,
                patrol_max: 490.0,
                speed: 1.5,
                direction: Direction::Right,
            },
        ];

        Self {
            width,
            height,
            platforms,
            enemy_spawns,
            player_spawn: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// An empty level with only the ground strip
    pub fn flat(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            platforms: vec![Platform::wood(
                0.0,
                height - GROUND_HEIGHT,
                width,
                GROUND_HEIGHT,
            )],
            enemy_spawns: Vec::new(),
            player_spawn: Vec2::new(width / 2.0, height - GROUND_HEIGHT - 60.0),
        }
    }

    /// The literal ground: a platform spanning the full width whose bottom
    /// reaches the level's lower edge
    pub fn ground(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| {
            p.bounds.left() <= 0.0
                && p.bounds.right() >= self.width
                && p.bounds.bottom() >= self.height
        })
    }

    /// A level is well formed when something solid catches every fall
    pub fn is_valid(&self) -> bool {
        let valid = self.ground().is_some();
        if !valid {
            log::warn!("Level has no ground platform; falling bodies rely on the floor clamp");
        }
        valid
    }
}
