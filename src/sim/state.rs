//! Game state and the per-tick simulation context
//!
//! `GameState` owns everything a session simulates. Entity updates borrow the
//! shared services they need through a [`TickContext`] instead of reaching
//! for globals.

use glam::Vec2;

use super::color::Palette;
use super::enemy::{Enemy, EnemyId, EnemyRegistry};
use super::particles::ParticleSystem;
use super::platform::Level;
use super::player::Player;
use super::starfield::Starfield;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::customization::CustomizationData;

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    PlayerDefeated,
    UserExit,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Nothing advances; frames still render
    Paused,
    Ended(SessionEndReason),
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SpellCast,
    AttackCast,
    EnemyKilled { id: EnemyId },
    /// A homing attack's target died or vanished; it now flies straight
    TargetLost { id: EnemyId },
    PlayerDamaged { amount: u32, health: u32 },
    EnemyRemoved { count: usize },
}

/// Shared services borrowed by entity updates for one tick
pub struct TickContext<'a> {
    pub particles: &'a mut ParticleSystem,
    pub events: &'a mut Vec<GameEvent>,
    pub palette: &'a Palette,
    /// Playfield size in pixels
    pub field: Vec2,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter (not advanced while paused)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub level: Level,
    pub player: Player,
    pub enemies: EnemyRegistry,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    pub starfield: Starfield,
    pub palette: Palette,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a session on `level`
    pub fn new(
        seed: u64,
        level: Level,
        customization: CustomizationData,
        palette: Palette,
    ) -> Self {
        level.is_valid();
        let field = Vec2::new(level.width, level.height);

        let mut enemies = EnemyRegistry::new();
        for spawn in &level.enemy_spawns {
            enemies.insert(Enemy::from_spawn(spawn));
        }

        log::info!(
            "Session start: seed {}, {} platforms, {} enemies",
            seed,
            level.platforms.len(),
            enemies.len()
        );

        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(level.player_spawn, customization),
            enemies,
            particles: ParticleSystem::new(seed),
            // Separate stream so the sky doesn't shift when combat spawns particles
            starfield: Starfield::new(seed.wrapping_add(1), field),
            palette,
            events: Vec::new(),
            level,
        }
    }

    /// The standard 800×600 arena with the default palette
    pub fn standard(seed: u64, customization: CustomizationData) -> Self {
        Self::new(
            seed,
            Level::standard(WINDOW_WIDTH, WINDOW_HEIGHT),
            customization,
            Palette::default(),
        )
    }

    pub fn field(&self) -> Vec2 {
        Vec2::new(self.level.width, self.level.height)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    /// Borrow the per-tick services alongside the entities that use them
    pub fn split(&mut self) -> (&mut Player, &mut EnemyRegistry, &Level, TickContext<'_>) {
        let field = Vec2::new(self.level.width, self.level.height);
        (
            &mut self.player,
            &mut self.enemies,
            &self.level,
            TickContext {
                particles: &mut self.particles,
                events: &mut self.events,
                palette: &self.palette,
                field,
            },
        )
    }
}
