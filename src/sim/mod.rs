//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemy registry slot order)
//! - No rendering, asset or file dependencies

pub mod collision;
pub mod color;
pub mod enemy;
pub mod geom;
pub mod particles;
pub mod platform;
pub mod player;
pub mod projectile;
pub mod starfield;
pub mod state;
pub mod tick;

pub use color::{Palette, Rgb};
pub use enemy::{Enemy, EnemyId, EnemyRegistry, EnemyState};
pub use geom::{Direction, Rect};
pub use particles::{Burst, Particle, ParticleSystem};
pub use platform::{EnemySpawn, Level, Material, Platform};
pub use player::{AttackOutcome, MoveInput, Player};
pub use projectile::{Attack, AttackStep, Guidance, Projectiles, Spell};
pub use starfield::{Star, Starfield};
pub use state::{GameEvent, GamePhase, GameState, SessionEndReason, TickContext};
pub use tick::{TickInput, tick};
