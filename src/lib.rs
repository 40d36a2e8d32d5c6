//! Wizard Quest - a side-scrolling wizard platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, combat, particles)
//! - `renderer`: Z-ordered frame composition behind a `RenderTarget`
//! - `session`: Fixed-timestep driver and input mapping
//! - `assets`: Image/font/colour/music lookups with procedural fallbacks
//! - `settings`: Persisted flat configuration
//! - `customization`: Wizard look and magic presets

pub mod assets;
pub mod customization;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use customization::CustomizationData;
pub use session::{Action, InputEvent, Session, SessionEndReason, SessionEnded};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
///
/// Simulation quantities are expressed per tick (pixels/tick, ticks), not per second.
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Default playfield dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_MAX_SPEED: f32 = 5.0;
    pub const PLAYER_ACCEL: f32 = 1.0;
    pub const PLAYER_DECEL: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = -15.0;
    pub const GRAVITY: f32 = 0.8;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    /// Hand height below the top of the player
    pub const HAND_OFFSET_Y: f32 = 20.0;

    /// Horizontal side inference slack (px)
    pub const SIDE_TOLERANCE: f32 = 2.0;
    /// Inward margin for landing overlap and previous-edge slack (px)
    pub const LANDING_TOLERANCE: f32 = 5.0;
    /// Downward speed above which a landing kicks up dust
    pub const LANDING_DUST_SPEED: f32 = 5.0;

    /// Damage
    pub const CONTACT_DAMAGE: u32 = 20;
    pub const INVULNERABILITY_TICKS: u32 = 60;
    pub const DAMAGE_FLASH_TICKS: u32 = 10;

    /// Upper bound on a wizard's magic power multiplier
    pub const MAX_MAGIC_POWER: f32 = 5.0;

    /// Spells (free-flight wobbling bolts)
    pub const SPELL_COOLDOWN_TICKS: u32 = 20;
    pub const SPELL_BASE_SPEED: f32 = 10.0;
    pub const SPELL_LIFETIME: u32 = 70;
    pub const SPELL_SIZE: f32 = 20.0;
    pub const SPELL_WOBBLE_STEP: f32 = 0.1;
    pub const SPELL_WOBBLE_AMPLITUDE: f32 = 2.0;

    /// Attacks (directed / homing bolts)
    pub const ATTACK_COOLDOWN_TICKS: u32 = 30;
    pub const ATTACK_STRAIGHT_SPEED: f32 = 15.0;
    pub const ATTACK_HOMING_SPEED: f32 = 10.0;
    pub const ATTACK_LIFETIME: u32 = 60;
    pub const ATTACK_WIDTH: f32 = 30.0;
    pub const ATTACK_HEIGHT: f32 = 15.0;
    /// Launch point offset in front of the player centre
    pub const ATTACK_MUZZLE_OFFSET: f32 = 15.0;
    /// Fraction of the angular error corrected per tick
    pub const HOMING_TURN_GAIN: f32 = 0.3;
    /// Targets closer than this are hit without spawning a bolt
    pub const INSTANT_HIT_RANGE: f32 = 80.0;
    /// Projectiles further than this outside the playfield expire
    pub const OFFSCREEN_MARGIN: f32 = 40.0;
    /// Per-tick chance of emitting trail particles
    pub const TRAIL_CHANCE: f64 = 0.3;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_DEATH_TICKS: u32 = 60;

    /// Soft ceiling on live particles (oldest evicted first)
    pub const MAX_PARTICLES: usize = 2000;

    /// Background stars
    pub const STAR_COUNT: usize = 100;
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}
