//! Fixed timestep simulation tick
//!
//! Advances the game state by one tick in a fixed phase order: input intents,
//! player, enemies, contact damage, cleanup, particles. Rendering happens
//! outside, after all ticks of a frame have run.

use super::player::MoveInput;
use super::state::{GameEvent, GamePhase, GameState, SessionEndReason};
use crate::consts::CONTACT_DAMAGE;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// One-shot
    pub cast_spell: bool,
    pub cast_attack: bool,
    /// Pause toggle
    pub pause: bool,
    pub exit: bool,
}

impl TickInput {
    pub fn movement(&self) -> MoveInput {
        MoveInput {
            left: self.move_left,
            right: self.move_right,
            jump: self.jump,
        }
    }
}

/// Advance the game state by one fixed timestep
///
/// Returns the end reason once the session is over; every later call returns
/// the same reason without advancing anything.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<SessionEndReason> {
    state.events.clear();

    if let GamePhase::Ended(reason) = state.phase {
        return Some(reason);
    }

    if input.exit {
        return Some(end_session(state, SessionEndReason::UserExit));
    }

    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            _ => GamePhase::Playing,
        };
        log::debug!("Phase -> {:?} at tick {}", state.phase, state.time_ticks);
    }
    if state.phase == GamePhase::Paused {
        return None;
    }

    state.time_ticks += 1;

    {
        let (player, enemies, level, mut ctx) = state.split();

        // Casts
        if input.cast_spell {
            player.cast_spell(&mut ctx);
        }
        if input.cast_attack {
            player.cast_attack(enemies, &mut ctx);
        }

        // Player: movement, collision, cooldowns, projectiles
        player.update(input.movement(), &level.platforms, enemies, &mut ctx);

        // Enemies
        enemies.update_all();

        // Player <-> enemy contact
        let body = player.rect();
        let touching = enemies
            .iter()
            .any(|(_, enemy)| enemy.is_active() && enemy.rect().overlaps(&body));
        if touching {
            player.take_damage(CONTACT_DAMAGE, &mut ctx);
        }

        // Cleanup
        let removed = enemies.remove_dead();
        if removed > 0 {
            ctx.events.push(GameEvent::EnemyRemoved { count: removed });
        }
    }

    // Cosmetics
    state.particles.update();
    state.starfield.update();

    if !state.player.is_alive() {
        return Some(end_session(state, SessionEndReason::PlayerDefeated));
    }
    None
}

fn end_session(state: &mut GameState, reason: SessionEndReason) -> SessionEndReason {
    state.phase = GamePhase::Ended(reason);
    log::info!("Session ended: {:?} at tick {}", reason, state.time_ticks);
    reason
}
