//! Fixed-timestep session driver
//!
//! A [`Session`] owns the game state and the asset collaborator. The host
//! feeds it input events and elapsed wall time; the session runs as many
//! fixed ticks as the time covers (capped per frame), then renders exactly
//! once.

use crate::assets::Assets;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::customization::CustomizationData;
use crate::renderer::{RenderTarget, render_frame};
use crate::settings::Settings;
use crate::sim::platform::Level;
use crate::sim::{GameState, TickInput, tick};

pub use crate::sim::SessionEndReason;

/// Longest frame gap fed into the accumulator, in seconds
const MAX_FRAME_SECS: f32 = 0.1;

/// Key that fires a homing/straight attack
pub const ATTACK_KEY: &str = "2";

/// Player intents an input device can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    CastSpell,
    CastAttack,
    Pause,
    Exit,
}

impl Action {
    /// Map a key name to an action. The spell key is configurable.
    pub fn from_key(key: &str, spell_hotkey: &str) -> Option<Action> {
        if key == spell_hotkey {
            return Some(Action::CastSpell);
        }
        match key {
            "ArrowLeft" | "Left" => Some(Action::MoveLeft),
            "ArrowRight" | "Right" => Some(Action::MoveRight),
            " " | "Space" => Some(Action::Jump),
            ATTACK_KEY => Some(Action::CastAttack),
            "p" | "P" => Some(Action::Pause),
            "Escape" => Some(Action::Exit),
            _ => None,
        }
    }

    /// Held actions stay active until released; the rest fire once
    pub fn is_held(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight | Action::Jump)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

/// Returned to the caller once the session is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded {
    pub reason: SessionEndReason,
    /// Simulation ticks played
    pub ticks: u64,
}

/// One play-through from spawn to defeat or exit
pub struct Session {
    state: GameState,
    assets: Box<dyn Assets>,
    accumulator: f32,
    input: TickInput,
    ended: Option<SessionEnded>,
}

impl Session {
    pub fn new(state: GameState, assets: Box<dyn Assets>) -> Self {
        Self {
            state,
            assets,
            accumulator: 0.0,
            input: TickInput::default(),
            ended: None,
        }
    }

    /// Start on the default level sized from settings
    pub fn from_settings(seed: u64, settings: &Settings, assets: Box<dyn Assets>) -> Self {
        let field = settings.field_size();
        let state = GameState::new(
            seed,
            Level::standard(field.x, field.y),
            settings.wizard_customization.clone(),
            assets.palette(),
        );
        Self::new(state, assets)
    }

    /// Start on the default level with default look
    pub fn standard(seed: u64, customization: CustomizationData, assets: Box<dyn Assets>) -> Self {
        let mut state = GameState::standard(seed, customization);
        state.palette = assets.palette();
        Self::new(state, assets)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Input that the next tick will see
    pub fn pending_input(&self) -> &TickInput {
        &self.input
    }

    pub fn ended(&self) -> Option<SessionEnded> {
        self.ended
    }

    pub fn handle(&mut self, event: InputEvent) {
        let (action, down) = match event {
            InputEvent::Pressed(action) => (action, true),
            InputEvent::Released(action) => (action, false),
        };
        let input = &mut self.input;
        match action {
            Action::MoveLeft => input.move_left = down,
            Action::MoveRight => input.move_right = down,
            Action::Jump => input.jump = down,
            // One-shots latch on press and clear after the tick that sees them
            Action::CastSpell => input.cast_spell |= down,
            Action::CastAttack => input.cast_attack |= down,
            Action::Pause => input.pause |= down,
            Action::Exit => input.exit |= down,
        }
    }

    /// Advance by `elapsed_secs` of wall time and render one frame
    ///
    /// Runs at most [`MAX_SUBSTEPS`] ticks. Leftover time beyond one tick is
    /// dropped when the cap is hit, so a long stall never snowballs.
    pub fn advance(
        &mut self,
        elapsed_secs: f32,
        target: &mut dyn RenderTarget,
    ) -> Option<SessionEnded> {
        if self.ended.is_none() {
            self.run_ticks(elapsed_secs);
        }
        render_frame(&self.state, self.assets.as_ref(), target);
        self.ended
    }

    fn run_ticks(&mut self, elapsed_secs: f32) {
        let dt = if elapsed_secs.is_finite() {
            elapsed_secs.clamp(0.0, MAX_FRAME_SECS)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input;
            let outcome = tick(&mut self.state, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.cast_spell = false;
            self.input.cast_attack = false;
            self.input.pause = false;
            self.input.exit = false;

            if let Some(reason) = outcome {
                self.ended = Some(SessionEnded {
                    reason,
                    ticks: self.state.time_ticks,
                });
                self.accumulator = 0.0;
                return;
            }
        }

        if substeps == MAX_SUBSTEPS && self.accumulator > SIM_DT {
            log::debug!(
                "Dropping {:.3}s of simulation backlog",
                self.accumulator - SIM_DT
            );
            self.accumulator = SIM_DT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::renderer::{DrawList, Layer};

    fn session() -> Session {
        let assets = Box::new(AssetCatalog::new());
        Session::standard(3, CustomizationData::default(), assets)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key("1", "1"), Some(Action::CastSpell));
        assert_eq!(Action::from_key("q", "q"), Some(Action::CastSpell));
        assert_eq!(Action::from_key("2", "1"), Some(Action::CastAttack));
        assert_eq!(Action::from_key("ArrowLeft", "1"), Some(Action::MoveLeft));
        assert_eq!(Action::from_key(" ", "1"), Some(Action::Jump));
        assert_eq!(Action::from_key("Escape", "1"), Some(Action::Exit));
        assert_eq!(Action::from_key("z", "1"), None);
        assert!(Action::Jump.is_held());
        assert!(!Action::CastSpell.is_held());
    }

    #[test]
    fn test_one_tick_per_sim_dt() {
        let mut session = session();
        let mut list = DrawList::new();
        assert!(session.advance(SIM_DT, &mut list).is_none());
        assert_eq!(session.state().time_ticks, 1);
        assert_eq!(list.layers(), &Layer::ORDER);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut session = session();
        let mut list = DrawList::new();
        session.advance(SIM_DT * 0.6, &mut list);
        assert_eq!(session.state().time_ticks, 0);
        session.advance(SIM_DT * 0.6, &mut list);
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut session = session();
        let mut list = DrawList::new();
        session.advance(10.0, &mut list);
        assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
        // The backlog is dropped rather than replayed
        session.advance(0.0, &mut list);
        assert!(session.state().time_ticks <= MAX_SUBSTEPS as u64 + 1);
    }

    #[test]
    fn test_renders_once_per_advance() {
        let mut session = session();
        let mut list = DrawList::new();
        session.advance(4.0 * SIM_DT, &mut list);
        assert_eq!(list.layers().len(), Layer::ORDER.len());
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut session = session();
        let mut list = DrawList::new();
        session.handle(InputEvent::Pressed(Action::CastSpell));
        session.handle(InputEvent::Released(Action::CastSpell));
        assert!(session.pending_input().cast_spell);
        session.advance(3.0 * SIM_DT, &mut list);
        assert_eq!(session.state().player.projectiles.spells.len(), 1);
        assert!(!session.pending_input().cast_spell);
    }

    #[test]
    fn test_held_movement_persists() {
        let mut session = session();
        let mut list = DrawList::new();
        let start = session.state().player.pos.x;
        session.handle(InputEvent::Pressed(Action::MoveRight));
        session.advance(3.0 * SIM_DT, &mut list);
        assert!(session.pending_input().move_right);
        assert!(session.state().player.pos.x > start);
        session.handle(InputEvent::Released(Action::MoveRight));
        assert!(!session.pending_input().move_right);
    }

    #[test]
    fn test_exit_ends_session() {
        let mut session = session();
        let mut list = DrawList::new();
        session.advance(SIM_DT, &mut list);
        session.handle(InputEvent::Pressed(Action::Exit));
        let ended = session.advance(SIM_DT, &mut list).unwrap();
        assert_eq!(ended.reason, SessionEndReason::UserExit);
        assert_eq!(ended.ticks, 1);

        // Stays ended and keeps rendering
        let mut again = DrawList::new();
        assert_eq!(session.advance(1.0, &mut again), Some(ended));
        assert_eq!(again.layers(), &Layer::ORDER);
    }

    #[test]
    fn test_bad_elapsed_is_ignored() {
        let mut session = session();
        let mut list = DrawList::new();
        session.advance(f32::NAN, &mut list);
        session.advance(-1.0, &mut list);
        assert_eq!(session.state().time_ticks, 0);
    }
}
