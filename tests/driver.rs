//! Fixed-step driver and frame composition through `Session`

use wizard_quest::assets::AssetCatalog;
use wizard_quest::consts::{MAX_SUBSTEPS, SIM_DT};
use wizard_quest::renderer::{DrawCommand, DrawList, Layer, VertexBatch};
use wizard_quest::{Action, InputEvent, Session, SessionEndReason, Settings};

fn session(seed: u64) -> Session {
    Session::from_settings(seed, &Settings::default(), Box::new(AssetCatalog::new()))
}

#[test]
fn test_layers_follow_fixed_z_order() {
    let mut session = session(11);
    let mut batch = VertexBatch::new();
    session.handle(InputEvent::Pressed(Action::CastSpell));
    session.advance(SIM_DT, &mut batch);

    let layers: Vec<Layer> = batch.layer_starts().iter().map(|(l, _)| *l).collect();
    assert_eq!(layers, Layer::ORDER);
    // Geometry only ever grows from one layer to the next
    assert!(batch.layer_starts().windows(2).all(|w| w[0].1 <= w[1].1));
    assert!(!batch.as_bytes().is_empty());
    assert_eq!(batch.text_runs(), 1);
}

#[test]
fn test_render_sees_state_after_all_ticks() {
    let mut session = session(11);
    let mut list = DrawList::new();
    session.advance(3.0 * SIM_DT, &mut list);
    assert_eq!(session.state().time_ticks, 3);

    let health = format!(
        "Health: {}/{}",
        session.state().player.health,
        session.state().player.max_health
    );
    assert!(list.texts().any(|t| t == health));
    assert!(list.in_layer(Layer::Player).count() > 0);
}

#[test]
fn test_long_stall_is_capped() {
    let mut session = session(2);
    let mut list = DrawList::new();
    session.advance(5.0, &mut list);
    assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
}

#[test]
fn test_pause_freezes_simulation_but_still_renders() {
    let mut session = session(4);
    let mut list = DrawList::new();
    session.handle(InputEvent::Pressed(Action::Pause));
    session.advance(SIM_DT, &mut list);
    let ticks = session.state().time_ticks;

    list.clear_list();
    session.advance(10.0 * SIM_DT, &mut list);
    assert_eq!(session.state().time_ticks, ticks);
    assert!(list.texts().any(|t| t == "Paused"));
    assert!(
        list.in_layer(Layer::Background)
            .any(|cmd| matches!(cmd, DrawCommand::Clear(_)))
    );
}

#[test]
fn test_exit_reports_session_end() {
    let mut session = session(5);
    let mut list = DrawList::new();
    for _ in 0..10 {
        assert!(session.advance(SIM_DT, &mut list).is_none());
    }
    session.handle(InputEvent::Pressed(Action::Exit));
    let ended = session.advance(SIM_DT, &mut list).unwrap();
    assert_eq!(ended.reason, SessionEndReason::UserExit);
    assert_eq!(ended.ticks, 10);
}
