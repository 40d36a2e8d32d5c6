//! Headless entry point
//!
//! Loads settings and assets, then plays a scripted session through the
//! fixed-step driver and a tessellating render target.

use std::path::Path;

use wizard_quest::assets::{AssetCatalog, Assets};
use wizard_quest::consts::{SIM_DT, TICK_RATE};
use wizard_quest::customization::{Hat, RobeColor, Staff};
use wizard_quest::renderer::VertexBatch;
use wizard_quest::{Action, CustomizationData, InputEvent, Session, Settings};

/// Demo length before the script presses Escape
const DEMO_SECONDS: u32 = 20;

/// (frame, event) pairs replayed by the demo
fn script() -> Vec<(u32, InputEvent)> {
    use Action::*;
    use InputEvent::*;
    vec![
        (30, Pressed(MoveRight)),
        (45, Pressed(Jump)),
        (50, Released(Jump)),
        (60, Pressed(CastSpell)),
        (90, Released(MoveRight)),
        (95, Pressed(CastAttack)),
        (140, Pressed(MoveLeft)),
        (150, Pressed(CastAttack)),
        (200, Released(MoveLeft)),
        (210, Pressed(CastSpell)),
        (240, Pressed(Pause)),
        (300, Pressed(Pause)),
        (330, Pressed(CastAttack)),
        (DEMO_SECONDS * TICK_RATE, Pressed(Exit)),
    ]
}

fn main() {
    env_logger::init();
    log::info!("Wizard Quest (headless) starting...");

    let mut settings = Settings::load_or_default(Path::new(Settings::FILE_NAME));
    let assets = AssetCatalog::scan(Path::new("assets"));

    // Usage: wizard-quest [seed] [staff]
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    if let Some(name) = args.next() {
        match Staff::from_name(&name) {
            Some(staff) => {
                let robe = RobeColor::default().cycled((seed % RobeColor::ALL.len() as u64) as i32);
                settings.wizard_customization =
                    CustomizationData::from_presets(robe, Hat::default(), staff, &assets);
                if let Err(e) = settings.save(Path::new(Settings::FILE_NAME)) {
                    log::warn!("Could not save customization: {}", e);
                }
            }
            None => log::warn!("Unknown staff '{}', keeping saved customization", name),
        }
    }
    log::info!(
        "Wizard: {} robe, {} staff, power {:.1}",
        settings.wizard_customization.robe_name,
        settings.wizard_customization.staff.as_str(),
        settings.wizard_customization.magic_power
    );

    match assets.get_music("background") {
        Some(track) => log::info!(
            "Music: {} at volume {:.2}",
            track.display(),
            settings.music_volume
        ),
        None => log::info!("No background music found"),
    }

    let mut session = Session::from_settings(seed, &settings, Box::new(assets));
    let mut batch = VertexBatch::new();
    let script = script();

    let mut frame = 0;
    let ended = loop {
        for (_, event) in script.iter().filter(|(at, _)| *at == frame) {
            session.handle(*event);
        }

        batch.reset();
        if let Some(ended) = session.advance(SIM_DT, &mut batch) {
            break ended;
        }

        if frame % TICK_RATE == 0 {
            let state = session.state();
            log::debug!(
                "t={}s health={} enemies={} particles={} vertices={}",
                frame / TICK_RATE,
                state.player.health,
                state.enemies.len(),
                state.particles.len(),
                batch.vertices().len()
            );
        }
        frame += 1;
    };

    let state = session.state();
    log::info!(
        "Session ended: {:?} after {} ticks, health {}/{}, {} enemies left",
        ended.reason,
        ended.ticks,
        state.player.health,
        state.player.max_health,
        state.enemies.len()
    );
}
