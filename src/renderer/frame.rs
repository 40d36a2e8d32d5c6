//! Frame composition: draws a `GameState` layer by layer
//!
//! Images come from the asset collaborator when present; every image has a
//! procedural fallback so a frame always renders.

use glam::Vec2;

use super::shapes::rotate_about;
use super::{Layer, RenderTarget, Sprite};
use crate::assets::Assets;
use crate::consts::{HAND_OFFSET_Y, SPELL_COOLDOWN_TICKS, SPELL_SIZE};
use crate::customization::Hat;
use crate::sim::color::{Rgb, WHITE};
use crate::sim::enemy::{Enemy, EnemyState};
use crate::sim::geom::{Direction, Rect};
use crate::sim::particles::ParticleSystem;
use crate::sim::platform::{Material, Platform};
use crate::sim::player::Player;
use crate::sim::projectile::{Attack, Spell};
use crate::sim::state::{GamePhase, GameState};

const ENEMY_BODY: Rgb = Rgb(70, 120, 50);
const ENEMY_EYES: Rgb = Rgb(220, 50, 50);
const DEAD_EYES: Rgb = Rgb(0, 0, 0);
const SKIN: Rgb = Rgb(255, 220, 180);
const DAMAGE_TINT: Rgb = Rgb(255, 0, 0);
const SPELL_RIM: Rgb = Rgb(100, 50, 200);

const HEALTH_BAR: Rect = Rect::new(20.0, 20.0, 200.0, 20.0);
const HEALTH_BACK: Rgb = Rgb(60, 60, 60);
const HEALTH_BORDER: Rgb = Rgb(200, 200, 200);
const HEALTH_HIGH: Rgb = Rgb(100, 200, 100);
const HEALTH_MID: Rgb = Rgb(200, 200, 100);
const HEALTH_LOW: Rgb = Rgb(200, 100, 100);

/// Alpha of the player while blinking during invulnerability
const BLINK_ALPHA: f32 = 150.0 / 255.0;

/// Draw the whole frame: background, platforms, enemies, player,
/// projectiles, particles, HUD
pub fn render_frame(state: &GameState, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    target.begin_layer(Layer::Background);
    draw_background(state, assets, target);

    target.begin_layer(Layer::Platforms);
    for platform in &state.level.platforms {
        draw_platform(platform, assets, target);
    }

    target.begin_layer(Layer::Enemies);
    for (_, enemy) in state.enemies.iter() {
        draw_enemy(enemy, assets, target);
    }

    target.begin_layer(Layer::Player);
    draw_player(&state.player, assets, target);

    target.begin_layer(Layer::Projectiles);
    for spell in &state.player.projectiles.spells {
        draw_spell(spell, assets, target);
    }
    for attack in &state.player.projectiles.attacks {
        draw_attack(attack, target);
    }

    target.begin_layer(Layer::Particles);
    render_particles(&state.particles, target);

    target.begin_layer(Layer::Hud);
    draw_hud(state, assets, target);
}

/// Particles fade toward white and shrink with age
pub fn render_particles(system: &ParticleSystem, target: &mut dyn RenderTarget) {
    for p in system.iter() {
        target.fill_circle(p.pos, p.render_radius() as f32, p.render_color(), 1.0);
    }
}

/// Health bar colour: green above half, yellow above a quarter, else red
pub fn health_color(health: u32, max_health: u32) -> Rgb {
    if health * 2 > max_health {
        HEALTH_HIGH
    } else if health * 4 > max_health {
        HEALTH_MID
    } else {
        HEALTH_LOW
    }
}

fn draw_background(state: &GameState, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let field = state.field();
    if let Some(image) = assets.get_image("background") {
        let full = Rect::new(0.0, 0.0, field.x, field.y);
        target.draw_image(image, full, Sprite::default());
        return;
    }

    target.clear(assets.get_color("background"));
    for star in state.starfield.stars() {
        // Bigger stars are brighter
        let level = (100.0 + 155.0 * star.size / 3.0).min(255.0) as u8;
        target.fill_circle(star.pos, star.size, Rgb(level, level, level), 1.0);
    }
}

fn draw_platform(platform: &Platform, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let r = platform.bounds;
    match platform.material {
        Material::Wood => {
            target.fill_rect(r, assets.get_color("wood_dark"), 1.0);

            // Planks
            let accent = assets.get_color("wood_accent");
            for x in (0..)
                .map(|i| r.left() + i as f32 * 20.0)
                .take_while(|x| *x < r.right())
            {
                target.line(Vec2::new(x, r.top()), Vec2::new(x, r.bottom()), accent, 2.0);
            }

            // Knots
            let light = assets.get_color("wood_light");
            let knots = ((r.w / 100.0) as u32).max(1);
            for i in 0..knots {
                let x = r.left() + r.w * (i as f32 + 0.5) / knots as f32;
                target.fill_circle(Vec2::new(x, r.center().y), 3.0, light, 1.0);
            }
        }
    }
}

fn draw_enemy(enemy: &Enemy, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let (rotation_deg, alpha, bob) = match enemy.state {
        EnemyState::Patrolling => (0.0, 1.0, (enemy.frame as f32 * 0.5).sin() * 2.0),
        EnemyState::Dying { timer } => {
            let timer = timer as f32;
            let alpha = (255.0 - 4.0 * timer).max(0.0) / 255.0;
            ((3.0 * timer).min(90.0), alpha, 0.0)
        }
        EnemyState::Dead => return,
    };
    let rect = enemy.rect().translated(Vec2::new(0.0, bob));

    if let Some(image) = assets.get_image("enemy") {
        let sprite = Sprite {
            rotation_deg,
            alpha,
            flip_x: enemy.direction == Direction::Left,
        };
        target.draw_image(image, rect, sprite);
        return;
    }

    // Pentagon body with two eyes
    let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
    let mut points = [
        Vec2::new(x + w / 2.0, y),
        Vec2::new(x + w, y + h / 3.0),
        Vec2::new(x + w, y + h),
        Vec2::new(x, y + h),
        Vec2::new(x, y + h / 3.0),
        Vec2::new(x + w / 3.0, y + h / 4.0),
        Vec2::new(x + 2.0 * w / 3.0, y + h / 4.0),
    ];
    rotate_about(&mut points, rect.center(), -rotation_deg.to_radians());

    target.fill_polygon(&points[..5], ENEMY_BODY, alpha);
    let eyes = if enemy.is_active() {
        ENEMY_EYES
    } else {
        DEAD_EYES
    };
    for eye in &points[5..] {
        target.fill_circle(*eye, 3.0, eyes, alpha);
    }
}

fn hat_points(hat: Hat, body: Rect) -> [Vec2; 3] {
    let cx = body.center().x;
    let brim = body.y + 2.0;
    let (half_width, height) = match hat {
        Hat::Pointed => (18.0, 32.0),
        Hat::Wide => (28.0, 24.0),
        Hat::Tall => (14.0, 44.0),
    };
    [
        Vec2::new(cx, brim - height),
        Vec2::new(cx + half_width, brim),
        Vec2::new(cx - half_width, brim),
    ]
}

fn draw_player(player: &Player, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let bob = (player.frame as f32 * 0.5).sin() * 2.0;
    let body = player.rect().translated(Vec2::new(0.0, bob));
    let flashing = player.damage_flash > 0;
    let blinking = !flashing && player.is_invulnerable() && player.invulnerable_ticks % 6 < 3;
    let alpha = if blinking { BLINK_ALPHA } else { 1.0 };

    if let Some(image) = assets.get_image("wizard") {
        let sprite = Sprite {
            alpha,
            flip_x: !player.facing_right,
            ..Sprite::default()
        };
        target.draw_image(image, body, sprite);
    } else {
        let robe = if flashing {
            player.customization.robe_color.mix(DAMAGE_TINT, 0.4)
        } else {
            player.customization.robe_color
        };
        let (x, y, w, h) = (body.x, body.y, body.w, body.h);
        // Robe widens toward the hem
        let robe_points = [
            Vec2::new(x + w * 0.25, y + 15.0),
            Vec2::new(x + w * 0.75, y + 15.0),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        target.fill_polygon(&robe_points, robe, alpha);
        target.fill_circle(Vec2::new(x + w / 2.0, y + 12.0), 9.0, SKIN, alpha);
        target.fill_polygon(
            &hat_points(player.customization.hat, body),
            robe.darker(40),
            alpha,
        );
    }

    // Casting glow for the first ticks after a spell
    if player.spell_cooldown > SPELL_COOLDOWN_TICKS.saturating_sub(10) {
        let hand_x = if player.facing_right {
            body.right() + 5.0
        } else {
            body.left() - 5.0
        };
        let hand = Vec2::new(hand_x, body.y + HAND_OFFSET_Y);
        let radius = 8.0 + (player.frame as f32 * 0.2).sin() * 2.0;
        target.fill_circle(hand, radius, player.customization.magic_color, 1.0);
        target.fill_circle(hand, radius - 2.0, WHITE, 0.4);
    }
}

fn draw_spell(spell: &Spell, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let size = SPELL_SIZE * spell.power;
    let dest = Rect::new(spell.pos.x, spell.pos.y, size, size);
    if let Some(image) = assets.get_image("magic_effect") {
        target.draw_image(image, dest, Sprite::default());
        return;
    }
    target.fill_rect(dest, spell.color, 1.0);
    target.stroke_rect(dest, SPELL_RIM, 2.0);
}

fn draw_attack(attack: &Attack, target: &mut dyn RenderTarget) {
    let rect = attack.rect();
    let center = rect.center();
    let heading = attack.heading();

    // Glow behind the tail
    let tail = center - Vec2::from_angle(heading) * (rect.w / 2.0);
    for (radius, alpha) in [(8.0, 150.0), (6.0, 110.0), (4.0, 70.0)] {
        target.fill_circle(tail, radius, attack.color, alpha / 255.0);
    }

    // Bolt and arrow tip are laid out pointing right, then turned
    let mut outline = rect.corners();
    rotate_about(&mut outline, center, heading);
    let mut tip = [
        Vec2::new(rect.right(), center.y),
        Vec2::new(rect.right() - 10.0, rect.top()),
        Vec2::new(rect.right() - 10.0, rect.bottom()),
    ];
    rotate_about(&mut tip, center, heading);

    target.fill_polygon(&outline, attack.color, 1.0);
    for i in 0..outline.len() {
        target.line(outline[i], outline[(i + 1) % outline.len()], WHITE, 2.0);
    }
    target.fill_polygon(&tip, attack.color, 1.0);
}

fn draw_hud(state: &GameState, assets: &dyn Assets, target: &mut dyn RenderTarget) {
    let player = &state.player;
    let bar = HEALTH_BAR;
    target.fill_rect(bar, HEALTH_BACK, 1.0);
    let filled = (bar.w * player.health_ratio()).floor();
    target.fill_rect(
        Rect::new(bar.x, bar.y, filled, bar.h),
        health_color(player.health, player.max_health),
        1.0,
    );
    target.stroke_rect(bar, HEALTH_BORDER, 2.0);

    let font = assets.get_font("text");
    let label = format!("Health: {}/{}", player.health, player.max_health);
    let text_y = bar.center().y - font.size as f32 / 2.0;
    target.draw_text(&label, Vec2::new(bar.x + 10.0, text_y), &font, WHITE);

    if state.phase == GamePhase::Paused {
        let field = state.field();
        target.fill_rect(Rect::new(0.0, 0.0, field.x, field.y), Rgb(0, 0, 0), 0.5);
        let title = assets.get_font("title");
        target.draw_text(
            "Paused",
            Vec2::new(field.x / 2.0 - 2.0 * title.size as f32, field.y / 2.0),
            &title,
            assets.get_color("magic_gold"),
        );
    }
}
