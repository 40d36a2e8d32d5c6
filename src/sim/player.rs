//! The player-controlled wizard
//!
//! Movement is resolved one axis at a time against the level's platforms
//! (horizontal, then jump, then vertical). Combat spawns spells and attacks
//! into the player's own [`Projectiles`] set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{resolve_horizontal, resolve_vertical};
use super::enemy::{EnemyId, EnemyRegistry};
use super::geom::{Direction, Rect};
use super::particles::Burst;
use super::platform::Platform;
use super::projectile::{Attack, KILL_EXPLOSION, Projectiles, Spell};
use super::state::{GameEvent, TickContext};
use crate::consts::*;
use crate::customization::CustomizationData;

const JUMP_DUST: Burst = Burst::new(15, 3.0, 3.0, 30);
const DAMAGE_BURST: Burst = Burst::new(30, 4.0, 4.0, 20);

/// Held movement intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Result of a `cast_attack` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Still recharging; nothing happened
    OnCooldown,
    /// Target was close enough to be killed without a bolt
    InstantHit(EnemyId),
    /// A homing bolt was launched at the target
    Homing(EnemyId),
    /// No target; a straight bolt was launched along the facing direction
    Straight,
}

/// The wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub on_ground: bool,
    pub facing_right: bool,
    /// Ticks of remaining damage immunity
    pub invulnerable_ticks: u32,
    /// Ticks of remaining red tint after a hit
    pub damage_flash: u32,
    pub spell_cooldown: u32,
    pub attack_cooldown: u32,
    pub customization: CustomizationData,
    pub projectiles: Projectiles,
    /// Walk cycle frame (0..4)
    pub frame: u32,
    anim_timer: f32,
}

impl Player {
    pub fn new(spawn: Vec2, customization: CustomizationData) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            on_ground: false,
            facing_right: true,
            invulnerable_ticks: 0,
            damage_flash: 0,
            spell_cooldown: 0,
            attack_cooldown: 0,
            customization,
            projectiles: Projectiles::default(),
            frame: 0,
            anim_timer: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn facing(&self) -> Direction {
        Direction::from_facing_right(self.facing_right)
    }

    /// Casting hand: front edge of the body, a fixed distance below the top
    pub fn hand_pos(&self) -> Vec2 {
        let x = if self.facing_right {
            self.pos.x + self.size.x
        } else {
            self.pos.x
        };
        Vec2::new(x, self.pos.y + HAND_OFFSET_Y)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health as a fraction of the maximum
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    /// Advance one tick: movement and collision, timers, then projectiles
    pub fn update(
        &mut self,
        input: MoveInput,
        platforms: &[Platform],
        enemies: &mut EnemyRegistry,
        ctx: &mut TickContext,
    ) {
        self.move_horizontal(input, platforms, ctx.field.x);
        if input.jump {
            self.jump(ctx);
        }
        self.move_vertical(platforms, ctx);
        self.animate();
        self.tick_timers();
        self.projectiles.update(enemies, ctx);
    }

    fn move_horizontal(&mut self, input: MoveInput, platforms: &[Platform], field_width: f32) {
        if input.left {
            self.vel.x = (self.vel.x - PLAYER_ACCEL).max(-PLAYER_MAX_SPEED);
            self.facing_right = false;
        } else if input.right {
            self.vel.x = (self.vel.x + PLAYER_ACCEL).min(PLAYER_MAX_SPEED);
            self.facing_right = true;
        } else if self.vel.x > 0.0 {
            self.vel.x = (self.vel.x - PLAYER_DECEL).max(0.0);
        } else if self.vel.x < 0.0 {
            self.vel.x = (self.vel.x + PLAYER_DECEL).min(0.0);
        }

        let prev_x = self.pos.x;
        let mut body = self.rect();
        body.x += self.vel.x;
        let contact =
            resolve_horizontal(&mut body, prev_x, &mut self.vel.x, platforms, field_width);
        if contact.blocked() {
            log::trace!("Player blocked at x={:.1}", body.x);
        }
        self.pos.x = body.x;
    }

    /// Leave the ground if standing on it. Returns whether a jump happened.
    pub fn jump(&mut self, ctx: &mut TickContext) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel.y = JUMP_IMPULSE;
        self.on_ground = false;
        let feet = Vec2::new(self.center().x, self.pos.y + self.size.y);
        ctx.particles.spawn(feet, ctx.palette.jump_dust, JUMP_DUST);
        true
    }

    fn move_vertical(&mut self, platforms: &[Platform], ctx: &mut TickContext) {
        self.vel.y += GRAVITY;

        let prev_y = self.pos.y;
        let mut body = self.rect();
        body.y += self.vel.y;
        self.on_ground = false;
        let contact = resolve_vertical(&mut body, prev_y, &mut self.vel.y, platforms);
        self.pos.y = body.y;

        if contact.hit_ceiling {
            log::trace!("Player bumped a ceiling at y={:.1}", self.pos.y);
        }
        if contact.landed {
            self.on_ground = true;
            if contact.impact_speed > LANDING_DUST_SPEED {
                let feet = Vec2::new(self.center().x, self.pos.y + self.size.y);
                let dust = Burst::new(contact.impact_speed as u32, 2.0, 3.0, 30);
                ctx.particles.spawn(feet, ctx.palette.landing_dust, dust);
            }
        }

        // Floor clamp for levels without a ground platform
        if self.pos.y > ctx.field.y {
            self.pos.y = ctx.field.y - self.size.y;
            self.vel.y = 0.0;
            self.on_ground = true;
        }
    }

    fn animate(&mut self) {
        if self.vel.x.abs() > 0.5 || !self.on_ground {
            self.anim_timer += self.vel.x.abs() * 0.02;
            if self.anim_timer >= 1.0 {
                self.frame = (self.frame + 1) % 4;
                self.anim_timer = 0.0;
            }
        }
    }

    fn tick_timers(&mut self) {
        self.spell_cooldown = self.spell_cooldown.saturating_sub(1);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.damage_flash = self.damage_flash.saturating_sub(1);
        if self.invulnerable_ticks > 0 {
            self.invulnerable_ticks -= 1;
            if self.invulnerable_ticks == 0 {
                self.damage_flash = 0;
            }
        }
    }

    /// Fire a wobbling spell from the casting hand
    ///
    /// Returns false while the spell cooldown is running.
    pub fn cast_spell(&mut self, ctx: &mut TickContext) -> bool {
        if self.spell_cooldown > 0 {
            return false;
        }
        let power = self.customization.magic_power;
        let color = self.customization.magic_color;
        let hand = self.hand_pos();

        let burst = Burst::new((20.0 * power) as u32, 4.0 * power, 3.0 * power, 20);
        ctx.particles.spawn(hand, color, burst);
        self.projectiles
            .spells
            .push(Spell::new(hand, self.facing(), color, power));
        self.spell_cooldown = SPELL_COOLDOWN_TICKS;
        ctx.events.push(GameEvent::SpellCast);
        true
    }

    /// Attack the nearest active enemy, or fire straight ahead if none
    ///
    /// A target within [`INSTANT_HIT_RANGE`] dies immediately and no bolt is
    /// created. Otherwise a homing bolt is launched and the player turns to
    /// face the target.
    pub fn cast_attack(
        &mut self,
        enemies: &mut EnemyRegistry,
        ctx: &mut TickContext,
    ) -> AttackOutcome {
        if self.attack_cooldown > 0 {
            return AttackOutcome::OnCooldown;
        }
        self.attack_cooldown = ATTACK_COOLDOWN_TICKS;

        let power = self.customization.magic_power;
        let color = self.customization.magic_color;
        let center = self.center();
        let half_bolt = Vec2::new((ATTACK_WIDTH / 2.0).floor(), (ATTACK_HEIGHT / 2.0).floor());

        let target = enemies
            .nearest_active(center)
            .and_then(|(id, dist)| enemies.get(id).map(|e| (id, dist, e.center())));

        let outcome = match target {
            Some((id, dist, target_center)) if dist < INSTANT_HIT_RANGE => {
                let killed = enemies.get_mut(id).is_some_and(|e| e.kill());
                if killed {
                    ctx.events.push(GameEvent::EnemyKilled { id });
                }
                log::debug!("Instant hit on enemy {:?} at distance {:.1}", id, dist);
                ctx.particles.spawn(target_center, color, KILL_EXPLOSION);
                return AttackOutcome::InstantHit(id);
            }
            Some((id, dist, target_center)) => {
                let to_right = target_center.x > center.x;
                self.facing_right = to_right;
                let delta = target_center - center;
                let heading = delta.y.atan2(delta.x);
                log::debug!(
                    "Targeting enemy {:?} at distance {:.1}, heading {:.1} deg",
                    id,
                    dist,
                    heading.to_degrees()
                );

                let start = Vec2::new(
                    center.x + self.facing().sign() * ATTACK_MUZZLE_OFFSET - half_bolt.x,
                    center.y - half_bolt.y,
                );
                self.projectiles
                    .attacks
                    .push(Attack::homing(start, id, heading, color, power));
                AttackOutcome::Homing(id)
            }
            None => {
                let start = Vec2::new(
                    center.x + self.facing().sign() * ATTACK_MUZZLE_OFFSET - half_bolt.x,
                    self.hand_pos().y - half_bolt.y,
                );
                self.projectiles
                    .attacks
                    .push(Attack::straight(start, self.facing(), color, power));
                AttackOutcome::Straight
            }
        };

        let burst = Burst::new((30.0 * power) as u32, 5.0 * power, 4.0 * power, 15);
        ctx.particles.spawn(self.hand_pos(), color, burst);
        ctx.events.push(GameEvent::AttackCast);
        outcome
    }

    /// Apply damage unless invulnerable
    ///
    /// Health saturates at zero. Starts the invulnerability window and the
    /// damage flash. Returns whether damage was applied.
    pub fn take_damage(&mut self, amount: u32, ctx: &mut TickContext) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_ticks = INVULNERABILITY_TICKS;
        self.damage_flash = DAMAGE_FLASH_TICKS;
        ctx.particles
            .spawn(self.center(), ctx.palette.damage, DAMAGE_BURST);
        ctx.events.push(GameEvent::PlayerDamaged {
            amount,
            health: self.health,
        });
        log::debug!(
            "Player took {} damage, health {}/{}",
            amount,
            self.health,
            self.max_health
        );
        true
    }
}
