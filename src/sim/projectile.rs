//! Spells and attacks fired by the player
//!
//! A [`Spell`] is a free-flying bolt with a vertical wobble. An [`Attack`] is
//! either guided toward an enemy or flies straight; guidance is a tagged
//! variant so a homing attack always carries its target. When the target dies
//! or is removed the attack degrades in place to straight flight.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::enemy::{EnemyId, EnemyRegistry};
use super::geom::{Direction, Rect};
use super::particles::Burst;
use super::state::{GameEvent, TickContext};
use crate::consts::*;
use crate::normalize_angle;

const ATTACK_TRAIL: Burst = Burst::new(3, 1.0, 2.0, 10);
const ATTACK_EXPIRY: Burst = Burst::new(15, 3.0, 3.0, 20);
pub(crate) const KILL_EXPLOSION: Burst = Burst::new(50, 6.0, 5.0, 30);

/// Half the nominal spell size, used to find a spell's centre
const SPELL_HALF: f32 = SPELL_SIZE / 2.0;

/// True when `pos` is more than the off-screen margin outside the field
fn outside_field(pos: Vec2, field: Vec2, check_vertical: bool) -> bool {
    let out_x = pos.x < -OFFSCREEN_MARGIN || pos.x > field.x + OFFSCREEN_MARGIN;
    let out_y = pos.y < -OFFSCREEN_MARGIN || pos.y > field.y + OFFSCREEN_MARGIN;
    out_x || (check_vertical && out_y)
}

/// A free-flying magic bolt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    /// Top-left of the nominal 20×20 box
    pub pos: Vec2,
    pub speed: f32,
    pub direction: Direction,
    /// Wobble phase in radians
    pub phase: f32,
    /// Remaining ticks
    pub lifetime: u32,
    pub color: Rgb,
    pub power: f32,
}

impl Spell {
    pub fn new(pos: Vec2, direction: Direction, color: Rgb, power: f32) -> Self {
        Self {
            pos,
            speed: SPELL_BASE_SPEED * power,
            direction,
            phase: 0.0,
            lifetime: SPELL_LIFETIME,
            color,
            power,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(SPELL_HALF)
    }

    /// `lifetime / SPELL_LIFETIME`
    pub fn fade_ratio(&self) -> f32 {
        self.lifetime as f32 / SPELL_LIFETIME as f32
    }

    /// Advance one tick. Returns false once the spell has expired; the
    /// expiry explosion has already been spawned by then.
    pub fn update(&mut self, ctx: &mut TickContext) -> bool {
        self.pos.x += self.speed * self.direction.sign();
        self.pos.y += self.phase.sin() * SPELL_WOBBLE_AMPLITUDE;
        self.phase += SPELL_WOBBLE_STEP;
        self.lifetime = self.lifetime.saturating_sub(1);

        let trail = Burst::new((2.0 * self.power) as u32, 1.0, 2.0, 10);
        ctx.particles
            .spawn_with_chance(TRAIL_CHANCE, self.center(), self.color, trail);

        if self.lifetime == 0 || outside_field(self.pos, ctx.field, false) {
            let explosion = Burst::new((20.0 * self.power) as u32, 4.0 * self.power, 3.0, 20);
            ctx.particles.spawn(self.center(), self.color, explosion);
            return false;
        }
        true
    }
}

/// How an attack chooses its path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Guidance {
    /// Steering toward a live enemy; `heading` is in radians, normalized
    Homing { target: EnemyId, heading: f32 },
    /// Flying horizontally
    Straight { direction: Direction },
}

/// What happened to an attack during its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStep {
    Flying,
    /// Hit and killed its target; removed
    HitTarget(EnemyId),
    /// Ran out of lifetime or left the field; removed
    Expired,
}

/// A directed bolt, optionally homing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Top-left of the bolt's box
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub guidance: Guidance,
    /// Remaining ticks
    pub lifetime: u32,
    pub color: Rgb,
    pub power: f32,
}

impl Attack {
    /// A straight bolt travelling in `direction`
    pub fn straight(pos: Vec2, direction: Direction, color: Rgb, power: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(ATTACK_WIDTH, ATTACK_HEIGHT),
            speed: ATTACK_STRAIGHT_SPEED * power,
            guidance: Guidance::Straight { direction },
            lifetime: ATTACK_LIFETIME,
            color,
            power,
        }
    }

    /// A bolt steering toward `target`, starting on `heading`
    pub fn homing(pos: Vec2, target: EnemyId, heading: f32, color: Rgb, power: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(ATTACK_WIDTH, ATTACK_HEIGHT),
            speed: ATTACK_HOMING_SPEED * power,
            guidance: Guidance::Homing {
                target,
                heading: normalize_angle(heading),
            },
            lifetime: ATTACK_LIFETIME,
            color,
            power,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn is_homing(&self) -> bool {
        matches!(self.guidance, Guidance::Homing { .. })
    }

    pub fn target(&self) -> Option<EnemyId> {
        match self.guidance {
            Guidance::Homing { target, .. } => Some(target),
            Guidance::Straight { .. } => None,
        }
    }

    /// Current travel angle in radians (0 = right, π = left)
    pub fn heading(&self) -> f32 {
        match self.guidance {
            Guidance::Homing { heading, .. } => heading,
            Guidance::Straight {
                direction: Direction::Right,
            } => 0.0,
            Guidance::Straight {
                direction: Direction::Left,
            } => std::f32::consts::PI,
        }
    }

    pub fn fade_ratio(&self) -> f32 {
        self.lifetime as f32 / ATTACK_LIFETIME as f32
    }

    /// Advance one tick against the current enemy roster
    pub fn update(&mut self, enemies: &mut EnemyRegistry, ctx: &mut TickContext) -> AttackStep {
        match self.guidance {
            Guidance::Homing { target, heading } => {
                let live_target = enemies
                    .get(target)
                    .filter(|e| e.is_active())
                    .map(|e| (e.center(), e.rect()));

                match live_target {
                    Some((target_center, target_rect)) => {
                        let to_target = target_center - self.center();
                        let bearing = to_target.y.atan2(to_target.x);
                        let diff = normalize_angle(bearing - heading);
                        let heading = normalize_angle(heading + diff * HOMING_TURN_GAIN);
                        self.guidance = Guidance::Homing { target, heading };
                        self.pos += Vec2::from_angle(heading) * self.speed;

                        if self.rect().overlaps(&target_rect) {
                            let killed = enemies.get_mut(target).is_some_and(|e| e.kill());
                            if killed {
                                ctx.events.push(GameEvent::EnemyKilled { id: target });
                            }
                            log::debug!("Homing attack hit enemy {:?}", target);
                            ctx.particles
                                .spawn(target_center, self.color, KILL_EXPLOSION);
                            return AttackStep::HitTarget(target);
                        }
                    }
                    None => {
                        let direction = Direction::from_heading(heading);
                        log::debug!(
                            "Attack lost target {:?}, continuing {:?}",
                            target,
                            direction
                        );
                        self.guidance = Guidance::Straight { direction };
                        ctx.events.push(GameEvent::TargetLost { id: target });
                        self.pos.x += self.speed * direction.sign();
                    }
                }
            }
            Guidance::Straight { direction } => {
                self.pos.x += self.speed * direction.sign();
            }
        }

        self.lifetime = self.lifetime.saturating_sub(1);
        ctx.particles
            .spawn_with_chance(TRAIL_CHANCE, self.center(), self.color, ATTACK_TRAIL);

        let check_vertical = self.is_homing();
        if self.lifetime == 0 || outside_field(self.pos, ctx.field, check_vertical) {
            ctx.particles
                .spawn(self.center(), self.color, ATTACK_EXPIRY);
            return AttackStep::Expired;
        }
        AttackStep::Flying
    }
}

/// All live spells and attacks owned by one caster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projectiles {
    pub spells: Vec<Spell>,
    pub attacks: Vec<Attack>,
}

impl Projectiles {
    /// Advance every projectile, dropping the ones that finished
    pub fn update(&mut self, enemies: &mut EnemyRegistry, ctx: &mut TickContext) {
        self.spells.retain_mut(|spell| spell.update(ctx));
        self.attacks
            .retain_mut(|attack| attack.update(enemies, ctx) == AttackStep::Flying);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Palette;
    use crate::sim::enemy::{Enemy, EnemyState};
    use crate::sim::particles::ParticleSystem;

    const BLUE: Rgb = Rgb(100, 149, 237);

    struct Harness {
        particles: ParticleSystem,
        events: Vec<GameEvent>,
        palette: Palette,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                particles: ParticleSystem::new(42),
                events: Vec::new(),
                palette: Palette::default(),
            }
        }

        fn ctx(&mut self) -> TickContext<'_> {
            TickContext {
                particles: &mut self.particles,
                events: &mut self.events,
                palette: &self.palette,
                field: Vec2::new(800.0, 600.0),
            }
        }
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), x - 50.0, x + 80.0, 0.0, Direction::Right)
    }

    #[test]
    fn test_spell_moves_and_wobbles() {
        let mut h = Harness::new();
        let mut spell = Spell::new(Vec2::new(100.0, 100.0), Direction::Left, BLUE, 1.0);
        assert!(spell.update(&mut h.ctx()));
        // sin(0) = 0 on the first tick
        assert_eq!(spell.pos, Vec2::new(90.0, 100.0));
        assert!(spell.update(&mut h.ctx()));
        assert!((spell.pos.y - (100.0 + 0.1f32.sin() * 2.0)).abs() < 1e-5);
        assert_eq!(spell.lifetime, SPELL_LIFETIME - 2);
    }

    #[test]
    fn test_spell_expires_with_explosion() {
        let mut h = Harness::new();
        let mut spell = Spell::new(Vec2::new(400.0, 100.0), Direction::Right, BLUE, 1.0);
        spell.lifetime = 1;
        assert!(!spell.update(&mut h.ctx()));
        // 20 explosion particles plus at most 2 trail particles
        assert!(h.particles.len() >= 20 && h.particles.len() <= 22);
    }

    #[test]
    fn test_spell_scales_with_power() {
        let mut h = Harness::new();
        let mut spell = Spell::new(Vec2::new(400.0, 100.0), Direction::Right, BLUE, 1.5);
        assert_eq!(spell.speed, SPELL_BASE_SPEED * 1.5);
        assert!(spell.update(&mut h.ctx()));
        assert_eq!(spell.pos.x, 415.0);

        h.particles = ParticleSystem::new(42);
        spell.lifetime = 1;
        assert!(!spell.update(&mut h.ctx()));
        // 30 explosion particles plus at most 3 trail particles
        assert!(h.particles.len() >= 30 && h.particles.len() <= 33);
        let speeds = h.particles.iter().map(|p| p.vel.length());
        let fastest = speeds.fold(0.0, f32::max);
        assert!(fastest > 4.0 && fastest <= 6.0 + 1e-4);
    }

    #[test]
    fn test_spell_expires_off_field() {
        let mut h = Harness::new();
        let mut spell = Spell::new(Vec2::new(845.0, 100.0), Direction::Right, BLUE, 1.0);
        assert!(!spell.update(&mut h.ctx()));
    }

    #[test]
    fn test_spell_ignores_vertical_bounds() {
        let mut h = Harness::new();
        let mut spell = Spell::new(Vec2::new(400.0, -500.0), Direction::Right, BLUE, 1.0);
        assert!(spell.update(&mut h.ctx()));
    }

    #[test]
    fn test_straight_attack_travel() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let mut attack = Attack::straight(Vec2::new(400.0, 300.0), Direction::Left, BLUE, 1.0);
        assert_eq!(attack.update(&mut enemies, &mut h.ctx()), AttackStep::Flying);
        assert_eq!(attack.pos, Vec2::new(385.0, 300.0));
        assert_eq!(attack.heading(), std::f32::consts::PI);
        assert!(attack.target().is_none());
    }

    #[test]
    fn test_homing_turns_gradually() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        // Target straight above the bolt
        let id = enemies.insert(enemy_at(385.0, 0.0));
        let mut attack = Attack::homing(Vec2::new(385.0, 400.0), id, 0.0, BLUE, 1.0);
        attack.update(&mut enemies, &mut h.ctx());
        let Guidance::Homing { heading, .. } = attack.guidance else {
            panic!("attack should still be homing");
        };
        // Bearing is about -π/2; one step turns 30% of the way
        assert!(heading < 0.0);
        assert!(heading > -std::f32::consts::FRAC_PI_2 * 0.5);
    }

    #[test]
    fn test_homing_hit_kills_target() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let id = enemies.insert(enemy_at(400.0, 300.0));
        let mut attack = Attack::homing(Vec2::new(380.0, 310.0), id, 0.0, BLUE, 1.0);
        let step = attack.update(&mut enemies, &mut h.ctx());
        assert_eq!(step, AttackStep::HitTarget(id));
        assert!(matches!(
            enemies.get(id).unwrap().state,
            EnemyState::Dying { .. }
        ));
        assert!(h.events.contains(&GameEvent::EnemyKilled { id }));
        assert!(h.particles.len() >= 50);
    }

    #[test]
    fn test_homing_degrades_when_target_dies() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let id = enemies.insert(enemy_at(600.0, 300.0));
        let mut attack = Attack::homing(Vec2::new(300.0, 300.0), id, 0.0, BLUE, 1.0);
        attack.update(&mut enemies, &mut h.ctx());
        assert!(attack.is_homing());

        assert!(enemies.get_mut(id).unwrap().kill());
        let before = attack.pos;
        attack.update(&mut enemies, &mut h.ctx());
        assert_eq!(
            attack.guidance,
            Guidance::Straight {
                direction: Direction::Right
            }
        );
        assert_eq!(attack.pos.x, before.x + attack.speed);
        assert_eq!(attack.pos.y, before.y);
        assert!(h.events.contains(&GameEvent::TargetLost { id }));
    }

    #[test]
    fn test_homing_degrades_when_target_removed() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let id = enemies.insert(enemy_at(100.0, 300.0));
        let mut attack =
            Attack::homing(Vec2::new(500.0, 300.0), id, std::f32::consts::PI, BLUE, 1.0);
        enemies.remove(id);
        attack.update(&mut enemies, &mut h.ctx());
        assert_eq!(
            attack.guidance,
            Guidance::Straight {
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_attack_expires_after_lifetime() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let mut attack = Attack::straight(Vec2::new(400.0, 300.0), Direction::Right, BLUE, 0.1);
        let mut ticks = 0;
        while attack.update(&mut enemies, &mut h.ctx()) == AttackStep::Flying {
            ticks += 1;
        }
        assert_eq!(ticks, ATTACK_LIFETIME - 1);
    }

    #[test]
    fn test_projectiles_update_retains_live() {
        let mut h = Harness::new();
        let mut enemies = EnemyRegistry::new();
        let mut set = Projectiles::default();
        let in_field = Vec2::new(400.0, 100.0);
        let off_field = Vec2::new(900.0, 100.0);
        set.spells
            .push(Spell::new(in_field, Direction::Right, BLUE, 1.0));
        set.attacks
            .push(Attack::straight(off_field, Direction::Right, BLUE, 1.0));
        set.update(&mut enemies, &mut h.ctx());
        assert_eq!(set.spells.len(), 1);
        assert!(set.attacks.is_empty());
    }
}
