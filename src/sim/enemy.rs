//! Patrolling enemies and the registry that owns them
//!
//! Projectiles never hold an `&Enemy`. They hold an [`EnemyId`] (slot index +
//! generation) and look it up every tick, so a removed or recycled slot simply
//! reads as "gone".

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Direction, Rect};
use super::platform::EnemySpawn;
use crate::consts::{ENEMY_DEATH_TICKS, ENEMY_HEIGHT, ENEMY_WIDTH};

/// Enemy lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Walking back and forth between the patrol bounds
    Patrolling,
    /// Playing the death sequence; `timer` counts ticks since the kill
    Dying { timer: u32 },
    /// Finished dying, waiting for the cleanup pass
    Dead,
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub direction: Direction,
    pub patrol_min: f32,
    pub patrol_max: f32,
    pub state: EnemyState,
    /// Walk animation frame (0..4)
    pub frame: u32,
    anim_timer: f32,
}

impl Enemy {
    /// Create a patrolling enemy. Bounds are reordered if swapped and the start
    /// position is pulled inside them.
    pub fn new(
        pos: Vec2,
        patrol_min: f32,
        patrol_max: f32,
        speed: f32,
        direction: Direction,
    ) -> Self {
        let (patrol_min, patrol_max) = if patrol_min <= patrol_max {
            (patrol_min, patrol_max)
        } else {
            (patrol_max, patrol_min)
        };
        let mut enemy = Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            speed: speed.abs(),
            direction,
            patrol_min,
            patrol_max,
            state: EnemyState::Patrolling,
            frame: 0,
            anim_timer: 0.0,
        };
        enemy.pos.x = enemy.pos.x.clamp(patrol_min, enemy.patrol_upper());
        enemy
    }

    pub fn from_spawn(spawn: &EnemySpawn) -> Self {
        Self::new(
            spawn.pos,
            spawn.patrol_min,
            spawn.patrol_max,
            spawn.speed,
            spawn.direction,
        )
    }

    /// Highest x the left edge may reach: the whole body stays inside the beat
    /// when it fits, otherwise the enemy pins to `patrol_min`
    fn patrol_upper(&self) -> f32 {
        (self.patrol_max - self.size.x).max(self.patrol_min)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Only patrolling enemies can be targeted, hit or hurt the player
    pub fn is_active(&self) -> bool {
        self.state == EnemyState::Patrolling
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Start the death sequence. Returns `false` (and changes nothing) if the
    /// enemy is already dying or dead.
    #[must_use]
    pub fn kill(&mut self) -> bool {
        match self.state {
            EnemyState::Patrolling => {
                self.state = EnemyState::Dying { timer: 0 };
                true
            }
            EnemyState::Dying { .. } | EnemyState::Dead => false,
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        match self.state {
            EnemyState::Patrolling => self.patrol(),
            EnemyState::Dying { timer } => {
                let timer = timer + 1;
                self.state = if timer >= ENEMY_DEATH_TICKS {
                    EnemyState::Dead
                } else {
                    EnemyState::Dying { timer }
                };
            }
            EnemyState::Dead => {}
        }
    }

    fn patrol(&mut self) {
        self.pos.x += self.speed * self.direction.sign();

        let upper = self.patrol_upper();
        if self.pos.x <= self.patrol_min {
            self.pos.x = self.patrol_min;
            self.direction = Direction::Right;
        } else if self.pos.x >= upper {
            self.pos.x = upper;
            self.direction = Direction::Left;
        }

        self.anim_timer += self.speed * 0.1;
        if self.anim_timer >= 1.0 {
            self.frame = (self.frame + 1) % 4;
            self.anim_timer = 0.0;
        }
    }
}

/// Stable handle to a registry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    enemy: Option<Enemy>,
}

/// Arena of enemies addressed by generational ids
///
/// Iteration order is slot order, which keeps ticks deterministic.
#[derive(Debug, Clone, Default)]
pub struct EnemyRegistry {
    slots: Vec<Slot>,
    /// Vacant slot indices, reused LIFO
    free_list: Vec<usize>,
    len: usize,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, enemy: Enemy) -> EnemyId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.enemy = Some(enemy);
            EnemyId {
                index: index as u32,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                enemy: Some(enemy),
            });
            EnemyId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.enemy.as_ref())
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.enemy.as_mut())
    }

    /// Remove an enemy; every outstanding id for it becomes stale
    pub fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = id.index as usize;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != id.generation {
            return None;
        }
        let enemy = slot.enemy.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.len -= 1;
        Some(enemy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.enemy.as_ref().map(|enemy| {
                (
                    EnemyId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    enemy,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EnemyId, &mut Enemy)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.enemy.as_mut().map(|enemy| {
                (
                    EnemyId {
                        index: index as u32,
                        generation,
                    },
                    enemy,
                )
            })
        })
    }

    /// Ids of every live enemy, in slot order
    pub fn ids(&self) -> Vec<EnemyId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Advance every enemy one tick
    pub fn update_all(&mut self) {
        for (_, enemy) in self.iter_mut() {
            enemy.update();
        }
    }

    /// Cleanup pass: drop enemies that finished dying. Returns how many went.
    pub fn remove_dead(&mut self) -> usize {
        let dead: Vec<EnemyId> = self
            .iter()
            .filter(|(_, enemy)| enemy.is_dead())
            .map(|(id, _)| id)
            .collect();
        for id in &dead {
            self.remove(*id);
        }
        dead.len()
    }

    /// Nearest active enemy to `point` by centre distance (ties keep slot order)
    pub fn nearest_active(&self, point: Vec2) -> Option<(EnemyId, f32)> {
        let mut best: Option<(EnemyId, f32)> = None;
        for (id, enemy) in self.iter() {
            if !enemy.is_active() {
                continue;
            }
            let distance = enemy.center().distance(point);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn walker() -> Enemy {
        Enemy::new(Vec2::new(200.0, 380.0), 120.0, 330.0, 1.0, Direction::Right)
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut enemy = walker();
        assert!(enemy.kill());
        assert_eq!(enemy.state, EnemyState::Dying { timer: 0 });
        assert!(!enemy.kill());
        assert_eq!(enemy.state, EnemyState::Dying { timer: 0 });

        enemy.update();
        assert!(!enemy.kill());
        assert_eq!(enemy.state, EnemyState::Dying { timer: 1 });
    }

    #[test]
    fn test_dying_ignores_movement_and_dies_after_duration() {
        let mut enemy = walker();
        let x = enemy.pos.x;
        assert!(enemy.kill());
        for _ in 0..ENEMY_DEATH_TICKS - 1 {
            enemy.update();
            assert!(matches!(enemy.state, EnemyState::Dying { .. }));
        }
        assert_eq!(enemy.pos.x, x);
        enemy.update();
        assert!(enemy.is_dead());
        assert!(!enemy.kill());
    }

    #[test]
    fn test_patrol_reverses_at_bounds() {
        let mut enemy = Enemy::new(Vec2::new(295.0, 0.0), 120.0, 330.0, 2.0, Direction::Right);
        // Upper limit for the left edge is 330 - 30 = 300
        for _ in 0..3 {
            enemy.update();
        }
        assert_eq!(enemy.pos.x, 300.0);
        assert_eq!(enemy.direction, Direction::Left);
        enemy.update();
        assert_eq!(enemy.pos.x, 298.0);

        let mut enemy = Enemy::new(Vec2::new(121.0, 0.0), 120.0, 330.0, 2.0, Direction::Left);
        enemy.update();
        assert_eq!(enemy.pos.x, 120.0);
        assert_eq!(enemy.direction, Direction::Right);
    }

    #[test]
    fn test_new_pulls_start_inside_bounds() {
        let enemy = Enemy::new(Vec2::new(10.0, 0.0), 330.0, 120.0, -1.0, Direction::Left);
        assert_eq!(enemy.patrol_min, 120.0);
        assert_eq!(enemy.patrol_max, 330.0);
        assert_eq!(enemy.pos.x, 120.0);
        assert_eq!(enemy.speed, 1.0);
    }

    #[test]
    fn test_animation_advances_with_speed() {
        let mut enemy = walker();
        for _ in 0..11 {
            enemy.update();
        }
        assert_eq!(enemy.frame, 1);
    }

    #[test]
    fn test_registry_stale_id_after_remove() {
        let mut reg = EnemyRegistry::new();
        let a = reg.insert(walker());
        assert!(reg.get(a).is_some());
        assert!(reg.remove(a).is_some());
        assert!(reg.get(a).is_none());
        assert!(reg.remove(a).is_none());

        // Slot is recycled but the old id stays stale
        let b = reg.insert(walker());
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
        assert!(reg.get(b).is_some());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_registry_remove_dead() {
        let mut reg = EnemyRegistry::new();
        let a = reg.insert(walker());
        let b = reg.insert(walker());
        assert!(reg.get_mut(a).unwrap().kill());
        for _ in 0..ENEMY_DEATH_TICKS {
            reg.update_all();
        }
        assert_eq!(reg.remove_dead(), 1);
        assert!(reg.get(a).is_none());
        assert!(reg.get(b).is_some());
    }

    #[test]
    fn test_nearest_active_skips_dying() {
        let mut reg = EnemyRegistry::new();
        let idle_at = |x: f32| Enemy::new(Vec2::new(x, 0.0), 0.0, 800.0, 0.0, Direction::Right);
        let near = reg.insert(idle_at(100.0));
        let far = reg.insert(idle_at(400.0));
        let origin = Vec2::new(0.0, 20.0);

        assert_eq!(reg.nearest_active(origin).map(|(id, _)| id), Some(near));
        assert!(reg.get_mut(near).unwrap().kill());
        assert_eq!(reg.nearest_active(origin).map(|(id, _)| id), Some(far));
        assert!(!reg.get(near).unwrap().is_active());
        assert!(reg.get(far).unwrap().is_active());
    }

    proptest! {
        #[test]
        fn prop_patrol_stays_in_bounds(
            start in -200.0f32..1000.0,
            min in 0.0f32..400.0,
            span in 0.0f32..400.0,
            speed in 0.0f32..40.0,
            right in any::<bool>(),
            ticks in 1usize..400,
        ) {
            let max = min + span;
            let mut enemy = Enemy::new(
                Vec2::new(start, 0.0),
                min,
                max,
                speed,
                Direction::from_facing_right(right),
            );
            prop_assert!(enemy.pos.x >= min && enemy.pos.x <= max);
            for _ in 0..ticks {
                enemy.update();
                prop_assert!(enemy.pos.x >= min && enemy.pos.x <= max);
            }
        }
    }
}
