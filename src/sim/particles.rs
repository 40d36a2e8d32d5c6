//! Transient visual particles
//!
//! Particles never feed back into gameplay. Any component may request a burst;
//! the system integrates, ages and culls them once per tick.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::color::{Rgb, WHITE};
use crate::consts::MAX_PARTICLES;

/// Shape of a particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub count: u32,
    /// Upper bound of the per-particle speed (lower bound is 0.5)
    pub speed_max: f32,
    /// Upper bound of the per-particle radius (lower bound is 1)
    pub size_max: f32,
    /// Upper bound of the lifetime in ticks (lower bound is half of it)
    pub lifetime_max: u32,
}

impl Burst {
    pub const fn new(count: u32, speed_max: f32, size_max: f32, lifetime_max: u32) -> Self {
        Self {
            count,
            speed_max,
            size_max,
            lifetime_max,
        }
    }
}

/// Lowest speed a spawned particle can get
const MIN_PARTICLE_SPEED: f32 = 0.5;

/// A single visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    /// Base radius in pixels (at full life)
    pub size: u32,
    /// Remaining ticks
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// `life / max_life`, 1.0 when fresh
    pub fn fade_ratio(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    /// Two-step blend toward white as the particle ages
    pub fn render_color(&self) -> Rgb {
        let ratio = self.fade_ratio();
        if ratio > 0.7 {
            self.color
        } else if ratio > 0.4 {
            self.color.mix(WHITE, 0.3)
        } else {
            self.color.mix(WHITE, 0.7)
        }
    }

    /// Radius shrinks with the fade ratio, never below one pixel
    pub fn render_radius(&self) -> u32 {
        ((self.size as f32 * self.fade_ratio()) as u32).max(1)
    }
}

/// Owner of all live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    rng: Pcg32,
    capacity: usize,
    /// Set while the soft cap is evicting, so the warning logs once per episode
    overflowing: bool,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, MAX_PARTICLES)
    }

    /// Create a system with a custom soft cap
    pub fn with_capacity(seed: u64, capacity: usize) -> Self {
        Self {
            particles: VecDeque::new(),
            rng: Pcg32::seed_from_u64(seed),
            capacity: capacity.max(1),
            overflowing: false,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Spawn `burst.count` particles radiating from `origin`
    ///
    /// Direction is uniform in [0, 2π), speed uniform in [0.5, speed_max],
    /// lifetime uniform in [lifetime_max / 2, lifetime_max] and radius a
    /// uniform integer in [1, size_max]. Never spawns more than the soft cap
    /// could keep.
    pub fn spawn(&mut self, origin: Vec2, color: Rgb, burst: Burst) {
        let size_max = if burst.size_max.is_finite() {
            (burst.size_max as u32).max(1)
        } else {
            1
        };
        let speed_max = if burst.speed_max.is_finite() {
            burst.speed_max.max(MIN_PARTICLE_SPEED)
        } else {
            MIN_PARTICLE_SPEED
        };
        let lifetime_max = burst.lifetime_max.max(1);
        let count = burst.count.min(self.capacity as u32);

        for _ in 0..count {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(MIN_PARTICLE_SPEED..=speed_max);
            let life = self
                .rng
                .random_range(lifetime_max / 2..=lifetime_max)
                .max(1);
            let size = self.rng.random_range(1..=size_max);

            self.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                size,
                life,
                max_life: life,
            });
        }
    }

    /// Spawn `burst` with probability `chance` (trail emission)
    pub fn spawn_with_chance(&mut self, chance: f64, origin: Vec2, color: Rgb, burst: Burst) {
        if self.rng.random_bool(chance.clamp(0.0, 1.0)) {
            self.spawn(origin, color, burst);
        }
    }

    fn push(&mut self, particle: Particle) {
        self.particles.push_back(particle);
        if self.particles.len() > self.capacity {
            if !self.overflowing {
                log::warn!(
                    "Particle soft cap of {} reached, evicting oldest",
                    self.capacity
                );
                self.overflowing = true;
            }
            self.particles.pop_front();
        }
    }

    /// Integrate, age and cull. O(n) in live particles.
    pub fn update(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        if self.overflowing && self.particles.len() < self.capacity {
            self.overflowing = false;
        }
    }
}
