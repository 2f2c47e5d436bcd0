//! Cosmetic particles and the capped emitters that own them
//!
//! Particles never affect gameplay. Each emitter owns a bounded pool; emission
//! into a full pool silently does nothing.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::body::{Body, Bounds};
use crate::polar_to_cartesian;

/// 8-bit RGB colour
pub type Rgb = [u8; 3];

/// Particle velocity decay
pub const PARTICLE_FRICTION: f32 = 0.999;

/// Static description of an emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterConfig {
    pub max_population: usize,
    /// Auto-emission delay range (ms); `None` = manual emission only
    pub delay_ms: Option<(u32, u32)>,
    /// Particle radius range (inclusive)
    pub size: (u32, u32),
    /// Particle lifetime range in ms (inclusive)
    pub life_ms: (u32, u32),
    pub colors: &'static [Rgb],
}

impl EmitterConfig {
    /// Scale the population cap (quality presets)
    pub fn scaled(mut self, scale: f32) -> Self {
        self.max_population = (self.max_population as f32 * scale).round() as usize;
        self
    }
}

/// Exhaust plume behind the ship
pub const ENGINE_EXHAUST: EmitterConfig = EmitterConfig {
    max_population: 400,
    delay_ms: Some((1, 50)),
    size: (2, 6),
    life_ms: (200, 2000),
    colors: &[[255, 100, 0], [255, 255, 0], [50, 50, 50], [100, 100, 100]],
};

/// Sparks when the gun fires
pub const MUZZLE_FLASH: EmitterConfig = EmitterConfig {
    max_population: 300,
    delay_ms: None,
    size: (1, 2),
    life_ms: (200, 1000),
    colors: &[[0, 0, 255], [50, 50, 255], [100, 100, 255]],
};

/// Short trail behind each bullet
pub const BULLET_TRAIL: EmitterConfig = EmitterConfig {
    max_population: 200,
    delay_ms: Some((20, 100)),
    size: (1, 2),
    life_ms: (10, 200),
    colors: &[[0, 0, 255], [50, 50, 255], [100, 100, 255]],
};

/// Rock debris, shared by an asteroid lineage
pub const ASTEROID_DEBRIS: EmitterConfig = EmitterConfig {
    max_population: 200,
    delay_ms: None,
    size: (1, 6),
    life_ms: (200, 700),
    colors: &[[50, 50, 50], [100, 100, 100], [255, 128, 0]],
};

/// A single short-lived particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub body: Body,
    pub color: Rgb,
    pub size: f32,
    /// Lifetime in seconds
    pub life_span: f64,
    pub born_at: f64,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgb, size: f32, life_span: f64, now: f64) -> Self {
        Self {
            body: Body::new(pos)
                .with_velocity(vel)
                .with_friction(PARTICLE_FRICTION)
                .with_render_bounds(Some(Bounds::square(size))),
            color,
            size,
            life_span,
            born_at: now,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now > self.born_at + self.life_span
    }
}

fn sample_delay(range: (u32, u32), rng: &mut Pcg32) -> f64 {
    rng.random_range(range.0..=range.1) as f64 / 1000.0
}

/// Bounded particle pool with a movable spawn point
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    pub config: EmitterConfig,
    /// Spawn point for the next particle
    pub pos: Vec2,
    /// Velocity template for the next particle
    pub vel: Vec2,
    particles: Vec<Particle>,
    last_emit: f64,
    /// Current auto-emission delay (seconds)
    next_delay: Option<f64>,
}

impl ParticleEmitter {
    pub fn new(config: EmitterConfig, pos: Vec2, now: f64, rng: &mut Pcg32) -> Self {
        let next_delay = config.delay_ms.map(|range| sample_delay(range, rng));
        Self {
            config,
            pos,
            vel: Vec2::ZERO,
            particles: Vec::new(),
            last_emit: now,
            next_delay,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn population(&self) -> usize {
        self.particles.len()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.config.max_population
    }

    /// Set the velocity template from a heading and magnitude
    pub fn set_direction(&mut self, angle: f32, magnitude: f32) {
        self.vel = polar_to_cartesian(magnitude, angle);
    }

    /// Spawn one particle; returns false when the pool is full
    pub fn emit(&mut self, now: f64, rng: &mut Pcg32) -> bool {
        if self.is_full() {
            return false;
        }
        let color = self
            .config
            .colors
            .choose(rng)
            .copied()
            .unwrap_or([255, 255, 255]);
        let size = rng.random_range(self.config.size.0..=self.config.size.1) as f32;
        let life = sample_delay(self.config.life_ms, rng);
        self.particles
            .push(Particle::new(self.pos, self.vel, color, size, life, now));
        self.last_emit = now;
        if let Some(range) = self.config.delay_ms {
            self.next_delay = Some(sample_delay(range, rng));
        }
        true
    }

    /// Emit `count` particles from `pos`, each with a random heading and a
    /// power drawn from `power` (tenths, inclusive)
    pub fn burst(&mut self, pos: Vec2, count: u32, power: (u32, u32), now: f64, rng: &mut Pcg32) {
        for _ in 0..count {
            self.pos = pos;
            let angle = (rng.random_range(1..=360) as f32).to_radians();
            let magnitude = rng.random_range(power.0..=power.1) as f32 / 10.0;
            self.set_direction(angle, magnitude);
            self.emit(now, rng);
        }
    }

    /// Auto-emit when due, then age out and move the pool
    pub fn think(&mut self, now: f64, rng: &mut Pcg32) {
        if let Some(delay) = self.next_delay {
            if now >= self.last_emit + delay {
                self.emit(now, rng);
            }
        }
        self.particles.retain_mut(|particle| {
            if particle.is_expired(now) {
                return false;
            }
            particle.body.move_step();
            true
        });
    }
}

/// Handle to an emitter shared by several entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(usize);

/// Arena of shared emitters, addressed by [`EmitterId`]
#[derive(Debug, Default)]
pub struct Emitters {
    slots: Vec<ParticleEmitter>,
}

impl Emitters {
    pub fn insert(&mut self, emitter: ParticleEmitter) -> EmitterId {
        self.slots.push(emitter);
        EmitterId(self.slots.len() - 1)
    }

    pub fn get(&self, id: EmitterId) -> Option<&ParticleEmitter> {
        self.slots.get(id.0)
    }

    pub fn get_mut(&mut self, id: EmitterId) -> Option<&mut ParticleEmitter> {
        self.slots.get_mut(id.0)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_emit_samples_within_ranges() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(ASTEROID_DEBRIS, Vec2::new(5.0, 5.0), 0.0, &mut rng);
        for _ in 0..50 {
            assert!(emitter.emit(0.0, &mut rng));
        }
        for p in emitter.particles() {
            assert!((1.0..=6.0).contains(&p.size));
            assert!((0.2..=0.7).contains(&p.life_span));
            assert!(ASTEROID_DEBRIS.colors.contains(&p.color));
            assert_eq!(p.body.pos, Vec2::new(5.0, 5.0));
        }
    }

    #[test]
    fn test_full_emitter_ignores_emit() {
        let mut rng = rng();
        let config = EmitterConfig {
            max_population: 3,
            ..MUZZLE_FLASH
        };
        let mut emitter = ParticleEmitter::new(config, Vec2::ZERO, 0.0, &mut rng);
        for _ in 0..3 {
            emitter.emit(0.0, &mut rng);
        }
        assert_eq!(emitter.population(), 3);
        assert!(!emitter.emit(0.0, &mut rng));
        assert_eq!(emitter.population(), 3);
    }

    #[test]
    fn test_emit_uses_direction_template() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(MUZZLE_FLASH, Vec2::ZERO, 0.0, &mut rng);
        emitter.set_direction(0.0, 2.0);
        emitter.emit(0.0, &mut rng);
        let vel = emitter.particles()[0].body.vel;
        assert!((vel.x - 2.0).abs() < 1e-6);
        assert!(vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_manual_emitter_never_auto_emits() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(MUZZLE_FLASH, Vec2::ZERO, 0.0, &mut rng);
        for step in 0..120 {
            emitter.think(step as f64 / 60.0, &mut rng);
        }
        assert_eq!(emitter.population(), 0);
    }

    #[test]
    fn test_auto_emitter_emits_after_delay() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(BULLET_TRAIL, Vec2::ZERO, 0.0, &mut rng);
        emitter.think(0.0, &mut rng);
        assert_eq!(emitter.population(), 0);
        // Longest possible delay is 100 ms
        emitter.think(0.1, &mut rng);
        assert_eq!(emitter.population(), 1);
    }

    #[test]
    fn test_expired_particles_are_reaped() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(ASTEROID_DEBRIS, Vec2::ZERO, 0.0, &mut rng);
        emitter.burst(Vec2::ZERO, 10, (50, 100), 0.0, &mut rng);
        assert_eq!(emitter.population(), 10);
        emitter.think(0.1, &mut rng);
        assert_eq!(emitter.population(), 10);
        // Longest lifetime is 700 ms
        emitter.think(0.75, &mut rng);
        assert_eq!(emitter.population(), 0);
    }

    #[test]
    fn test_think_moves_live_particles() {
        let mut rng = rng();
        let mut emitter = ParticleEmitter::new(ASTEROID_DEBRIS, Vec2::ZERO, 0.0, &mut rng);
        emitter.set_direction(0.0, 5.0);
        emitter.emit(0.0, &mut rng);
        emitter.think(0.01, &mut rng);
        assert!((emitter.particles()[0].body.pos.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_scaled_cap() {
        assert_eq!(ENGINE_EXHAUST.scaled(0.25).max_population, 100);
        assert_eq!(ENGINE_EXHAUST.scaled(1.0).max_population, 400);
    }
}
