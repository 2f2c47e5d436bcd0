//! Asteroids: drifting rocks that halve on every hit
//!
//! A lineage of asteroids shares one debris emitter in the emitter arena.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{Body, Bounds, ClipRegion};
use super::entity::{Entity, EntityId, EntityKind, Others, TickContext};
use super::particles::{ASTEROID_DEBRIS, EmitterId, Emitters, ParticleEmitter};
use super::spawner::EntityFactory;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Debris particles per hit (inclusive)
const DEBRIS_BURST: (u32, u32) = (5, 20);
/// Debris particle power, in tenths (inclusive)
const DEBRIS_POWER: (u32, u32) = (50, 100);

#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Current radius
    pub size: f32,
    /// Radius at spawn, used for scoring
    pub max_size: f32,
    /// Distance covered per step
    pub speed: f32,
    /// Shared debris emitter
    pub emitter: EmitterId,
}

impl Asteroid {
    pub fn new(size: f32, emitter: EmitterId) -> Self {
        Self {
            size,
            max_size: size,
            speed: ASTEROID_SPEED,
            emitter,
        }
    }

    /// Build an asteroid entity heading along `heading`
    pub fn spawn(
        id: EntityId,
        pos: Vec2,
        size: f32,
        heading: f32,
        emitter: EmitterId,
        clip: Option<ClipRegion>,
    ) -> Entity {
        let asteroid = Self::new(size, emitter);
        let mut body = Body::new(pos)
            .with_velocity(polar_to_cartesian(asteroid.speed, heading))
            .with_render_bounds(Some(Bounds::square(size)));
        body.clip = clip;
        Entity::new(id, body, EntityKind::Asteroid(asteroid))
    }

    /// Below the minimum size the rock is gone
    pub fn is_terminal(&self) -> bool {
        self.size < ASTEROID_MIN_SIZE
    }

    /// Point the asteroid along a new heading at its own speed
    pub fn set_heading(&self, body: &mut Body, heading: f32) {
        body.vel = polar_to_cartesian(self.speed, heading);
    }

    /// Burst debris, halve, and flag removal when too small.
    /// Returns true when the asteroid was destroyed.
    pub fn take_hit(&mut self, body: &mut Body, ctx: &mut TickContext<'_>) -> bool {
        let count = ctx.rng.random_range(DEBRIS_BURST.0..=DEBRIS_BURST.1);
        if let Some(emitter) = ctx.emitters.get_mut(self.emitter) {
            emitter.burst(body.pos, count, DEBRIS_POWER, ctx.now, ctx.rng);
        }
        self.size /= 2.0;
        body.render_bounds = Some(Bounds::square(self.size));
        let destroyed = self.is_terminal();
        if destroyed {
            body.remove = true;
        }
        destroyed
    }
}

/// Resolve one hit on an asteroid entity.
///
/// A surviving asteroid splits: a same-size fragment leaves on a random
/// heading and the parent turns around onto the opposite heading.
pub fn shatter(entity: &mut Entity, ctx: &mut TickContext<'_>) -> Option<Entity> {
    let Entity { id, body, kind } = entity;
    let EntityKind::Asteroid(asteroid) = kind else {
        return None;
    };
    if asteroid.take_hit(body, ctx) {
        log::debug!("asteroid {} destroyed", id.0);
        return None;
    }
    let heading = (ctx.rng.random_range(1..=360) as f32).to_radians();
    let fragment_id = ctx.alloc_id();
    let fragment = Asteroid::spawn(
        fragment_id,
        body.pos,
        asteroid.size,
        heading,
        asteroid.emitter,
        body.clip,
    );
    asteroid.set_heading(body, heading + PI);
    log::debug!(
        "asteroid {} split into {} (size {})",
        id.0,
        fragment_id.0,
        asteroid.size
    );
    Some(fragment)
}

/// Places new asteroids on a ring far outside the screen around the player
#[derive(Debug)]
pub struct AsteroidFactory {
    pub player: EntityId,
    pub asteroid_size: f32,
    pub spawn_distance: f32,
    pub emitter: EmitterId,
}

impl AsteroidFactory {
    /// Create the factory and register its debris emitter
    pub fn new(player: EntityId, emitters: &mut Emitters, debris: ParticleEmitter) -> Self {
        let emitter = emitters.insert(debris);
        Self {
            player,
            asteroid_size: ASTEROID_SPAWN_SIZE,
            spawn_distance: ASTEROID_SPAWN_DISTANCE,
            emitter,
        }
    }

    /// Default debris emitter for a new lineage
    pub fn debris_emitter(now: f64, scale: f32, rng: &mut Pcg32) -> ParticleEmitter {
        ParticleEmitter::new(ASTEROID_DEBRIS.scaled(scale), Vec2::ZERO, now, rng)
    }

    /// Wrap region: the screen grown by one asteroid radius on every side
    pub fn clip_region(&self, resolution: Vec2) -> ClipRegion {
        let margin = Vec2::splat(self.asteroid_size);
        ClipRegion::wrap(-margin, resolution + margin)
    }
}

impl EntityFactory for AsteroidFactory {
    fn make(&mut self, others: &Others<'_>, ctx: &mut TickContext<'_>) -> Entity {
        let resolution = ctx.settings.resolution();
        let center = others
            .get(self.player)
            .map(|e| e.body.pos)
            .unwrap_or(resolution / 2.0);
        let angle = (ctx.rng.random_range(1..=360) as f32).to_radians();
        let pos = center + polar_to_cartesian(self.spawn_distance, angle);
        let heading = (ctx.rng.random_range(0..360) as f32).to_radians();
        let id = ctx.alloc_id();
        let mut entity = Asteroid::spawn(
            id,
            pos,
            self.asteroid_size,
            heading,
            self.emitter,
            Some(self.clip_region(resolution)),
        );
        // Settle onto the wrap region before the first frame
        entity.body.move_step();
        log::debug!("asteroid {} spawned at {:?}", id.0, entity.body.pos);
        entity
    }

    fn think(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(emitter) = ctx.emitters.get_mut(self.emitter) {
            emitter.think(ctx.now, ctx.rng);
        }
    }

    fn emitter(&self) -> Option<EmitterId> {
        Some(self.emitter)
    }
}
