//! Bullets: short-lived projectiles that split asteroids and score kills

use std::f32::consts::PI;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::asteroid::shatter;
use super::body::{Body, Bounds, ClipRegion};
use super::collision::first_asteroid_hit;
use super::entity::{Entity, EntityId, EntityKind, Others, TickContext};
use super::marker::MultiplierMarker;
use super::particles::{BULLET_TRAIL, ParticleEmitter};
use super::player::Loadout;
use crate::consts::BULLET_LIFESPAN_MS;
use crate::polar_to_cartesian;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub size: f32,
    pub bearing: f32,
    pub born_at: f64,
    /// Lifetime in seconds
    pub lifespan: f64,
    /// Ship credited with kills
    pub owner: EntityId,
    pub trail: ParticleEmitter,
}

impl Bullet {
    /// Build a bullet leaving `pos` along `bearing`, carrying the shooter's velocity
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        id: EntityId,
        owner: EntityId,
        pos: Vec2,
        shooter_vel: Vec2,
        bearing: f32,
        loadout: &Loadout,
        clip: ClipRegion,
        now: f64,
        particle_scale: f32,
        rng: &mut Pcg32,
    ) -> Entity {
        let bullet = Self {
            size: loadout.bullet_size,
            bearing,
            born_at: now,
            lifespan: BULLET_LIFESPAN_MS / 1000.0,
            owner,
            trail: ParticleEmitter::new(BULLET_TRAIL.scaled(particle_scale), pos, now, rng),
        };
        let body = Body::new(pos)
            .with_velocity(polar_to_cartesian(loadout.bullet_speed, bearing) + shooter_vel)
            .with_clip(clip)
            .with_render_bounds(Some(Bounds::square(loadout.bullet_size)));
        Entity::new(id, body, EntityKind::Bullet(bullet))
    }

    pub fn think(&mut self, body: &mut Body, others: &mut Others<'_>, ctx: &mut TickContext<'_>) {
        if ctx.now >= self.born_at + self.lifespan {
            body.remove = true;
            return;
        }

        self.trail.pos = body.pos;
        self.trail.set_direction(self.bearing + PI, 1.0);
        self.trail.think(ctx.now, ctx.rng);

        let Some(target) = first_asteroid_hit(body.pos, self.size, others) else {
            return;
        };
        self.resolve_hit(target, others, ctx);
        body.remove = true;
    }

    /// Credit the owner, then split or destroy the target
    fn resolve_hit(&self, target: EntityId, others: &mut Others<'_>, ctx: &mut TickContext<'_>) {
        let Some((max_size, size)) = others
            .get(target)
            .and_then(|e| e.as_asteroid())
            .map(|a| (a.max_size, a.size))
        else {
            return;
        };

        if let Some(owner) = others.get_mut(self.owner) {
            let owner_pos = owner.body.pos;
            if let Some(player) = owner.as_player_mut() {
                if let Some(multiplier) = player.register_kill(ctx.now, max_size, size) {
                    let id = ctx.alloc_id();
                    let marker = MultiplierMarker::spawn(id, owner_pos, multiplier, ctx.now, ctx.rng);
                    ctx.spawn(marker);
                }
            }
        }

        if let Some(asteroid) = others.get_mut(target) {
            if let Some(fragment) = shatter(asteroid, ctx) {
                ctx.spawn(fragment);
            }
        }
    }
}
