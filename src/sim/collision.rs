//! Circle overlap tests between entities
//!
//! Everything that collides in this game is a circle: ship, bullets and rocks.
//! Contact is inclusive (`distance <= r1 + r2`).

use glam::Vec2;

use super::entity::{EntityId, Others};

/// Whether two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) <= a_radius + b_radius
}

/// First live asteroid (collection order) touching the circle.
///
/// Rocks already destroyed this tick are skipped, so a second bullet in the
/// same tick flies through them instead of scoring a kill twice.
pub fn first_asteroid_hit(pos: Vec2, radius: f32, others: &Others<'_>) -> Option<EntityId> {
    others
        .asteroids()
        .find(|(entity, asteroid)| {
            !entity.body.remove && circles_overlap(pos, radius, entity.body.pos, asteroid.size)
        })
        .map(|(entity, _)| entity.id)
}

/// Whether any asteroid touches the circle
pub fn touches_any_asteroid(pos: Vec2, radius: f32, others: &Others<'_>) -> bool {
    others
        .asteroids()
        .any(|(entity, asteroid)| circles_overlap(pos, radius, entity.body.pos, asteroid.size))
}
