//! Floating "xN" marker shown when a kill extends a spree

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{Body, Bounds};
use super::entity::{Entity, EntityId, EntityKind};
use crate::consts::MARKER_LIFESPAN_MS;
use crate::polar_to_cartesian;

/// Approximate glyph box used for culling the label
const GLYPH_WIDTH: f32 = 8.0;
const GLYPH_HEIGHT: f32 = 14.0;

#[derive(Debug, Clone)]
pub struct MultiplierMarker {
    pub multiplier: f32,
    pub born_at: f64,
    /// Lifetime in seconds
    pub life_span: f64,
}

impl MultiplierMarker {
    pub fn new(multiplier: f32, now: f64) -> Self {
        Self {
            multiplier,
            born_at: now,
            life_span: MARKER_LIFESPAN_MS / 1000.0,
        }
    }

    pub fn label(&self) -> String {
        format!("x{}", self.multiplier)
    }

    /// Spawn a marker drifting away from `pos` in a random direction
    pub fn spawn(id: EntityId, pos: Vec2, multiplier: f32, now: f64, rng: &mut Pcg32) -> Entity {
        let marker = Self::new(multiplier, now);
        let angle = (rng.random_range(1..=360) as f32).to_radians();
        let speed = rng.random_range(5..=15) as f32 / 10.0;
        let width = marker.label().len() as f32 * GLYPH_WIDTH;
        let body = Body::new(pos)
            .with_velocity(polar_to_cartesian(speed, angle))
            .with_render_bounds(Some(Bounds::new(
                Vec2::splat(-1.0),
                Vec2::new(width, GLYPH_HEIGHT),
            )));
        Entity::new(id, body, EntityKind::Marker(marker))
    }

    pub fn think(&mut self, body: &mut Body, now: f64) {
        if now >= self.born_at + self.life_span {
            body.remove = true;
        }
    }
}
