//! Population-capped periodic spawner
//!
//! The spawner owns a factory, rolls a random delay after every spawn and keeps
//! the ids of what it made so dead children free up population slots.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, Others, TickContext};
use super::particles::EmitterId;

/// Something that can build entities for a [`Spawner`]
pub trait EntityFactory: fmt::Debug {
    /// Build one entity (its id must come from `ctx.alloc_id()`)
    fn make(&mut self, others: &Others<'_>, ctx: &mut TickContext<'_>) -> Entity;

    /// Per-tick upkeep of factory-owned resources
    fn think(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Shared emitter drawn alongside the spawner, if any
    fn emitter(&self) -> Option<EmitterId> {
        None
    }
}

fn roll_delay(range: (u32, u32), rng: &mut Pcg32) -> f64 {
    rng.random_range(range.0..=range.1) as f64 / 1000.0
}

#[derive(Debug)]
pub struct Spawner {
    pub factory: Box<dyn EntityFactory>,
    /// Live children, in spawn order
    pub made: Vec<EntityId>,
    pub max_population: usize,
    /// Spawn delay range (ms)
    pub delay_ms: (u32, u32),
    next_delay: f64,
    last_spawn: f64,
}

impl Spawner {
    pub fn new(
        factory: Box<dyn EntityFactory>,
        delay_ms: (u32, u32),
        max_population: usize,
        now: f64,
        rng: &mut Pcg32,
    ) -> Self {
        Self {
            factory,
            made: Vec::new(),
            max_population,
            delay_ms,
            next_delay: roll_delay(delay_ms, rng),
            last_spawn: now,
        }
    }

    pub fn think(&mut self, others: &mut Others<'_>, ctx: &mut TickContext<'_>) {
        self.factory.think(ctx);

        // Children that are gone or dying no longer count
        self.made
            .retain(|id| others.get(*id).is_some_and(|e| !e.body.remove));

        if ctx.now >= self.last_spawn + self.next_delay && self.made.len() < self.max_population {
            let entity = self.factory.make(others, ctx);
            self.made.push(entity.id);
            ctx.spawn(entity);
            self.next_delay = roll_delay(self.delay_ms, ctx.rng);
            self.last_spawn = ctx.now;
        }
    }
}
