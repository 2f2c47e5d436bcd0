//! Entity arena types and the single dispatch point for entity behaviour
//!
//! Entities live in one ordered `Vec`. While an entity thinks, it sees every
//! other entity through [`Others`] and stages new entities on the
//! [`TickContext`]; removals are only flagged and reaped after the think phase.

use rand_pcg::Pcg32;

use super::asteroid::Asteroid;
use super::body::Body;
use super::bullet::Bullet;
use super::marker::MultiplierMarker;
use super::particles::Emitters;
use super::player::Player;
use super::spawner::Spawner;
use super::state::{GameEvent, Prompt};
use super::tick::InputEvent;
use crate::settings::Settings;

/// Stable entity handle (never reused within a game)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Closed set of simulated object kinds
#[derive(Debug)]
pub enum EntityKind {
    Player(Box<Player>),
    Spawner(Spawner),
    Asteroid(Asteroid),
    Bullet(Bullet),
    Marker(MultiplierMarker),
}

/// A simulated object: kinematics plus kind-specific state
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, body: Body, kind: EntityKind) -> Self {
        Self { id, body, kind }
    }

    /// Deliver one input event
    pub fn notify(&mut self, event: &InputEvent) {
        if let EntityKind::Player(player) = &mut self.kind {
            player.notify(event);
        }
    }

    /// Per-tick behaviour
    pub fn think(&mut self, others: &mut Others<'_>, ctx: &mut TickContext<'_>) {
        match &mut self.kind {
            EntityKind::Player(player) => player.think(self.id, &mut self.body, others, ctx),
            EntityKind::Spawner(spawner) => spawner.think(others, ctx),
            EntityKind::Asteroid(_) => {}
            EntityKind::Bullet(bullet) => bullet.think(&mut self.body, others, ctx),
            EntityKind::Marker(marker) => marker.think(&mut self.body, ctx.now),
        }
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match &self.kind {
            EntityKind::Asteroid(asteroid) => Some(asteroid),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn is_asteroid(&self) -> bool {
        matches!(self.kind, EntityKind::Asteroid(_))
    }
}

/// Every entity except the one currently thinking
pub struct Others<'a> {
    before: &'a mut [Entity],
    after: &'a mut [Entity],
}

impl<'a> Others<'a> {
    pub fn new(before: &'a mut [Entity], after: &'a mut [Entity]) -> Self {
        Self { before, after }
    }

    /// Collection order, skipping the current entity
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.iter_mut().find(|e| e.id == id)
    }

    /// Asteroids in collection order
    pub fn asteroids(&self) -> impl Iterator<Item = (&Entity, &Asteroid)> {
        self.iter()
            .filter_map(|e| e.as_asteroid().map(|asteroid| (e, asteroid)))
    }
}

/// Shared services lent to entities for one tick
pub struct TickContext<'a> {
    /// Simulation clock (seconds)
    pub now: f64,
    pub rng: &'a mut Pcg32,
    pub emitters: &'a mut Emitters,
    pub settings: &'a Settings,
    pub events: &'a mut Vec<GameEvent>,
    next_id: &'a mut u32,
    spawned: Vec<Entity>,
    prompts: Vec<Prompt>,
    /// Set when the player has lost and the round must restart
    pub reset_requested: bool,
}

impl<'a> TickContext<'a> {
    pub fn new(
        now: f64,
        rng: &'a mut Pcg32,
        emitters: &'a mut Emitters,
        settings: &'a Settings,
        events: &'a mut Vec<GameEvent>,
        next_id: &'a mut u32,
    ) -> Self {
        Self {
            now,
            rng,
            emitters,
            settings,
            events,
            next_id,
            spawned: Vec::new(),
            prompts: Vec::new(),
            reset_requested: false,
        }
    }

    /// Allocate a new entity ID
    pub fn alloc_id(&mut self) -> EntityId {
        let id = *self.next_id;
        *self.next_id += 1;
        EntityId(id)
    }

    /// Stage an entity for insertion after the current think call
    pub fn spawn(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }

    pub fn take_spawned(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.spawned)
    }

    /// Queue a modal prompt; the tick opens it once thinking is done
    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompts.push(prompt);
    }

    pub fn take_prompts(&mut self) -> Vec<Prompt> {
        std::mem::take(&mut self.prompts)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
