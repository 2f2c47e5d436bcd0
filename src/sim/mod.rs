//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock advanced only by `tick`
//! - Seeded RNG only
//! - Stable iteration order (entity collection order)
//! - No rendering or platform dependencies

pub mod asteroid;
pub mod body;
pub mod bullet;
pub mod collision;
pub mod entity;
pub mod marker;
pub mod modifiers;
pub mod particles;
pub mod player;
pub mod shop;
pub mod spawner;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidFactory, shatter};
pub use body::{Body, Bounds, ClipMode, ClipRegion, Viewport};
pub use bullet::Bullet;
pub use collision::{circles_overlap, first_asteroid_hit, touches_any_asteroid};
pub use entity::{Entity, EntityId, EntityKind, Others, TickContext};
pub use marker::MultiplierMarker;
pub use modifiers::{Evasion, Modifier};
pub use particles::{EmitterConfig, EmitterId, Emitters, Particle, ParticleEmitter};
pub use player::{Controls, Loadout, Player};
pub use shop::{PurchaseOutcome, Shop, ShopItem};
pub use spawner::{EntityFactory, Spawner};
pub use state::{GameEvent, GamePhase, GameState, Prompt, PromptAction, PromptKind};
pub use tick::{InputEvent, Key, tick};
