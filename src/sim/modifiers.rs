//! Ship upgrades
//!
//! A modifier either tunes the [`Loadout`] once when installed, adds a per-tick
//! behaviour, or only changes what is drawn. Upgrading yields the next tier,
//! which the player installs in place of the old one.

use super::body::Body;
use super::entity::Others;
use super::player::Loadout;
use super::tick::InputEvent;

/// Repulsion tuning for [`Modifier::AutoEvasion`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evasion {
    /// Asteroids closer than this push the ship away
    pub panic_radius: f32,
    pub force: f32,
}

impl Default for Evasion {
    fn default() -> Self {
        Self {
            panic_radius: 200.0,
            force: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    /// Cheaper thrust
    EfficientEngine,
    /// Holding fire keeps shooting
    AutomaticGun,
    /// Shorter shot delay
    RapidFire,
    LargerBullets,
    /// Straight aiming line
    LaserSight,
    /// Dotted line along the actual bullet path
    PredictiveLaserSight,
    /// Pushes the ship away from nearby asteroids, paid for in score
    AutoEvasion(Evasion),
}

impl Modifier {
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::EfficientEngine => "Efficient Engine",
            Modifier::AutomaticGun => "Automatic Gun",
            Modifier::RapidFire => "Rapid Fire",
            Modifier::LargerBullets => "Bigger Bullets",
            Modifier::LaserSight => "Laser Sight",
            Modifier::PredictiveLaserSight => "Predictive Laser Sight",
            Modifier::AutoEvasion(_) => "Auto Evasion",
        }
    }

    /// One-time effect when installed (or re-installed after an upgrade)
    pub fn initialize(&self, loadout: &mut Loadout) {
        match self {
            Modifier::EfficientEngine => loadout.fuel_cost /= 1.1,
            Modifier::AutomaticGun => loadout.automatic_fire = true,
            Modifier::RapidFire => {
                loadout.shot_delay_ms = (loadout.shot_delay_ms - 100.0).max(0.0);
            }
            Modifier::LargerBullets => loadout.bullet_size += 1.0,
            Modifier::LaserSight | Modifier::PredictiveLaserSight | Modifier::AutoEvasion(_) => {}
        }
    }

    /// Per-tick behaviour, run before the ship fires and moves
    pub fn per_tick(&self, body: &mut Body, score: &mut f32, others: &Others<'_>) {
        let Modifier::AutoEvasion(evasion) = self else {
            return;
        };
        for (entity, _) in others.asteroids() {
            let away = body.pos - entity.body.pos;
            let distance = away.length();
            if distance <= 0.0 || distance >= evasion.panic_radius {
                continue;
            }
            let push = evasion.force / (distance * distance);
            body.vel += away / distance * push;
            *score -= push;
        }
    }

    /// No variant reacts to raw input yet
    pub fn notify(&self, _event: &InputEvent) {}

    /// Next tier; repeatable upgrades return themselves
    pub fn upgrade(&self) -> Modifier {
        match self {
            Modifier::LaserSight => Modifier::PredictiveLaserSight,
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::asteroid::{Asteroid, AsteroidFactory};
    use crate::sim::entity::{Entity, EntityId};
    use crate::sim::particles::Emitters;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rocks(positions: &[Vec2]) -> Vec<Entity> {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut emitters = Emitters::default();
        let emitter = emitters.insert(AsteroidFactory::debris_emitter(0.0, 1.0, &mut rng));
        positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| Asteroid::spawn(EntityId(i as u32 + 10), pos, 32.0, 0.0, emitter, None))
            .collect()
    }

    #[test]
    fn test_initialize_tunes_loadout() {
        let mut loadout = Loadout::default();
        Modifier::EfficientEngine.initialize(&mut loadout);
        Modifier::EfficientEngine.initialize(&mut loadout);
        assert!((loadout.fuel_cost - FUEL_COST / 1.21).abs() < 1e-6);

        Modifier::LargerBullets.initialize(&mut loadout);
        assert_eq!(loadout.bullet_size, BULLET_SIZE + 1.0);

        Modifier::AutomaticGun.initialize(&mut loadout);
        assert!(loadout.automatic_fire);
    }

    #[test]
    fn test_rapid_fire_never_goes_negative() {
        let mut loadout = Loadout::default();
        for _ in 0..5 {
            Modifier::RapidFire.initialize(&mut loadout);
        }
        assert_eq!(loadout.shot_delay_ms, 0.0);
    }

    #[test]
    fn test_upgrade_chain() {
        assert_eq!(Modifier::LaserSight.upgrade(), Modifier::PredictiveLaserSight);
        assert_eq!(Modifier::PredictiveLaserSight.upgrade(), Modifier::PredictiveLaserSight);
        assert_eq!(Modifier::RapidFire.upgrade(), Modifier::RapidFire);
    }

    #[test]
    fn test_auto_evasion_pushes_away_and_charges_score() {
        let mut world = rocks(&[Vec2::new(110.0, 100.0), Vec2::new(900.0, 100.0)]);
        let (before, after) = world.split_at_mut(0);
        let others = Others::new(before, after);
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut score = 100.0;

        Modifier::AutoEvasion(Evasion::default()).per_tick(&mut body, &mut score, &others);
        // 50 / 10^2, only the near rock counts
        assert!((body.vel.x + 0.5).abs() < 1e-6);
        assert!(body.vel.y.abs() < 1e-6);
        assert!((score - 99.5).abs() < 1e-5);
    }

    #[test]
    fn test_passive_modifiers_do_nothing_per_tick() {
        let mut world = rocks(&[Vec2::new(110.0, 100.0)]);
        let (before, after) = world.split_at_mut(0);
        let others = Others::new(before, after);
        let mut body = Body::new(Vec2::new(100.0, 100.0));
        let mut score = 100.0;
        Modifier::LaserSight.per_tick(&mut body, &mut score, &others);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(score, 100.0);
    }
}
