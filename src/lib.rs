//! Asteroids Survival - fly, shoot, split rocks, don't touch them
//!
//! Core modules:
//! - `sim`: Simulation (entities, kinematics, collisions, scoring, upgrades)
//! - `renderer`: Draw-list generation for whatever backend paints the frame
//! - `platform`: Collaborator ports (dialogs, toasts, score storage)
//! - `persistence`: Versioned JSON files on disk
//! - `session`: Frame driver wiring the simulation to the collaborators

pub mod persistence;
pub mod platform;
pub mod profile;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use profile::{FileScoreStore, MemoryScoreStore, Profile};
pub use session::Session;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate; the simulation advances one step per frame
    pub const TARGET_HZ: u32 = 60;
    pub const SIM_DT: f64 = 1.0 / TARGET_HZ as f64;

    /// Player ship defaults
    pub const PLAYER_SIZE: f32 = 10.0;
    pub const PLAYER_FRICTION: f32 = 0.999;
    pub const PLAYER_START_SCORE: f32 = 100.0;
    pub const PLAYER_ACCEL: f32 = 0.1;
    pub const PLAYER_ROTATION_STEP: f32 = 0.05;
    pub const PLAYER_RENDER_EXTENT: f32 = 20.0;
    /// Shot gating (ms)
    pub const SHOT_DELAY_MS: f32 = 200.0;
    /// Score deducted per shot
    pub const SHOT_COST: f32 = 1.0;
    pub const FUEL_COST: f32 = 1.0;

    /// Kills closer together than this keep the spree alive (ms)
    pub const SPREE_WINDOW_MS: f64 = 1000.0;
    pub const MAX_SCORE_MULTIPLIER: f32 = 10.0;
    /// Flat bonus for beating the all-time best score
    pub const BEST_SCORE_BONUS: f32 = 100.0;
    /// Minimum interval between rate-limited popups (ms)
    pub const POPUP_INTERVAL_MS: f64 = 5000.0;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 6.0;
    pub const BULLET_LIFESPAN_MS: f64 = 1500.0;

    /// Asteroid defaults
    pub const ASTEROID_SPAWN_SIZE: f32 = 32.0;
    /// Asteroids smaller than this after a hit are destroyed
    pub const ASTEROID_MIN_SIZE: f32 = 8.0;
    pub const ASTEROID_SPEED: f32 = 0.5;
    /// Spawn ring radius around the player (far off screen)
    pub const ASTEROID_SPAWN_DISTANCE: f32 = 4000.0;
    pub const ASTEROID_MAX_POPULATION: usize = 10;
    pub const ASTEROID_SPAWN_DELAY_MS: (u32, u32) = (500, 5000);

    /// Multiplier marker lifetime (ms)
    pub const MARKER_LIFESPAN_MS: f64 = 2000.0;

    /// Shop: an item is only affordable with this much score left over
    pub const SHOP_RESERVE: f32 = 100.0;
    pub const SHOP_UPGRADE_PRICE_GROWTH: f32 = 1.5;

    /// Game over notice ignores answers for this long (ms)
    pub const GAME_OVER_IGNORE_MS: f64 = 1000.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        // Whole turns are removed until the angle lands in [-π, π)
        assert!((normalize_angle(3.0 * PI + 0.5) - (0.5 - PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let v = polar_to_cartesian(5.0, PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 5.0).abs() < 1e-5);
        let v = polar_to_cartesian(2.0, PI);
        assert!((v.x + 2.0).abs() < 1e-5);
    }
}
