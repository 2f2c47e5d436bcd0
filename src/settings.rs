//! Display settings and preferences
//!
//! Persisted as a JSON file next to the profile. A missing or unreadable file
//! yields defaults, which are written back so the player can edit them.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::sim::Viewport;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Particle cap multiplier (1.0 = full)
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,

    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (exhaust, sparks, debris)
    pub particles: bool,

    // === HUD ===
    /// Show the entity counter
    pub show_entity_count: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fullscreen: false,
            quality: QualityPreset::High,
            particles: true,
            show_entity_count: true,
        }
    }
}

impl Settings {
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whole screen as a culling rectangle
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }

    /// Effective particle cap multiplier
    pub fn particle_scale(&self) -> f32 {
        if self.particles {
            self.quality.particle_scale()
        } else {
            0.0
        }
    }

    /// Load settings, writing defaults back when the file is missing or broken
    pub fn load(path: &Path) -> Self {
        match persistence::load::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({})", err);
                let settings = Self::default();
                settings.save(path);
                settings
            }
        }
    }

    pub fn save(&self, path: &Path) {
        match persistence::save(path, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(err) => log::warn!("Could not save settings: {}", err),
        }
    }
}
