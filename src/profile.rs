//! Player profile: all-time best score and first-run tutorial flag

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::platform::ScoreStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Best round total ever reached
    pub best_score: f32,
    pub tutorial_done: bool,
}

/// Profile stored as a JSON file; every change is written through
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    profile: Profile,
}

impl FileScoreStore {
    /// Open the profile at `path`, starting fresh when it is missing or broken
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let profile = match persistence::load::<Profile>(&path) {
            Ok(profile) => {
                log::info!("Loaded profile (best score {:.1})", profile.best_score);
                profile
            }
            Err(err) => {
                log::warn!("No usable profile at {} ({}), starting fresh", path.display(), err);
                Profile::default()
            }
        };
        Self { path, profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    fn write(&self) {
        if let Err(err) = persistence::save(&self.path, &self.profile) {
            log::warn!("Could not save profile: {}", err);
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn load_best_score(&self) -> f32 {
        self.profile.best_score
    }

    fn save_best_score(&mut self, score: f32) {
        self.profile.best_score = score;
        self.write();
        log::info!("New best score saved: {:.1}", score);
    }

    fn is_tutorial_done(&self) -> bool {
        self.profile.tutorial_done
    }

    fn mark_tutorial_done(&mut self) {
        self.profile.tutorial_done = true;
        self.write();
    }
}

/// In-memory profile for tests and throwaway runs
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub profile: Profile,
    /// Number of times the best score was saved
    pub saves: usize,
}

impl ScoreStore for MemoryScoreStore {
    fn load_best_score(&self) -> f32 {
        self.profile.best_score
    }

    fn save_best_score(&mut self, score: f32) {
        self.profile.best_score = score;
        self.saves += 1;
    }

    fn is_tutorial_done(&self) -> bool {
        self.profile.tutorial_done
    }

    fn mark_tutorial_done(&mut self) {
        self.profile.tutorial_done = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");

        let mut store = FileScoreStore::open(&path);
        assert_eq!(store.profile(), &Profile::default());
        store.save_best_score(512.5);
        store.mark_tutorial_done();

        let reopened = FileScoreStore::open(&path);
        assert_eq!(reopened.load_best_score(), 512.5);
        assert!(reopened.is_tutorial_done());
    }

    #[test]
    fn test_corrupt_profile_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{").unwrap();
        let store = FileScoreStore::open(&path);
        assert_eq!(store.load_best_score(), 0.0);
        assert!(!store.is_tutorial_done());
    }
}
