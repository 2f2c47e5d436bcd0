//! Versioned JSON files on disk
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the old file)
//! - Typed errors; callers decide whether to fall back to defaults

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current envelope format version
pub const FORMAT_VERSION: u32 = 1;

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistError>;

/// On-disk wrapper around a payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

/// Read and unwrap a payload written by [`save`]
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    let envelope: Envelope<T> = serde_json::from_str(&text)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(envelope.payload)
}

/// Wrap and write a payload, replacing any previous file atomically
pub fn save<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let envelope = Envelope {
        version: FORMAT_VERSION,
        payload,
    };
    let json = serde_json::to_string_pretty(&envelope)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::debug!("saved {}", path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
