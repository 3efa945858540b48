// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a choreography file without semantic validation.
///
/// Use [`load_and_validate`] to also check references, cycles and durations.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(
        path = %path.display(),
        animations = config.animation.len(),
        "parsed choreography file"
    );

    Ok(config)
}

/// Load a choreography file and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde`).
/// - Checks for:
///   - unknown or self `after` / `with` references,
///   - dependency cycles,
///   - malformed durations and repeat counts,
///   - targets on pauses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Choreography.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Choreography.toml")
}
