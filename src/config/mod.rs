// src/config/mod.rs

//! Choreography files: TOML model, validation and loading.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{AnimationConfig, AnimationSpec, ConfigFile, RawConfigFile, Timeline};
pub use validate::parse_duration;
