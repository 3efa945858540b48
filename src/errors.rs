// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimdagError {
    /// The declared edges cannot be linearized. Carries the names of the
    /// animations that take part in a cycle.
    #[error("Circular dependencies cannot exist in an animation set (involving: {})", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Animation set '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Unknown node {0} for this animation set")]
    UnknownNode(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AnimdagError>;
