//! Crate-wide error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Map generation did not converge after {attempts} attempts (tolerances too tight for a {width}x{height} grid)")]
    MapGeneration {
        attempts: u32,
        width: i32,
        height: i32,
    },

    #[error("Could not place {side} unit on a free cell after {attempts} attempts")]
    SpawnFailed { side: &'static str, attempts: u32 },

    #[error("Turn state corrupted: {0}")]
    StateCorruption(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
