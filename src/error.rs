//! Error types for the intruder crate

use thiserror::Error;

/// Main error type for the intruder crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    PositionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied { x: usize, y: usize },

    #[error("unknown agent id {id}")]
    UnknownAgent { id: usize },

    #[error("the world has no intruder")]
    MissingIntruder,

    #[error("an intruder has already been placed at ({x}, {y})")]
    IntruderAlreadyPlaced { x: usize, y: usize },

    #[error("invalid state key '{key}': {reason}")]
    InvalidStateKey { key: String, reason: String },

    #[error("invalid action value {value} (expected -1, 0 or 1)")]
    InvalidAction { value: i64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid cadence '{input}'. Expected one of: {expected}")]
    ParseCadence { input: String, expected: String },

    #[error("invalid motion mode '{input}'. Expected one of: {expected}")]
    ParseMotionMode { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("{resource} lock poisoned")]
    LockPoisoned { resource: &'static str },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
