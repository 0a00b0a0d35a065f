//! Error types for everything around the simulation
//!
//! The simulation itself cannot fail once a match exists. Errors only arise
//! while setting up: invalid geometry, unreadable settings, bad input scripts.

use std::path::PathBuf;

use thiserror::Error;

/// Match geometry that would break the simulation's invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i32 },

    #[error("court origin ({x}, {y}) must not be negative")]
    NegativeOrigin { x: i32, y: i32 },

    #[error("court ({x}, {y}) {w}x{h} extends past the coordinate range")]
    CourtOutOfRange { x: i32, y: i32, w: i32, h: i32 },

    #[error("wall thickness {thickness} must be less than half the court height {court_height}")]
    WallTooThick { thickness: i32, court_height: i32 },

    #[error("paddle height {paddle_height} exceeds the open court height {open_height}")]
    PaddleTooTall {
        paddle_height: i32,
        open_height: i32,
    },

    #[error("ball size {ball_size} does not fit the open court height {open_height}")]
    BallTooLarge { ball_size: i32, open_height: i32 },

    #[error("court width {width} is too narrow, need at least {required}")]
    CourtTooNarrow { width: i32, required: i32 },

    #[error("first_to must be at least 1")]
    ZeroFirstTo,
}

/// Fatal failure before the match is constructed
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("input script line {line}: {reason}")]
    Script { line: usize, reason: String },

    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}
