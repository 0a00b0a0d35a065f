//! Spong - a two-player paddle-and-ball court
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle motion, collisions, scoring, serve)
//! - `policy`: Optional match policies layered over the score stream
//! - `input`: Keyboard bindings, held-key tracking, scripted input
//! - `driver`: Fixed-rate loop wiring input, simulation and rendering
//! - `settings`: Driver settings loaded from JSON

pub mod driver;
pub mod error;
pub mod input;
pub mod policy;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, InitError};
pub use settings::Settings;

/// Reference build constants
pub mod consts {
    use std::time::Duration;

    /// Window dimensions
    pub const W_WIDTH: i32 = 800;
    pub const W_HEIGHT: i32 = 480;

    /// Court geometry (top-left corner and size)
    pub const C_X: i32 = 0;
    pub const C_Y: i32 = 0;
    pub const C_WIDTH: i32 = 800;
    pub const C_HEIGHT: i32 = 480;
    /// Thickness of the upper and lower walls
    pub const WALL_THICKNESS: i32 = 30;

    /// Paddle defaults
    pub const P_WIDTH: i32 = 20;
    pub const P_HEIGHT: i32 = 60;
    /// Pixels a paddle moves in one tick
    pub const P_STEP: i32 = 10;

    /// Ball width and height
    pub const B_SIZE: i32 = 20;
    /// Horizontal serve speed (pixels per tick)
    pub const B_VX: i32 = 10;

    /// Fixed simulation rate
    pub const FPS: u32 = 30;
    /// Duration of one frame in whole milliseconds
    pub const FRAME_DURATION_MS: u64 = 1000 / FPS as u64;
    pub const FRAME_DURATION: Duration = Duration::from_millis(FRAME_DURATION_MS);
}
