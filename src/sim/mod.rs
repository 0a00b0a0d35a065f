//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer positions and velocities only
//! - One fixed step per tick
//! - No rendering, timing or platform dependencies

pub mod collision;
pub mod event;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{PaddleContact, WallContact};
pub use event::{MatchEvent, ScoreEvent};
pub use rect::Rect;
pub use snapshot::{RenderState, Sprite};
pub use state::{Ball, Color, Court, Direction, Match, MatchConfig, Paddle, Player, Side};
pub use tick::{TickInput, TickOutput, move_ball, move_paddle, reset_and_serve};
