//! Events raised while ticking
//!
//! Score events feed scoreboards and match policies; paddle and wall events
//! exist for sound effects.

use serde::{Deserialize, Serialize};

use super::collision::WallContact;
use super::state::Side;

/// A point was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub scoring_side: Side,
    /// Left player's points after this one was awarded
    pub left_points: u32,
    /// Right player's points after this one was awarded
    pub right_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    Score(ScoreEvent),
    /// The paddle on `side` returned the ball, adding `spin` to its vertical velocity
    PaddleHit { side: Side, spin: i32 },
    WallBounce { wall: WallContact },
}

impl MatchEvent {
    pub fn as_score(&self) -> Option<&ScoreEvent> {
        match self {
            MatchEvent::Score(score) => Some(score),
            _ => None,
        }
    }
}
