//! Match policies layered over the score stream
//!
//! The simulation has no victory condition. A driver that wants one wraps
//! the score events in a policy such as [`FirstTo`].

use serde::{Deserialize, Serialize};

use crate::sim::{ScoreEvent, Side};

/// "First to N points wins"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstTo {
    pub points: u32,
}

impl FirstTo {
    pub fn new(points: u32) -> Self {
        Self { points }
    }

    /// Winner for a (left, right) score, if any; `points` must be at least 1
    pub fn winner(&self, score: (u32, u32)) -> Option<Side> {
        let (left, right) = score;
        if left >= self.points {
            Some(Side::Left)
        } else if right >= self.points {
            Some(Side::Right)
        } else {
            None
        }
    }

}

/// Running tally built purely from score events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub left: u32,
    pub right: u32,
    /// Scoring side of every point, oldest first
    pub history: Vec<Side>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &ScoreEvent) {
        match event.scoring_side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
        self.history.push(event.scoring_side);
    }

    pub fn score(&self) -> (u32, u32) {
        (self.left, self.right)
    }

    pub fn leader(&self) -> Option<Side> {
        match self.left.cmp(&self.right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Longest run of consecutive points by one side
    pub fn longest_run(&self) -> Option<(Side, usize)> {
        let mut best: Option<(Side, usize)> = None;
        let mut current: Option<(Side, usize)> = None;
        for &side in &self.history {
            current = match current {
                Some((s, n)) if s == side => Some((s, n + 1)),
                _ => Some((side, 1)),
            };
            if let Some((s, n)) = current {
                if best.is_none_or(|(_, b)| n > b) {
                    best = Some((s, n));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(side: Side, left: u32, right: u32) -> ScoreEvent {
        ScoreEvent {
            scoring_side: side,
            left_points: left,
            right_points: right,
        }
    }

    #[test]
    fn test_first_to_winner() {
        let policy = FirstTo::new(3);
        assert_eq!(policy.winner((0, 0)), None);
        assert_eq!(policy.winner((2, 2)), None);
        assert_eq!(policy.winner((3, 1)), Some(Side::Left));
        assert_eq!(policy.winner((1, 3)), Some(Side::Right));
    }

    #[test]
    fn test_scoreboard_tally() {
        let mut board = Scoreboard::new();
        assert_eq!(board.leader(), None);
        board.record(&point(Side::Left, 1, 0));
        board.record(&point(Side::Right, 1, 1));
        board.record(&point(Side::Right, 1, 2));
        board.record(&point(Side::Right, 1, 3));
        assert_eq!(board.score(), (1, 3));
        assert_eq!(board.leader(), Some(Side::Right));
        assert_eq!(board.longest_run(), Some((Side::Right, 3)));
    }

    #[test]
    fn test_longest_run_empty() {
        assert_eq!(Scoreboard::new().longest_run(), None);
    }
}
