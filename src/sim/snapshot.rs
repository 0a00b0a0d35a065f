//! Render snapshot handed to whatever draws the court

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Color, Match};

/// A filled rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub rect: Rect,
    pub color: Color,
}

impl Sprite {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }
}

/// Everything a renderer needs for one frame
///
/// Renderers clear the background themselves; no dirty-rect tracking is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    pub tick: u64,
    pub background: Color,
    pub upper_wall: Sprite,
    pub lower_wall: Sprite,
    pub left_paddle: Sprite,
    pub right_paddle: Sprite,
    pub ball: Sprite,
    pub left_score: u32,
    pub right_score: u32,
}

impl RenderState {
    /// Sprites in draw order
    pub fn sprites(&self) -> [Sprite; 5] {
        [
            self.upper_wall,
            self.lower_wall,
            self.left_paddle,
            self.right_paddle,
            self.ball,
        ]
    }
}

impl Match {
    /// Capture the current state for rendering
    pub fn snapshot(&self) -> RenderState {
        let court = self.court();
        RenderState {
            tick: self.ticks,
            background: self.config().background_color,
            upper_wall: Sprite::new(court.upper_wall(), court.color()),
            lower_wall: Sprite::new(court.lower_wall(), court.color()),
            left_paddle: Sprite::new(self.left.paddle.rect, self.left.paddle.color),
            right_paddle: Sprite::new(self.right.paddle.rect, self.right.paddle.color),
            ball: Sprite::new(self.ball.rect, self.ball.color),
            left_score: self.left.points,
            right_score: self.right.points,
        }
    }
}
