//! Match state and core simulation types
//!
//! Everything the simulation mutates lives in [`Match`]. The court is built
//! once from a validated [`MatchConfig`] and never changes afterwards.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tick::reset_and_serve;
use crate::consts::*;
use crate::error::ConfigError;

/// One of the two players, named by the court edge they defend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of a horizontal velocity heading toward this side
    pub fn sign(self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Vertical paddle movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Opaque display color, packed as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
}

/// Construction-time match geometry and speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Court bounds (top-left corner and size)
    pub court: Rect,
    /// Thickness of the upper and lower walls
    pub wall_thickness: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    /// Pixels a paddle moves per tick
    pub paddle_step: i32,
    /// Ball width and height
    pub ball_size: i32,
    /// Horizontal speed of every serve
    pub serve_speed: i32,
    /// Side the opening serve travels toward
    pub initial_serve: Side,

    pub background_color: Color,
    pub wall_color: Color,
    pub paddle_color: Color,
    pub ball_color: Color,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            court: Rect::new(C_X, C_Y, C_WIDTH, C_HEIGHT),
            wall_thickness: WALL_THICKNESS,
            paddle_width: P_WIDTH,
            paddle_height: P_HEIGHT,
            paddle_step: P_STEP,
            ball_size: B_SIZE,
            serve_speed: B_VX,
            initial_serve: Side::Right,

            background_color: Color::WHITE,
            wall_color: Color::BLACK,
            paddle_color: Color::BLACK,
            ball_color: Color::BLACK,
        }
    }
}

impl MatchConfig {
    /// Check the geometry invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("court.w", self.court.w),
            ("court.h", self.court.h),
            ("wall_thickness", self.wall_thickness),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_step", self.paddle_step),
            ("ball_size", self.ball_size),
            ("serve_speed", self.serve_speed),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.court.x < 0 || self.court.y < 0 {
            return Err(ConfigError::NegativeOrigin {
                x: self.court.x,
                y: self.court.y,
            });
        }

        if self.court.x.checked_add(self.court.w).is_none()
            || self.court.y.checked_add(self.court.h).is_none()
        {
            return Err(ConfigError::CourtOutOfRange {
                x: self.court.x,
                y: self.court.y,
                w: self.court.w,
                h: self.court.h,
            });
        }

        // 2 * thickness >= h, written so it cannot overflow
        if self.wall_thickness >= self.court.h / 2 + self.court.h % 2 {
            return Err(ConfigError::WallTooThick {
                thickness: self.wall_thickness,
                court_height: self.court.h,
            });
        }

        let open_height = self.court.h - 2 * self.wall_thickness;
        if self.paddle_height > open_height {
            return Err(ConfigError::PaddleTooTall {
                paddle_height: self.paddle_height,
                open_height,
            });
        }
        if self.ball_size >= open_height {
            return Err(ConfigError::BallTooLarge {
                ball_size: self.ball_size,
                open_height,
            });
        }

        let required = self
            .paddle_width
            .checked_mul(2)
            .and_then(|w| w.checked_add(self.ball_size));
        match required {
            Some(required) if self.court.w > required => {}
            _ => {
                return Err(ConfigError::CourtTooNarrow {
                    width: self.court.w,
                    required: required.map_or(i32::MAX, |r| r.saturating_add(1)),
                });
            }
        }

        Ok(())
    }
}

/// Fixed playing-field geometry: bounds plus the two horizontal walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    bounds: Rect,
    upper_wall: Rect,
    lower_wall: Rect,
    color: Color,
}

impl Court {
    /// Build a court whose walls sit flush with its top and bottom edges
    pub fn new(bounds: Rect, wall_thickness: i32, color: Color) -> Self {
        Self {
            bounds,
            upper_wall: Rect::new(bounds.x, bounds.y, bounds.w, wall_thickness),
            lower_wall: Rect::new(
                bounds.x,
                bounds.bottom() - wall_thickness,
                bounds.w,
                wall_thickness,
            ),
            color,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn upper_wall(&self) -> Rect {
        self.upper_wall
    }

    pub fn lower_wall(&self) -> Rect {
        self.lower_wall
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Highest y a paddle's top edge may take
    #[inline]
    pub fn open_top(&self) -> i32 {
        self.upper_wall.bottom()
    }

    /// Lowest y a paddle's bottom edge may take
    #[inline]
    pub fn open_bottom(&self) -> i32 {
        self.lower_wall.top()
    }

    /// Top-left corner that centers a `size`-sized rect on the court
    pub fn centered(&self, size: IVec2) -> IVec2 {
        IVec2::new(
            self.bounds.x + self.bounds.w / 2 - size.x / 2,
            self.bounds.y + self.bounds.h / 2 - size.y / 2,
        )
    }
}

/// A player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// `rect.y` as of the start of the current tick (spin source)
    pub prev_y: i32,
    /// Pixels moved per tick
    pub step: i32,
    pub color: Color,
}

impl Paddle {
    /// Create a paddle at horizontal position `x`, centered vertically on the court
    pub fn new(court: &Court, x: i32, width: i32, height: i32, step: i32, color: Color) -> Self {
        let y = court.centered(IVec2::new(width, height)).y;
        Self {
            rect: Rect::new(x, y, width, height),
            prev_y: y,
            step,
            color,
        }
    }

    /// Remember the pre-motion position for this tick
    #[inline]
    pub fn capture_prev_y(&mut self) {
        self.prev_y = self.rect.y;
    }

    /// Vertical velocity imparted on contact: positive after moving up
    #[inline]
    pub fn spin(&self) -> i32 {
        self.prev_y - self.rect.y
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Size is fixed at construction
    pub rect: Rect,
    /// Pixels per tick
    pub vel: IVec2,
    pub color: Color,
}

impl Ball {
    pub fn new(size: i32, color: Color) -> Self {
        Self {
            rect: Rect::new(0, 0, size, size),
            vel: IVec2::ZERO,
            color,
        }
    }

    #[inline]
    pub fn vx(&self) -> i32 {
        self.vel.x
    }

    #[inline]
    pub fn vy(&self) -> i32 {
        self.vel.y
    }
}

/// A player controls a paddle and has a number of points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub paddle: Paddle,
    pub points: u32,
}

impl Player {
    pub fn new(paddle: Paddle) -> Self {
        Self { paddle, points: 0 }
    }
}

/// The whole match: court, both players and the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub(super) config: MatchConfig,
    pub(super) court: Court,
    pub left: Player,
    pub right: Player,
    pub ball: Ball,
    /// Completed ticks
    pub ticks: u64,
}

impl Default for Match {
    fn default() -> Self {
        Self::build(MatchConfig::default())
    }
}

impl Match {
    /// Validate `config` and set up a match with the opening serve in flight
    pub fn try_new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MatchConfig) -> Self {
        let court = Court::new(config.court, config.wall_thickness, config.wall_color);
        let bounds = court.bounds();

        let paddle = |x| {
            Paddle::new(
                &court,
                x,
                config.paddle_width,
                config.paddle_height,
                config.paddle_step,
                config.paddle_color,
            )
        };
        let left = Player::new(paddle(bounds.left()));
        let right = Player::new(paddle(bounds.right() - config.paddle_width));

        let mut ball = Ball::new(config.ball_size, config.ball_color);
        reset_and_serve(&court, &mut ball, config.initial_serve, config.serve_speed);

        log::info!(
            "Match set up on {}x{} court, opening serve toward {}",
            bounds.w,
            bounds.h,
            config.initial_serve.as_str()
        );

        Self {
            config,
            court,
            left,
            right,
            ball,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    /// Current score as (left, right)
    pub fn score(&self) -> (u32, u32) {
        (self.left.points, self.right.points)
    }
}
