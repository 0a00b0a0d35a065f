//! Collision detection for the ball against walls and paddle faces
//!
//! Detection only: these functions never mutate. The tick decides what a
//! contact means (bounce, point, serve).

use serde::{Deserialize, Serialize};

use super::state::{Ball, Court, Paddle, Side};

/// Which wall the ball is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallContact {
    Upper,
    Lower,
}

/// Outcome of the ball reaching a paddle's face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    /// Vertical spans overlap: the paddle returns the ball
    Hit,
    /// The ball got past the paddle
    Miss,
}

/// Check whether the ball is at or inside either wall band
///
/// The upper wall wins if the ball somehow touches both.
pub fn wall_contact(court: &Court, ball: &Ball) -> Option<WallContact> {
    if ball.rect.top() <= court.upper_wall().bottom() {
        Some(WallContact::Upper)
    } else if ball.rect.bottom() >= court.lower_wall().top() {
        Some(WallContact::Lower)
    } else {
        None
    }
}

/// Vertical velocity after touching `wall`, always pointing back into the court
#[inline]
pub fn reflect_off_wall(vy: i32, wall: WallContact) -> i32 {
    match wall {
        WallContact::Upper => vy.abs(),
        WallContact::Lower => -vy.abs(),
    }
}

/// Check the ball against the face of the paddle defending `side`
///
/// Returns `None` unless the ball is moving toward that paddle and has
/// reached (or passed) the plane of its inner face.
pub fn paddle_contact(ball: &Ball, paddle: &Paddle, side: Side) -> Option<PaddleContact> {
    let reached = match side {
        Side::Left => ball.rect.left() <= paddle.rect.right() && ball.vx() < 0,
        Side::Right => ball.rect.right() >= paddle.rect.left() && ball.vx() > 0,
    };

    if !reached {
        None
    } else if ball.rect.overlaps_vertically(&paddle.rect) {
        Some(PaddleContact::Hit)
    } else {
        Some(PaddleContact::Miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Color, Rect};
    use glam::IVec2;

    fn court() -> Court {
        Court::new(Rect::new(0, 0, 800, 480), 30, Color::BLACK)
    }

    fn ball_at(x: i32, y: i32, vel: IVec2) -> Ball {
        let mut ball = Ball::new(20, Color::BLACK);
        ball.rect.set_pos(IVec2::new(x, y));
        ball.vel = vel;
        ball
    }

    fn paddle_at(x: i32, y: i32) -> Paddle {
        Paddle {
            rect: Rect::new(x, y, 20, 60),
            prev_y: y,
            step: 10,
            color: Color::BLACK,
        }
    }

    #[test]
    fn test_wall_contact_bands() {
        let court = court();
        assert_eq!(wall_contact(&court, &ball_at(100, 30, IVec2::ZERO)), Some(WallContact::Upper));
        assert_eq!(wall_contact(&court, &ball_at(100, 10, IVec2::ZERO)), Some(WallContact::Upper));
        assert_eq!(wall_contact(&court, &ball_at(100, 31, IVec2::ZERO)), None);
        assert_eq!(wall_contact(&court, &ball_at(100, 429, IVec2::ZERO)), None);
        assert_eq!(wall_contact(&court, &ball_at(100, 430, IVec2::ZERO)), Some(WallContact::Lower));
    }

    #[test]
    fn test_reflect_off_wall() {
        assert_eq!(reflect_off_wall(-7, WallContact::Upper), 7);
        assert_eq!(reflect_off_wall(7, WallContact::Lower), -7);
        // Already heading away: keep going away
        assert_eq!(reflect_off_wall(4, WallContact::Upper), 4);
        assert_eq!(reflect_off_wall(-4, WallContact::Lower), -4);
    }

    #[test]
    fn test_left_paddle_hit_and_miss() {
        let paddle = paddle_at(0, 210);
        let hit = ball_at(20, 230, IVec2::new(-10, 0));
        assert_eq!(paddle_contact(&hit, &paddle, Side::Left), Some(PaddleContact::Hit));

        let miss = ball_at(15, 300, IVec2::new(-10, 0));
        assert_eq!(paddle_contact(&miss, &paddle, Side::Left), Some(PaddleContact::Miss));

        // Not yet at the face
        let early = ball_at(21, 230, IVec2::new(-10, 0));
        assert_eq!(paddle_contact(&early, &paddle, Side::Left), None);
    }

    #[test]
    fn test_paddle_ignores_receding_ball() {
        let left = paddle_at(0, 210);
        let right = paddle_at(780, 210);
        let leaving_left = ball_at(10, 230, IVec2::new(10, 0));
        let leaving_right = ball_at(770, 230, IVec2::new(-10, 0));
        assert_eq!(paddle_contact(&leaving_left, &left, Side::Left), None);
        assert_eq!(paddle_contact(&leaving_right, &right, Side::Right), None);
    }

    #[test]
    fn test_right_paddle_face() {
        let paddle = paddle_at(780, 210);
        let touching = ball_at(760, 250, IVec2::new(10, 0));
        assert_eq!(paddle_contact(&touching, &paddle, Side::Right), Some(PaddleContact::Hit));

        let above = ball_at(760, 100, IVec2::new(10, 0));
        assert_eq!(paddle_contact(&above, &paddle, Side::Right), Some(PaddleContact::Miss));

        let short = ball_at(759, 250, IVec2::new(10, 0));
        assert_eq!(paddle_contact(&short, &paddle, Side::Right), None);
    }
}
