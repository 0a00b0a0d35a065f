//! Fixed timestep simulation tick
//!
//! Per tick: remember paddle positions, move paddles, resolve the ball
//! against the paddles (bounce or point), then the walls, then advance it.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{PaddleContact, paddle_contact, reflect_off_wall, wall_contact};
use super::event::{MatchEvent, ScoreEvent};
use super::snapshot::RenderState;
use super::state::{Ball, Court, Direction, Match, Paddle, Player, Side};

/// Movement intents and the quit signal for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left_up: bool,
    pub left_down: bool,
    pub right_up: bool,
    pub right_down: bool,
    /// Stop after this tick
    pub quit: bool,
}

impl TickInput {
    /// Resolved movement for one paddle; up wins over down
    pub fn intent(&self, side: Side) -> Option<Direction> {
        let (up, down) = match side {
            Side::Left => (self.left_up, self.left_down),
            Side::Right => (self.right_up, self.right_down),
        };
        if up {
            Some(Direction::Up)
        } else if down {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Result of advancing the match
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub render: RenderState,
    pub events: Vec<MatchEvent>,
    /// False once a quit intent has been seen
    pub running: bool,
}

impl TickOutput {
    pub fn score_events(&self) -> impl Iterator<Item = &ScoreEvent> {
        self.events.iter().filter_map(MatchEvent::as_score)
    }
}

/// Move a paddle one step, stopping flush against the wall it runs into
pub fn move_paddle(court: &Court, paddle: &mut Paddle, direction: Direction) {
    let step = paddle.step;
    match direction {
        Direction::Up => {
            let top = court.open_top();
            if paddle.rect.top() - step > top {
                paddle.rect.y -= step;
            } else {
                paddle.rect.y = top;
            }
        }
        Direction::Down => {
            let bottom = court.open_bottom();
            if paddle.rect.bottom() + step < bottom {
                paddle.rect.y += step;
            } else {
                paddle.rect.y = bottom - paddle.rect.h;
            }
        }
    }
}

/// Center the ball on the court and send it toward `toward` with no vertical speed
pub fn reset_and_serve(court: &Court, ball: &mut Ball, toward: Side, speed: i32) {
    ball.rect.set_pos(court.centered(ball.rect.size()));
    ball.vel = IVec2::new(speed * toward.sign(), 0);
}

/// Resolve paddle and wall contacts for this tick, then advance the ball
///
/// A missed ball awards the point to the opponent and is re-served toward the
/// player who missed. The serve ends the ball's update for that tick, so the
/// ball starts the next tick exactly at center.
pub fn move_ball(
    court: &Court,
    ball: &mut Ball,
    left: &mut Player,
    right: &mut Player,
    serve_speed: i32,
    events: &mut Vec<MatchEvent>,
) {
    let contact = paddle_contact(ball, &left.paddle, Side::Left)
        .map(|c| (Side::Left, c))
        .or_else(|| paddle_contact(ball, &right.paddle, Side::Right).map(|c| (Side::Right, c)));

    if let Some((side, contact)) = contact {
        match contact {
            PaddleContact::Hit => {
                let paddle = match side {
                    Side::Left => &left.paddle,
                    Side::Right => &right.paddle,
                };
                let spin = paddle.spin();
                ball.vel.x = -ball.vel.x;
                ball.vel.y += spin;
                log::debug!("{} paddle hit, spin {}", side.as_str(), spin);
                events.push(MatchEvent::PaddleHit { side, spin });
            }
            PaddleContact::Miss => {
                let scorer = side.opponent();
                match scorer {
                    Side::Left => left.points += 1,
                    Side::Right => right.points += 1,
                }
                reset_and_serve(court, ball, side, serve_speed);
                log::debug!(
                    "{} scores ({} - {}), serving toward {}",
                    scorer.as_str(),
                    left.points,
                    right.points,
                    side.as_str()
                );
                events.push(MatchEvent::Score(ScoreEvent {
                    scoring_side: scorer,
                    left_points: left.points,
                    right_points: right.points,
                }));
                return;
            }
        }
    }

    if let Some(wall) = wall_contact(court, ball) {
        let vy = reflect_off_wall(ball.vy(), wall);
        if vy != ball.vy() {
            ball.vel.y = vy;
            events.push(MatchEvent::WallBounce { wall });
        }
    }

    ball.rect.translate(ball.vel);
}

impl Match {
    /// Advance the match by one fixed timestep
    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        let mut events = Vec::new();
        self.step(input, &mut events);
        TickOutput {
            render: self.snapshot(),
            events,
            running: !input.quit,
        }
    }

    /// Advance by `dt_ticks` steps with the same input, collecting every event
    pub fn advance(&mut self, input: &TickInput, dt_ticks: u32) -> TickOutput {
        let mut events = Vec::new();
        for _ in 0..dt_ticks {
            self.step(input, &mut events);
        }
        TickOutput {
            render: self.snapshot(),
            events,
            running: !input.quit,
        }
    }

    fn step(&mut self, input: &TickInput, events: &mut Vec<MatchEvent>) {
        self.left.paddle.capture_prev_y();
        self.right.paddle.capture_prev_y();

        if let Some(direction) = input.intent(Side::Left) {
            move_paddle(&self.court, &mut self.left.paddle, direction);
        }
        if let Some(direction) = input.intent(Side::Right) {
            move_paddle(&self.court, &mut self.right.paddle, direction);
        }

        move_ball(
            &self.court,
            &mut self.ball,
            &mut self.left,
            &mut self.right,
            self.config.serve_speed,
            events,
        );

        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::Rect;
    use crate::sim::collision::WallContact;
    use proptest::prelude::*;

    fn place_ball(m: &mut Match, x: i32, y: i32, vx: i32, vy: i32) {
        m.ball.rect.set_pos(IVec2::new(x, y));
        m.ball.vel = IVec2::new(vx, vy);
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_paddle_up_snaps_to_wall() {
        let m = Match::default();
        let mut paddle = m.left.paddle.clone();
        paddle.rect.y = 35;
        move_paddle(m.court(), &mut paddle, Direction::Up);
        assert_eq!(paddle.rect.y, 30);

        paddle.rect.y = 41;
        move_paddle(m.court(), &mut paddle, Direction::Up);
        assert_eq!(paddle.rect.y, 31);
    }

    #[test]
    fn test_paddle_down_snaps_to_wall() {
        let m = Match::default();
        let mut paddle = m.right.paddle.clone();
        paddle.rect.y = 385;
        move_paddle(m.court(), &mut paddle, Direction::Down);
        assert_eq!(paddle.rect.bottom(), 450);
        assert_eq!(paddle.rect.y, 390);

        paddle.rect.y = 379;
        move_paddle(m.court(), &mut paddle, Direction::Down);
        assert_eq!(paddle.rect.y, 389);
    }

    #[test]
    fn test_up_wins_over_down() {
        let input = TickInput {
            left_up: true,
            left_down: true,
            right_down: true,
            ..Default::default()
        };
        assert_eq!(input.intent(Side::Left), Some(Direction::Up));
        assert_eq!(input.intent(Side::Right), Some(Direction::Down));
        assert_eq!(idle().intent(Side::Left), None);

        let mut m = Match::default();
        m.tick(&input);
        assert_eq!(m.left.paddle.rect.y, 200);
        assert_eq!(m.right.paddle.rect.y, 220);
    }

    #[test]
    fn test_prev_y_captured_before_motion() {
        let mut m = Match::default();
        let up = TickInput {
            left_up: true,
            ..Default::default()
        };
        m.tick(&up);
        assert_eq!(m.left.paddle.prev_y, 210);
        assert_eq!(m.left.paddle.rect.y, 200);
        assert_eq!(m.left.paddle.spin(), 10);

        m.tick(&idle());
        assert_eq!(m.left.paddle.prev_y, 200);
        assert_eq!(m.left.paddle.spin(), 0);
    }

    #[test]
    fn test_wall_bounce_upper() {
        let mut m = Match::default();
        place_ball(&mut m, 300, 35, 0, -7);

        // Not yet touching: 35 > 30
        m.tick(&idle());
        assert_eq!(m.ball.rect.y, 28);
        assert_eq!(m.ball.vy(), -7);

        // Contact: vy flips and the ball leaves the band in the same tick
        let out = m.tick(&idle());
        assert_eq!(m.ball.vy(), 7);
        assert_eq!(m.ball.rect.y, 35);
        assert_eq!(
            out.events,
            vec![MatchEvent::WallBounce {
                wall: WallContact::Upper
            }]
        );

        for _ in 0..10 {
            let out = m.tick(&idle());
            assert!(out.events.is_empty());
            assert_eq!(m.ball.vy(), 7);
        }
    }

    #[test]
    fn test_wall_bounce_lower() {
        let mut m = Match::default();
        place_ball(&mut m, 300, 428, 0, 5);
        m.tick(&idle());
        assert_eq!(m.ball.rect.y, 433);
        m.tick(&idle());
        assert_eq!(m.ball.vy(), -5);
        assert_eq!(m.ball.rect.y, 428);
    }

    #[test]
    fn test_no_oscillation_inside_wall_band() {
        let mut m = Match::default();
        // Ball deep in the upper band but already heading down
        place_ball(&mut m, 300, 20, 0, 3);
        m.tick(&idle());
        assert_eq!(m.ball.vy(), 3);
        assert_eq!(m.ball.rect.y, 23);
        m.tick(&idle());
        assert_eq!(m.ball.rect.y, 26);
    }

    #[test]
    fn test_paddle_bounce_without_spin() {
        let mut m = Match::default();
        place_ball(&mut m, 20, 230, -10, 3);
        let out = m.tick(&idle());

        assert_eq!(m.ball.vel, IVec2::new(10, 3));
        assert_eq!(m.ball.rect.pos(), IVec2::new(30, 233));
        assert_eq!(
            out.events,
            vec![MatchEvent::PaddleHit {
                side: Side::Left,
                spin: 0
            }]
        );
        assert_eq!(m.score(), (0, 0));
    }

    #[test]
    fn test_paddle_spin_follows_motion() {
        // Left paddle moves up 10 this tick
        let mut m = Match::default();
        place_ball(&mut m, 20, 230, -10, 0);
        m.tick(&TickInput {
            left_up: true,
            ..Default::default()
        });
        assert_eq!(m.ball.vel, IVec2::new(10, 10));

        // Right paddle moves down 10 this tick
        let mut m = Match::default();
        place_ball(&mut m, 760, 230, 10, 2);
        m.tick(&TickInput {
            right_down: true,
            ..Default::default()
        });
        assert_eq!(m.ball.vel, IVec2::new(-10, -8));
    }

    #[test]
    fn test_spin_snapped_against_wall() {
        // Paddle one pixel under the wall only moves one pixel
        let mut m = Match::default();
        m.left.paddle.rect.y = 31;
        place_ball(&mut m, 20, 40, -10, 0);
        m.tick(&TickInput {
            left_up: true,
            ..Default::default()
        });
        assert_eq!(m.left.paddle.rect.y, 30);
        assert_eq!(m.ball.vy(), 1);
    }

    #[test]
    fn test_right_scores_and_serves_left() {
        let mut m = Match::default();
        place_ball(&mut m, 20, 350, -10, 4);
        let out = m.tick(&idle());

        assert_eq!(m.score(), (0, 1));
        assert_eq!(m.ball.rect, Rect::new(390, 230, B_SIZE, B_SIZE));
        assert_eq!(m.ball.vel, IVec2::new(-B_VX, 0));
        let scores: Vec<_> = out.score_events().copied().collect();
        assert_eq!(
            scores,
            vec![ScoreEvent {
                scoring_side: Side::Right,
                left_points: 0,
                right_points: 1
            }]
        );
        assert_eq!(out.render.right_score, 1);
    }

    #[test]
    fn test_left_scores_and_serves_right() {
        let mut m = Match::default();
        place_ball(&mut m, 765, 100, 10, -3);
        let out = m.tick(&idle());

        assert_eq!(m.score(), (1, 0));
        assert_eq!(m.ball.rect, Rect::new(390, 230, B_SIZE, B_SIZE));
        assert_eq!(m.ball.vel, IVec2::new(B_VX, 0));
        assert_eq!(out.score_events().count(), 1);
        assert_eq!(
            out.score_events().next().map(|e| e.scoring_side),
            Some(Side::Left)
        );
    }

    #[test]
    fn test_score_leaves_paddles_alone() {
        let mut m = Match::default();
        place_ball(&mut m, 20, 350, -10, 0);
        let before_left = m.left.paddle.clone();
        let before_right = m.right.paddle.clone();
        m.tick(&idle());
        assert_eq!(m.left.paddle, before_left);
        assert_eq!(m.right.paddle, before_right);
        assert_eq!(m.left.points, 0);
    }

    #[test]
    fn test_idle_tick_only_moves_ball() {
        let mut m = Match::default();
        let before = m.clone();
        let out = m.tick(&idle());

        assert!(out.events.is_empty());
        assert!(out.running);
        assert_eq!(m.left, before.left);
        assert_eq!(m.right, before.right);
        assert_eq!(m.court(), before.court());
        assert_eq!(m.ball.vel, before.ball.vel);
        assert_eq!(m.ball.rect.size(), before.ball.rect.size());
        assert_eq!(m.ball.rect.pos(), before.ball.rect.pos() + before.ball.vel);
    }

    #[test]
    fn test_reference_rally_hits_right_paddle() {
        // Ball from (390, 230) at vx=10 touches the right paddle face (x = 780)
        // once ball.x reaches 760, i.e. on the 38th tick.
        let mut m = Match::default();
        assert_eq!(m.right.paddle.rect.y, 210);

        let mut hit_tick = None;
        for _ in 0..40 {
            let out = m.tick(&idle());
            assert_eq!(out.score_events().count(), 0);
            if out.events.contains(&MatchEvent::PaddleHit {
                side: Side::Right,
                spin: 0,
            }) {
                hit_tick = Some(out.render.tick);
                break;
            }
        }
        // ball.x after n - 1 ticks is 390 + 10 * (n - 1); contact is checked
        // before integrating, so 760 is reached at the start of tick n = 38
        assert_eq!(hit_tick, Some(38));
        assert_eq!(m.ball.vel, IVec2::new(-B_VX, 0));
    }

    #[test]
    fn test_reference_rally_scores_when_paddle_away() {
        let mut m = Match::default();
        m.right.paddle.rect.y = 30;
        m.right.paddle.prev_y = 30;

        let mut score_tick = None;
        for _ in 0..40 {
            let out = m.tick(&idle());
            if out.score_events().count() > 0 {
                score_tick = Some(out.render.tick);
                break;
            }
        }
        // Same contact tick as the hit case: 390 + 10 * 37 = 760
        assert_eq!(score_tick, Some(38));
        assert_eq!(m.score(), (1, 0));
        assert_eq!(m.ball.vel, IVec2::new(B_VX, 0));
    }

    #[test]
    fn test_quit_is_pass_through() {
        let mut m = Match::default();
        let out = m.tick(&TickInput {
            quit: true,
            ..Default::default()
        });
        assert!(!out.running);
        assert_eq!(m.ticks, 1);
        assert_eq!(m.ball.rect.x, 400);
    }

    #[test]
    fn test_advance_matches_repeated_ticks() {
        let input = TickInput {
            left_down: true,
            right_up: true,
            ..Default::default()
        };
        let mut a = Match::default();
        let mut b = Match::default();

        let out = a.advance(&input, 45);
        let mut events = Vec::new();
        for _ in 0..45 {
            events.extend(b.tick(&input).events);
        }

        assert_eq!(a, b);
        assert_eq!(out.events, events);
        assert_eq!(out.render.tick, 45);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                left_up: true,
                ..Default::default()
            },
            TickInput {
                right_down: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut m1 = Match::default();
        let mut m2 = Match::default();
        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            m1.tick(&input);
            m2.tick(&input);
        }
        assert_eq!(m1, m2);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left_up, left_down, right_up, right_down)| TickInput {
                left_up,
                left_down,
                right_up,
                right_down,
                quit: false,
            },
        )
    }

    proptest! {
        #[test]
        fn paddle_stays_between_walls(
            start in 30i32..=390,
            moves in prop::collection::vec(any::<bool>(), 0..100),
        ) {
            let m = Match::default();
            let court = m.court();
            let mut paddle = m.left.paddle.clone();
            paddle.rect.y = start;
            for up in moves {
                let direction = if up { Direction::Up } else { Direction::Down };
                move_paddle(court, &mut paddle, direction);
                prop_assert!(paddle.rect.top() >= court.open_top());
                prop_assert!(paddle.rect.bottom() <= court.open_bottom());
            }
        }

        #[test]
        fn match_invariants_hold(inputs in prop::collection::vec(arb_input(), 1..400)) {
            let mut m = Match::default();
            let mut scored = 0u32;
            let mut last = m.score();
            for input in &inputs {
                let out = m.tick(input);
                scored += out.score_events().count() as u32;
                prop_assert!(out.score_events().count() <= 1);

                for paddle in [&m.left.paddle, &m.right.paddle] {
                    prop_assert!(paddle.rect.top() >= m.court().open_top());
                    prop_assert!(paddle.rect.bottom() <= m.court().open_bottom());
                }
                prop_assert_eq!(m.ball.rect.size(), IVec2::splat(B_SIZE));

                let score = m.score();
                prop_assert!(score.0 >= last.0 && score.1 >= last.1);
                last = score;
            }
            prop_assert_eq!(last.0 + last.1, scored);
        }
    }
}
