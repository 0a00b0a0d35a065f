//! Fixed-rate driver loop
//!
//! Wires an input source, the match, a renderer and any score listeners
//! together: poll, tick, render, dispatch events, then sleep out the rest of
//! the frame.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::policy::{FirstTo, Scoreboard};
use crate::sim::{Match, MatchEvent, RenderState, ScoreEvent, Side, TickInput};

/// Supplies intents once per tick
pub trait InputSource {
    /// `None` once the source has nothing more to give
    fn poll(&mut self) -> Option<TickInput>;
}

/// Draws (or otherwise consumes) a frame
pub trait Renderer {
    fn render(&mut self, frame: &RenderState) -> io::Result<()>;
}

/// Subscriber to the match's event stream
pub trait ScoreListener {
    fn on_score(&mut self, event: &ScoreEvent);

    /// Every event, scores included; scores are forwarded to `on_score`
    fn on_event(&mut self, event: &MatchEvent) {
        if let Some(score) = event.as_score() {
            self.on_score(score);
        }
    }
}

impl ScoreListener for Scoreboard {
    fn on_score(&mut self, event: &ScoreEvent) {
        self.record(event);
    }
}

/// Logs every event; stands in for a sound or HUD collaborator
#[derive(Debug, Default)]
pub struct EventLog;

impl ScoreListener for EventLog {
    fn on_score(&mut self, event: &ScoreEvent) {
        log::info!(
            "Point to {}: {} - {}",
            event.scoring_side.as_str(),
            event.left_points,
            event.right_points
        );
    }

    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::Score(score) => self.on_score(score),
            MatchEvent::PaddleHit { side, spin } => {
                log::debug!("Paddle hit by {} (spin {})", side.as_str(), spin)
            }
            MatchEvent::WallBounce { wall } => log::debug!("Wall bounce ({:?})", wall),
        }
    }
}

/// Discards frames
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &RenderState) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one JSON snapshot per line
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, frame: &RenderState) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}

/// Holds a steady tick rate by sleeping out whatever is left of each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    period: Duration,
    enabled: bool,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            enabled: true,
        }
    }

    /// A pacer that never sleeps (headless runs, tests)
    pub fn unpaced() -> Self {
        Self {
            period: Duration::ZERO,
            enabled: false,
        }
    }

    /// Time left in the frame after `elapsed`, if the frame finished early
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        if self.enabled && elapsed < self.period {
            Some(self.period - elapsed)
        } else {
            None
        }
    }

    pub fn wait(&self, frame_start: Instant) {
        if let Some(rest) = self.remaining(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

/// Why the driver loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A quit intent arrived
    Quit,
    /// The input source ran dry
    InputExhausted,
    /// The configured tick limit was reached
    TickLimit,
    /// The victory policy named a winner
    Won(Side),
}

/// Outcome of [`Driver::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub ticks: u64,
    pub scoreboard: Scoreboard,
}

/// Runs a match against an input source and a renderer
pub struct Driver<I, R> {
    game: Match,
    input: I,
    renderer: R,
    pacer: FramePacer,
    listeners: Vec<Box<dyn ScoreListener>>,
    first_to: Option<FirstTo>,
    max_ticks: Option<u64>,
}

impl<I: InputSource, R: Renderer> Driver<I, R> {
    pub fn new(game: Match, input: I, renderer: R) -> Self {
        Self {
            game,
            input,
            renderer,
            pacer: FramePacer::unpaced(),
            listeners: Vec::new(),
            first_to: None,
            max_ticks: None,
        }
    }

    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_first_to(mut self, policy: Option<FirstTo>) -> Self {
        self.first_to = policy;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn add_listener(&mut self, listener: Box<dyn ScoreListener>) {
        self.listeners.push(listener);
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Loop until quit, input exhaustion, the tick limit or a winner
    pub fn run(&mut self) -> io::Result<RunSummary> {
        let mut scoreboard = Scoreboard::new();
        self.renderer.render(&self.game.snapshot())?;

        let reason = loop {
            if self.max_ticks.is_some_and(|limit| self.game.ticks >= limit) {
                break StopReason::TickLimit;
            }

            let frame_start = Instant::now();
            let Some(input) = self.input.poll() else {
                break StopReason::InputExhausted;
            };

            let out = self.game.tick(&input);
            self.renderer.render(&out.render)?;

            for event in &out.events {
                scoreboard.on_event(event);
                for listener in &mut self.listeners {
                    listener.on_event(event);
                }
            }

            if !out.running {
                break StopReason::Quit;
            }
            if let Some(side) = self
                .first_to
                .and_then(|policy| policy.winner(scoreboard.score()))
            {
                break StopReason::Won(side);
            }

            self.pacer.wait(frame_start);
        };

        log::info!(
            "Match stopped after {} ticks ({:?}), score {} - {}",
            self.game.ticks,
            reason,
            scoreboard.left,
            scoreboard.right
        );

        Ok(RunSummary {
            reason,
            ticks: self.game.ticks,
            scoreboard,
        })
    }
}
