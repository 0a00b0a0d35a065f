//! Spong entry point
//!
//! Headless driver: replays a key script against a match at the configured
//! tick rate, optionally streaming every frame as JSON lines.
//!
//! Usage:
//!   spong [--settings settings.json] [--script keys.txt] [--json] [--no-pacing]

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use spong::driver::{
    Driver, EventLog, FramePacer, InputSource, JsonLinesRenderer, NullRenderer, Renderer,
    RunSummary,
};
use spong::input::{DEMO_SCRIPT, ScriptedInput};
use spong::policy::FirstTo;
use spong::settings::Settings;
use spong::sim::Match;

#[derive(Parser)]
#[command(name = "spong")]
#[command(about = "Run a two-player paddle match from a key script")]
struct Args {
    /// JSON settings file (defaults apply when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Key script to replay, one `<ticks> [key ...]` line per stretch
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// End the match when a player reaches this many points
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    first_to: Option<u32>,

    /// Write every frame to stdout as a JSON line
    #[arg(long)]
    json: bool,

    /// Run as fast as possible instead of at the tick rate
    #[arg(long)]
    no_pacing: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    log::info!("Spong starting...");

    let settings = Settings::load(args.settings.as_deref()).context("failed to load settings")?;
    let input = match &args.script {
        Some(path) => ScriptedInput::load(path, &settings.bindings),
        None => ScriptedInput::parse(DEMO_SCRIPT, &settings.bindings),
    }
    .context("failed to load input script")?;
    log::info!("Input script covers {} ticks", input.total_ticks());

    let game = Match::try_new(settings.match_config.clone())
        .context("invalid match configuration")?;

    let summary = if args.json {
        run(&args, &settings, game, input, JsonLinesRenderer::new(io::stdout().lock()))?
    } else {
        run(&args, &settings, game, input, NullRenderer)?
    };

    // Keep stdout clean for JSON consumers
    if !args.json {
        let board = &summary.scoreboard;
        println!(
            "Final score {} - {} after {} ticks ({:?})",
            board.left, board.right, summary.ticks, summary.reason
        );
        if let Some(leader) = board.leader() {
            println!("Leader: {}", leader.as_str());
        }
        if let Some((side, run)) = board.longest_run() {
            println!("Longest run: {} by {}", run, side.as_str());
        }
    }
    Ok(())
}

fn run<I: InputSource, R: Renderer>(
    args: &Args,
    settings: &Settings,
    game: Match,
    input: I,
    renderer: R,
) -> Result<RunSummary> {
    let pacer = if args.no_pacing || !settings.pacing {
        FramePacer::unpaced()
    } else {
        FramePacer::new(settings.tick_duration())
    };
    let first_to = args.first_to.or(settings.first_to).map(FirstTo::new);

    let mut driver = Driver::new(game, input, renderer)
        .with_pacer(pacer)
        .with_first_to(first_to)
        .with_max_ticks(args.max_ticks);
    driver.add_listener(Box::new(EventLog));

    driver.run().context("failed to render frame")
}
