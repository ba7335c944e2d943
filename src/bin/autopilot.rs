//! Headless driver: plays seeded runs with a simple lane-dodging bot.
//!
//! Useful for balancing `GameConfig` without a window. Logs through
//! `env_logger`; set `RUST_LOG=debug` for per-boost detail.

use std::path::PathBuf;

use clap::Parser;
use turbo_race_lib::game::render::{Layout, PLAYER_HEIGHT};
use turbo_race_lib::game::{
    BestScoreStore, GameConfig, GameEngine, InputCommand, JsonFileStore, MemoryStore,
    SimulationState,
};

/// How far above the player the bot looks for enemies
const LOOKAHEAD: f32 = 180.0;

#[derive(Parser, Debug)]
#[command(name = "autopilot", about = "Play Turbo Race headless with a dodging bot")]
struct Args {
    /// Number of runs to play
    #[arg(long, default_value_t = 5)]
    runs: u32,

    /// Give up on a run after this many frames
    #[arg(long, default_value_t = 20_000)]
    max_frames: u64,

    /// RNG seed; the same seed replays the same runs
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON config overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding best_score.json; in-memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn lane_is_threatened(state: &SimulationState, layout: &Layout, lane: usize) -> bool {
    let player_y = layout.player_rect(lane).y;
    state.entities.iter().any(|e| {
        e.is_enemy()
            && e.lane == lane
            && e.y + e.height >= player_y - LOOKAHEAD
            && e.y <= player_y + PLAYER_HEIGHT
    })
}

/// One steering decision per frame: stay if safe, else move toward a safe neighbour
fn steer(state: &SimulationState, layout: &Layout) -> Option<InputCommand> {
    let lane = state.lane;
    if !lane_is_threatened(state, layout, lane) {
        return None;
    }
    if lane > 0 && !lane_is_threatened(state, layout, lane - 1) {
        return Some(InputCommand::LaneLeft);
    }
    if lane < 2 && !lane_is_threatened(state, layout, lane + 1) {
        return Some(InputCommand::LaneRight);
    }
    None
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args
        .config
        .as_deref()
        .map(GameConfig::load_or_default)
        .unwrap_or_default();
    let store: Box<dyn BestScoreStore> = match &args.data_dir {
        Some(dir) => Box::new(JsonFileStore::in_dir(dir)),
        None => Box::new(MemoryStore::default()),
    };

    let mut engine = GameEngine::with_seed(config, store, args.seed);
    let mut scores = Vec::with_capacity(args.runs as usize);

    for run in 1..=args.runs {
        engine.start();
        while engine.is_running() && engine.state().frame < args.max_frames {
            let layout = Layout::new(engine.viewport());
            if let Some(command) = steer(engine.state(), &layout) {
                engine.apply(command);
            }
            engine.step();
        }
        if engine.is_running() {
            log::info!("Run {} hit the frame cap", run);
            engine.pause();
        }

        let state = engine.state();
        log::info!(
            "Run {}: score {} after {} frames, final speed {:.1}",
            run,
            state.score,
            state.frame,
            state.speed
        );
        scores.push(state.score);
    }

    let mean = scores.iter().sum::<u64>() as f64 / scores.len().max(1) as f64;
    println!(
        "runs={} mean={:.1} max={} best={}",
        scores.len(),
        mean,
        scores.iter().max().copied().unwrap_or(0),
        engine.best_score()
    );
}
