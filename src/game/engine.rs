//! Engine - Main game loop driver
//!
//! Owns the run state, tuning config, RNG and best-score store, and exposes
//! the handful of operations a frontend needs: keys, the start/pause toggle,
//! and one `tick` per displayed frame.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::game::config::GameConfig;
use crate::game::input::InputCommand;
use crate::game::render::{self, Frame, Layout, Viewport};
use crate::game::simulation::{RunStatus, Simulation, SimulationState};
use crate::game::store::BestScoreStore;

/// Number of recent ticks averaged in `EngineStats`
const TICK_WINDOW: usize = 60;

/// Compact engine snapshot for IPC transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub status: RunStatus,
    pub running: bool,
    pub score: u64,
    pub best_score: u64,
    pub speed: f32,
    pub lane: usize,
    pub entity_count: usize,
    pub message: Option<String>,
}

/// Engine statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub target_fps: u32,
    pub avg_tick_time_ms: f32,
    pub entity_count: usize,
    pub runs_played: u32,
    pub status: RunStatus,
}

/// The game loop engine
pub struct GameEngine {
    config: GameConfig,
    state: SimulationState,
    viewport: Viewport,
    best_score: u64,
    store: Box<dyn BestScoreStore>,
    rng: StdRng,
    /// Recent tick durations for averaging
    tick_times: Vec<f32>,
    runs_played: u32,
}

impl GameEngine {
    /// Create an engine, reading the best score from `store`
    pub fn new(config: GameConfig, store: Box<dyn BestScoreStore>) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Same as `new` with a fixed RNG, for reproducible runs
    pub fn with_seed(config: GameConfig, store: Box<dyn BestScoreStore>, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    /// An invalid config is replaced by the defaults rather than left to
    /// panic mid-run (zero divisors, out-of-range probability)
    fn with_rng(config: GameConfig, store: Box<dyn BestScoreStore>, rng: StdRng) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Using default tuning: {}", e);
                GameConfig::default()
            }
        };
        let best_score = store.load();
        log::info!("Engine ready, best score {}", best_score);
        Self {
            state: SimulationState::new(&config),
            config,
            viewport: Viewport::default(),
            best_score,
            store,
            rng,
            tick_times: Vec::with_capacity(TICK_WINDOW),
            runs_played: 0,
        }
    }

    /// Feed a raw key-down event. Unknown keys do nothing.
    pub fn key_down(&mut self, key: &str, code: &str) {
        if let Some(command) = InputCommand::from_key(key, code) {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::LaneLeft => self.state.steer_left(),
            InputCommand::LaneRight => self.state.steer_right(),
            InputCommand::Start => self.start(),
        }
    }

    /// Start a fresh run unless one is already going
    pub fn start(&mut self) {
        if self.state.start(&self.config) {
            self.runs_played += 1;
            log::info!("Run {} started", self.runs_played);
        }
    }

    /// Stop the current run and commit the best score
    pub fn pause(&mut self) {
        if self.state.pause() {
            log::info!("Run paused at score {}", self.state.score);
            self.commit_best();
        }
    }

    /// Start/pause button: starts when stopped, pauses when running
    pub fn toggle(&mut self) {
        if self.state.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Track the container size; takes effect on the next tick
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advance one frame and paint it
    pub fn tick(&mut self) -> Frame {
        let started = Instant::now();
        self.step();
        let frame = self.render();

        self.tick_times.push(started.elapsed().as_secs_f32() * 1000.0);
        if self.tick_times.len() > TICK_WINDOW {
            self.tick_times.remove(0);
        }
        frame
    }

    /// Advance one frame without painting
    pub fn step(&mut self) {
        let layout = Layout::new(self.viewport);
        let outcome = Simulation::step(&mut self.state, &self.config, &layout, &mut self.rng);

        if let Some(kind) = outcome.spawned {
            log::trace!("Spawned {:?}", kind);
        }
        if outcome.boosts_collected > 0 {
            log::debug!(
                "Boost collected, score {} speed {:.1}",
                self.state.score,
                self.state.speed
            );
        }
        if outcome.crashed {
            log::info!("Crashed at score {}", self.state.score);
            self.commit_best();
        }
    }

    /// Paint the current state without advancing it
    pub fn render(&self) -> Frame {
        render::render(&self.state, self.best_score, self.viewport)
    }

    fn commit_best(&mut self) {
        if self.state.score <= self.best_score {
            return;
        }
        self.best_score = self.state.score;
        log::info!("New best score {}", self.best_score);
        if let Err(e) = self.store.save(self.best_score) {
            log::warn!("Could not persist best score: {}", e);
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.state.status,
            running: self.state.is_running(),
            score: self.state.score,
            best_score: self.best_score,
            speed: self.state.speed,
            lane: self.state.lane,
            entity_count: self.state.entities.len(),
            message: self.state.message().map(str::to_string),
        }
    }

    pub fn stats(&self) -> EngineStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        EngineStats {
            target_fps: self.config.target_fps,
            avg_tick_time_ms: avg_tick_time,
            entity_count: self.state.entities.len(),
            runs_played: self.runs_played,
            status: self.state.status,
        }
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct state access for drivers and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{Entity, EntityKind};
    use crate::game::render::{PLAYER_BOTTOM_MARGIN, PLAYER_HEIGHT, SURFACE_HEIGHT};
    use crate::game::simulation::CRASH_MESSAGE;
    use crate::game::store::{JsonFileStore, MemoryStore};

    fn engine_with_best(best: u64) -> (GameEngine, MemoryStore) {
        let store = MemoryStore::new(best);
        let engine = GameEngine::with_seed(GameConfig::default(), Box::new(store.clone()), 11);
        (engine, store)
    }

    /// Put an enemy where the next frame lands it on the player
    fn force_enemy_on_player(engine: &mut GameEngine) {
        let lane = engine.state().lane;
        let mut enemy = Entity::spawn(EntityKind::Enemy, lane);
        enemy.y = SURFACE_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN;
        engine.state_mut().entities.push(enemy);
    }

    fn play_to_score(engine: &mut GameEngine, score: u64) {
        engine.key_down(" ", "Space");
        engine.state_mut().spawn_timer = i32::MAX;
        engine.state_mut().score = score - 1;
        engine.step();
        assert_eq!(engine.state().score, score);
    }

    #[test]
    fn space_starts_and_arrows_steer() {
        let (mut engine, _) = engine_with_best(0);
        assert!(!engine.is_running());
        engine.key_down(" ", "Space");
        assert!(engine.is_running());

        engine.key_down("ArrowLeft", "ArrowLeft");
        engine.key_down("a", "KeyA");
        assert_eq!(engine.state().lane, 0);
        engine.key_down("D", "KeyD");
        assert_eq!(engine.state().lane, 1);
        engine.key_down("q", "KeyQ");
        assert_eq!(engine.state().lane, 1);
    }

    #[test]
    fn quiet_run_scores_once_per_frame() {
        let (mut engine, _) = engine_with_best(0);
        engine.start();
        engine.state_mut().spawn_timer = i32::MAX;
        for _ in 0..30 {
            engine.tick();
        }
        assert!(engine.is_running());
        assert_eq!(engine.state().score, 30);
    }

    #[test]
    fn forced_enemy_crashes_next_frame() {
        let (mut engine, _) = engine_with_best(0);
        engine.start();
        engine.state_mut().spawn_timer = i32::MAX;
        force_enemy_on_player(&mut engine);

        let frame = engine.tick();
        assert!(!engine.is_running());
        assert_eq!(engine.snapshot().message.as_deref(), Some(CRASH_MESSAGE));
        assert!(frame.texts().any(|t| t == CRASH_MESSAGE));
    }

    #[test]
    fn lower_score_keeps_persisted_best() {
        let (mut engine, store) = engine_with_best(500);
        play_to_score(&mut engine, 300);
        force_enemy_on_player(&mut engine);
        engine.step();

        assert!(!engine.is_running());
        assert_eq!(engine.best_score(), 500);
        assert_eq!(store.load(), 500);
    }

    #[test]
    fn higher_score_replaces_persisted_best() {
        let (mut engine, store) = engine_with_best(500);
        play_to_score(&mut engine, 700);
        force_enemy_on_player(&mut engine);
        engine.step();

        assert_eq!(engine.best_score(), 700);
        assert_eq!(store.load(), 700);
    }

    #[test]
    fn toggle_pause_commits_best() {
        let (mut engine, store) = engine_with_best(10);
        play_to_score(&mut engine, 40);

        engine.toggle();
        assert_eq!(engine.state().status, RunStatus::Paused);
        assert_eq!(store.load(), 40);

        engine.toggle();
        assert!(engine.is_running());
        assert_eq!(engine.state().score, 0, "toggle starts a fresh run");
    }

    #[test]
    fn best_tracks_the_maximum_across_runs() {
        let (mut engine, store) = engine_with_best(0);
        let mut max_seen = 0;
        for score in [120, 80, 300, 299, 5] {
            play_to_score(&mut engine, score);
            max_seen = max_seen.max(score);
            force_enemy_on_player(&mut engine);
            engine.step();
            assert_eq!(engine.best_score(), max_seen);
            assert_eq!(store.load(), max_seen);
        }
        assert_eq!(engine.stats().runs_played, 5);
    }

    #[test]
    fn best_score_is_read_from_disk_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut seed = JsonFileStore::in_dir(dir.path());
        seed.save(321).unwrap();

        let engine = GameEngine::new(
            GameConfig::default(),
            Box::new(JsonFileStore::in_dir(dir.path())),
        );
        assert_eq!(engine.best_score(), 321);
        assert!(engine.render().texts().any(|t| t == "Best: 321"));
    }

    #[test]
    fn stats_average_recent_ticks() {
        let (mut engine, _) = engine_with_best(0);
        assert_eq!(engine.stats().avg_tick_time_ms, 0.0);
        for _ in 0..(TICK_WINDOW + 10) {
            engine.tick();
        }
        assert_eq!(engine.tick_times.len(), TICK_WINDOW);
        assert!(engine.stats().avg_tick_time_ms >= 0.0);
    }

    #[test]
    fn resize_moves_the_road() {
        let (mut engine, _) = engine_with_best(0);
        engine.resize(Viewport::with_width(400.0));
        let frame = engine.tick();
        assert_eq!(frame.viewport.width, 400.0);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let broken = GameConfig {
            milestone_interval: 0,
            spawn_score_step: 0,
            boost_probability: 2.0,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(broken, Box::new(MemoryStore::default()), 3);
        assert_eq!(engine.config(), &GameConfig::default());

        engine.start();
        for _ in 0..200 {
            engine.step();
        }
        assert!(engine.state().frame > 0);
    }

    #[test]
    fn seeded_engines_play_identically() {
        let run = || {
            let mut engine =
                GameEngine::with_seed(GameConfig::default(), Box::new(MemoryStore::default()), 77);
            engine.start();
            for _ in 0..2000 {
                engine.step();
                if !engine.is_running() {
                    break;
                }
            }
            (engine.state().score, engine.state().frame)
        };
        assert_eq!(run(), run());
    }
}
