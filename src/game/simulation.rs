//! Simulation - Per-frame state update
//!
//! Owns the run state machine (Idle -> Running -> Crashed/Paused -> Running)
//! and the frame step: spawn, advance, collide, score.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::config::GameConfig;
use crate::game::entity::{Entity, EntityKind, LANE_COUNT};
use crate::game::render::{Layout, DASH_PERIOD};
use crate::game::spawner::Spawner;

pub const IDLE_MESSAGE: &str = "Press Space to start";
pub const CRASH_MESSAGE: &str = "Crashed! Press Space to try again";
pub const PAUSE_MESSAGE: &str = "Paused. Press Space to start a new run";

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// Nothing played yet
    Idle,
    Running,
    /// Hit an enemy; waits for a restart
    Crashed,
    /// Stopped from the toggle control; waits for a restart
    Paused,
}

/// Complete state of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Player lane, always below `LANE_COUNT`
    pub lane: usize,
    /// Road speed (px per frame)
    pub speed: f32,
    /// Frames until the next spawn
    pub spawn_timer: i32,
    /// Active enemies and boosts, oldest first
    pub entities: Vec<Entity>,
    pub score: u64,
    pub status: RunStatus,
    /// Lane divider dash phase, within `0..DASH_PERIOD`
    pub road_offset: f32,
    /// Frames simulated in this run
    pub frame: u64,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub crashed: bool,
    pub boosts_collected: u32,
    pub spawned: Option<EntityKind>,
}

impl SimulationState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            lane: config.start_lane.min(LANE_COUNT - 1),
            speed: config.base_speed,
            spawn_timer: 0,
            entities: Vec::new(),
            score: 0,
            status: RunStatus::Idle,
            road_offset: 0.0,
            frame: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// HUD banner for the current status; `None` while running
    pub fn message(&self) -> Option<&'static str> {
        match self.status {
            RunStatus::Idle => Some(IDLE_MESSAGE),
            RunStatus::Running => None,
            RunStatus::Crashed => Some(CRASH_MESSAGE),
            RunStatus::Paused => Some(PAUSE_MESSAGE),
        }
    }

    /// Begin a fresh run. Returns false (and changes nothing) if one is already going.
    pub fn start(&mut self, config: &GameConfig) -> bool {
        if self.is_running() {
            return false;
        }
        self.score = 0;
        self.entities.clear();
        self.spawn_timer = 0;
        self.speed = config.base_speed;
        self.frame = 0;
        self.status = RunStatus::Running;
        true
    }

    /// Stop the current run without a crash. Returns false if nothing was running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = RunStatus::Paused;
        true
    }

    pub fn steer_left(&mut self) {
        self.lane = self.lane.saturating_sub(1);
    }

    pub fn steer_right(&mut self) {
        self.lane = (self.lane + 1).min(LANE_COUNT - 1);
    }

    fn bump_speed(&mut self, by: f32, max: f32) {
        self.speed = (self.speed + by).min(max);
    }
}

/// Frame update logic
pub struct Simulation;

impl Simulation {
    /// Advance one frame.
    ///
    /// The road scrolls in every status; everything else only happens while
    /// running. An enemy hit ends the frame before any boost is collected:
    /// no bonus, no score tick, and the entities are left where they are.
    pub fn step<R: Rng + ?Sized>(
        state: &mut SimulationState,
        config: &GameConfig,
        layout: &Layout,
        rng: &mut R,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        state.road_offset = (state.road_offset + state.speed) % DASH_PERIOD;

        if !state.is_running() {
            return outcome;
        }
        state.frame += 1;

        if let Some(entity) = Spawner::update(&mut state.spawn_timer, state.score, config, rng) {
            outcome.spawned = Some(entity.kind);
            state.entities.push(entity);
        }

        for entity in &mut state.entities {
            entity.advance(state.speed, config.enemy_speed_offset, config.boost_speed_offset);
        }

        let player = layout.player_rect(state.lane);
        let hit_enemy = state
            .entities
            .iter()
            .any(|e| e.is_enemy() && player.overlaps(&layout.entity_rect(e)));
        if hit_enemy {
            // boosts touching the player this frame are not collected
            state.status = RunStatus::Crashed;
            outcome.crashed = true;
            return outcome;
        }

        let start_score = state.score;
        let despawn_y = layout.despawn_y();
        let mut i = 0;
        while i < state.entities.len() {
            let rect = layout.entity_rect(&state.entities[i]);
            let Entity { kind, y, .. } = state.entities[i];
            if kind == EntityKind::Boost && player.overlaps(&rect) {
                state.entities.remove(i);
                state.bump_speed(config.boost_speed_increment, config.max_speed);
                state.score += config.boost_bonus;
                outcome.boosts_collected += 1;
            } else if y >= despawn_y {
                state.entities.remove(i);
            } else {
                i += 1;
            }
        }

        state.score += config.score_per_frame;

        let crossed = state.score / config.milestone_interval - start_score / config.milestone_interval;
        for _ in 0..crossed {
            state.bump_speed(config.milestone_speed_increment, config.max_speed);
        }
        if crossed > 0 {
            log::trace!("Milestone at {}: speed {:.1}", state.score, state.speed);
        }

        outcome
    }
}
