//! Config - Tuning values for a run
//!
//! Every balance constant lives here so a driver can override any subset
//! from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::error::{GameError, Result};

/// Game balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Speed at the start of every run (px per frame)
    pub base_speed: f32,
    /// Hard ceiling for speed from boosts and milestones
    pub max_speed: f32,
    /// Extra per-frame travel for enemies on top of `speed`
    pub enemy_speed_offset: f32,
    /// Extra per-frame travel for boosts on top of `speed`
    pub boost_speed_offset: f32,
    /// Speed gained when a boost is collected
    pub boost_speed_increment: f32,
    /// Score gained when a boost is collected
    pub boost_bonus: u64,
    /// Score gained every running frame
    pub score_per_frame: u64,
    /// A speed ramp fires each time the score hits a multiple of this
    pub milestone_interval: u64,
    /// Speed gained at each milestone
    pub milestone_speed_increment: f32,
    /// Spawn countdown at score 0 (frames)
    pub spawn_base_interval: i32,
    /// Spawn countdown floor (frames)
    pub spawn_min_interval: i32,
    /// Score needed to shave one frame off the spawn countdown
    pub spawn_score_step: u64,
    /// Chance that a spawned entity is a boost
    pub boost_probability: f64,
    /// Lane the player starts each run in
    pub start_lane: usize,
    /// Frames per second the frame loop aims for
    pub target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            max_speed: 12.0,
            enemy_speed_offset: 1.5,
            boost_speed_offset: 0.5,
            boost_speed_increment: 0.8,
            boost_bonus: 25,
            score_per_frame: 1,
            milestone_interval: 120,
            milestone_speed_increment: 0.3,
            spawn_base_interval: 48,
            spawn_min_interval: 18,
            spawn_score_step: 50,
            boost_probability: 0.2,
            start_lane: 1,
            target_fps: 60,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it is absent or unusable
    pub fn load_or_default(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&json) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values that would break the game's invariants
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        if !(self.base_speed > 0.0) {
            return invalid("baseSpeed must be positive");
        }
        if self.max_speed < self.base_speed {
            return invalid("maxSpeed must be at least baseSpeed");
        }
        if self.spawn_min_interval < 1 {
            return invalid("spawnMinInterval must be at least 1");
        }
        if self.spawn_base_interval < self.spawn_min_interval {
            return invalid("spawnBaseInterval must be at least spawnMinInterval");
        }
        if self.spawn_score_step == 0 || self.milestone_interval == 0 {
            return invalid("spawnScoreStep and milestoneInterval must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.boost_probability) {
            return invalid("boostProbability must be within 0..=1");
        }
        if self.start_lane > 2 {
            return invalid("startLane must be 0, 1 or 2");
        }
        if self.target_fps == 0 {
            return invalid("targetFps must be non-zero");
        }
        Ok(())
    }
}
