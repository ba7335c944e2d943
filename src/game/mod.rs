//! Game Module
//!
//! Turbo Race: a 3-lane endless car-dodging game. The simulation runs in
//! Rust; the frontend only replays each frame's draw list onto a canvas and
//! forwards key presses.

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod frame_loop;
pub mod input;
pub mod render;
pub mod simulation;
pub mod spawner;
pub mod store;

pub use config::GameConfig;
pub use engine::{EngineSnapshot, EngineStats, GameEngine};
pub use entity::{Entity, EntityKind, Rect};
pub use error::{GameError, Result};
pub use frame_loop::{create_shared_engine, FrameLoop, LoopControl, Mount, SharedEngine};
pub use input::InputCommand;
pub use render::{DrawCommand, Frame, Viewport};
pub use simulation::{RunStatus, Simulation, SimulationState, StepOutcome};
pub use store::{BestScoreStore, JsonFileStore, MemoryStore};
