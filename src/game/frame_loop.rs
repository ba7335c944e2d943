//! Frame loop - Self-rescheduling frame callback with scoped cancellation
//!
//! `FrameLoop` calls back once per frame on its own thread until it is
//! cancelled or dropped; teardown joins the thread, so no frame runs after
//! the owner is gone. `Mount` ties one loop and the keyboard route to a
//! shared engine for as long as a surface is attached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::game::engine::GameEngine;
use crate::game::error::{GameError, Result};
use crate::game::render::{Frame, Viewport};

/// Thread-safe engine handle shared by the frame loop and input routes
pub type SharedEngine = Arc<Mutex<GameEngine>>;

/// Wrap an engine for sharing
pub fn create_shared_engine(engine: GameEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Returned by a frame callback to keep or break the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// A running frame callback. Dropping it cancels the loop.
pub struct FrameLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Call `callback` every `interval` until it returns `Stop` or the loop is cancelled
    pub fn spawn<F>(interval: Duration, mut callback: F) -> Result<Self>
    where
        F: FnMut() -> LoopControl + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("frame-loop".into())
            .spawn(move || {
                let mut deadline = Instant::now();
                while !flag.load(Ordering::Acquire) {
                    if callback() == LoopControl::Stop {
                        log::debug!("Frame loop stopped by its callback");
                        break;
                    }

                    deadline += interval;
                    let now = Instant::now();
                    if deadline > now {
                        thread::sleep(deadline - now);
                    } else {
                        // fell behind; don't try to catch up with a burst of frames
                        deadline = now;
                    }
                }
            })
            .map_err(GameError::FrameLoop)?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// True until the loop thread has exited
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Break the chain and wait for the in-flight frame to finish
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            // cancelled from inside its own callback; the flag ends it
            return;
        }
        if handle.join().is_err() {
            log::error!("Frame loop thread panicked");
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A surface attached to an engine: one frame loop plus the keyboard route.
///
/// Keys only reach the engine through a live `Mount`; dropping it releases
/// both the frame callback and the keyboard subscription.
pub struct Mount {
    engine: SharedEngine,
    frame_loop: FrameLoop,
}

impl Mount {
    /// Start ticking `engine` at its configured rate, handing each frame to `on_frame`
    pub fn attach<F>(engine: SharedEngine, mut on_frame: F) -> Result<Self>
    where
        F: FnMut(Frame) + Send + 'static,
    {
        let fps = engine
            .lock()
            .map(|e| e.config().target_fps)
            .unwrap_or(60)
            .max(1);
        let interval = Duration::from_secs(1) / fps;

        let looped = Arc::clone(&engine);
        let frame_loop = FrameLoop::spawn(interval, move || {
            let frame = match looped.lock() {
                Ok(mut engine) => engine.tick(),
                Err(_) => {
                    log::error!("Engine lock poisoned, stopping frame loop");
                    return LoopControl::Stop;
                }
            };
            on_frame(frame);
            LoopControl::Continue
        })?;

        log::info!("Surface mounted at {} fps", fps);
        Ok(Self { engine, frame_loop })
    }

    /// Route a key-down event to the engine
    pub fn key_down(&self, key: &str, code: &str) {
        match self.engine.lock() {
            Ok(mut engine) => engine.key_down(key, code),
            Err(_) => log::warn!("Dropping key {:?}: engine lock poisoned", key),
        }
    }

    /// Forward a container resize
    pub fn resize(&self, viewport: Viewport) {
        if let Ok(mut engine) = self.engine.lock() {
            engine.resize(viewport);
        }
    }

    pub fn is_active(&self) -> bool {
        self.frame_loop.is_active()
    }

    /// Tear down explicitly; same as dropping
    pub fn detach(self) {}
}

impl Drop for Mount {
    fn drop(&mut self) {
        log::info!("Surface unmounted");
    }
}
