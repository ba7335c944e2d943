//! Turbo Race - Tauri Backend
//!
//! Runs the game loop in Rust and streams draw lists to the web frontend,
//! which paints them onto its canvas.

pub mod game;

/// Optional tuning overrides, looked up in the app config directory
pub const CONFIG_FILE: &str = "turbo_race.json";

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Mutex;

    use tauri::{AppHandle, Emitter, Manager, State};

    use crate::game::render::Viewport;
    use crate::game::{
        create_shared_engine, EngineSnapshot, EngineStats, Frame, GameConfig, GameEngine,
        JsonFileStore, Mount, SharedEngine,
    };
    use crate::CONFIG_FILE;

    /// The mounted surface, if any
    type MountSlot = Mutex<Option<Mount>>;

    /// Attach the canvas: start the frame loop and the keyboard route
    #[tauri::command]
    fn mount_surface(
        app: AppHandle,
        engine: State<'_, SharedEngine>,
        slot: State<'_, MountSlot>,
        width: f32,
    ) -> Result<(), String> {
        let mut slot = slot.lock().map_err(|e| e.to_string())?;
        // a remount replaces the old loop; dropping it cancels its callback
        slot.take();

        engine
            .lock()
            .map_err(|e| e.to_string())?
            .resize(Viewport::with_width(width));

        let mount = Mount::attach(engine.inner().clone(), move |frame| {
            if let Err(e) = app.emit("frame", &frame) {
                log::warn!("Failed to emit frame: {}", e);
            }
        })
        .map_err(|e| e.to_string())?;

        *slot = Some(mount);
        Ok(())
    }

    /// Detach the canvas: cancel the frame loop and stop listening for keys
    #[tauri::command]
    fn unmount_surface(slot: State<'_, MountSlot>) -> Result<(), String> {
        let mut slot = slot.lock().map_err(|e| e.to_string())?;
        if let Some(mount) = slot.take() {
            mount.detach();
        }
        Ok(())
    }

    /// Keyboard key-down; ignored unless a surface is mounted
    #[tauri::command]
    fn key_down(slot: State<'_, MountSlot>, key: String, code: String) -> Result<(), String> {
        let slot = slot.lock().map_err(|e| e.to_string())?;
        match slot.as_ref() {
            Some(mount) => mount.key_down(&key, &code),
            None => log::debug!("Key {:?} ignored, no surface mounted", key),
        }
        Ok(())
    }

    /// Start/Pause button
    #[tauri::command]
    fn toggle_play(engine: State<'_, SharedEngine>) -> Result<EngineSnapshot, String> {
        let mut engine = engine.lock().map_err(|e| e.to_string())?;
        engine.toggle();
        Ok(engine.snapshot())
    }

    /// Container width changed; goes through the mount while one is attached
    #[tauri::command]
    fn resize(
        engine: State<'_, SharedEngine>,
        slot: State<'_, MountSlot>,
        width: f32,
    ) -> Result<(), String> {
        let viewport = Viewport::with_width(width);
        let slot = slot.lock().map_err(|e| e.to_string())?;
        match slot.as_ref() {
            Some(mount) => mount.resize(viewport),
            None => engine.lock().map_err(|e| e.to_string())?.resize(viewport),
        }
        Ok(())
    }

    /// Advance one frame by hand; only for frontends that drive their own loop
    #[tauri::command]
    fn tick(engine: State<'_, SharedEngine>, slot: State<'_, MountSlot>) -> Result<Frame, String> {
        if slot.lock().map_err(|e| e.to_string())?.is_some() {
            return Err("surface is mounted; frames arrive as events".to_string());
        }
        let mut engine = engine.lock().map_err(|e| e.to_string())?;
        Ok(engine.tick())
    }

    #[tauri::command]
    fn get_snapshot(engine: State<'_, SharedEngine>) -> Result<EngineSnapshot, String> {
        let engine = engine.lock().map_err(|e| e.to_string())?;
        Ok(engine.snapshot())
    }

    #[tauri::command]
    fn get_stats(engine: State<'_, SharedEngine>) -> Result<EngineStats, String> {
        let engine = engine.lock().map_err(|e| e.to_string())?;
        Ok(engine.stats())
    }

    #[tauri::command]
    fn get_best_score(engine: State<'_, SharedEngine>) -> Result<u64, String> {
        let engine = engine.lock().map_err(|e| e.to_string())?;
        Ok(engine.best_score())
    }

    pub fn run() {
        tauri::Builder::default()
            .setup(|app| {
                if cfg!(debug_assertions) {
                    app.handle().plugin(
                        tauri_plugin_log::Builder::default()
                            .level(log::LevelFilter::Info)
                            .build(),
                    )?;
                }

                let config = GameConfig::load_or_default(&app.path().app_config_dir()?.join(CONFIG_FILE));
                let store = JsonFileStore::in_dir(&app.path().app_data_dir()?);
                log::info!("Best score stored at {}", store.path().display());

                app.manage(create_shared_engine(GameEngine::new(config, Box::new(store))));
                app.manage(MountSlot::default());
                log::info!("Turbo Race initialized");
                Ok(())
            })
            .on_window_event(|window, event| {
                if let tauri::WindowEvent::Destroyed = event {
                    let slot = window.state::<MountSlot>();
                    let mount = slot.lock().ok().and_then(|mut slot| slot.take());
                    drop(mount);
                }
            })
            .invoke_handler(tauri::generate_handler![
                mount_surface,
                unmount_surface,
                key_down,
                toggle_play,
                resize,
                tick,
                get_snapshot,
                get_stats,
                get_best_score,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    desktop::run()
}
