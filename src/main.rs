#![windows_subsystem = "windows"]

use anyhow::Result;
use druid::{AppLauncher, WindowDesc};
use log::{info, warn};

mod actions;
mod app;
mod capture;
mod config;
mod error;
mod export;
mod hotkeys;
mod launcher;
mod overlay;
mod selection;
mod selection_logic;
mod tray;

use app::{AppState, Delegate};
use config::Config;

fn main() -> Result<()> {
    let loaded = config::load();
    let level = loaded.as_ref().map(|c| c.log_level).unwrap_or_default();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_filter()))
        .init();
    let config = loaded.unwrap_or_else(|e| {
        warn!("Config not loaded, using defaults: {}", e);
        Config::default()
    });

    let window = WindowDesc::new(launcher::build())
        .title("regionshot")
        .window_size((320.0, 110.0))
        .resizable(false);
    let launcher_id = window.id;

    let app = AppLauncher::with_window(window).delegate(Delegate::new(config.clone(), launcher_id));
    // keep the tray and the shortcut alive until launch() returns
    let _tray = if config.launcher.tray_enabled {
        tray::spawn(app.get_external_handle())
    } else {
        None
    };
    let shortcut = match hotkeys::register(&config.launcher.shortcut, app.get_external_handle()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Global shortcut disabled: {}", e);
            None
        }
    };
    let hint = match &shortcut {
        Some(s) => format!("Press {} or click New capture", s.label()),
        None => "Click New capture".to_string(),
    };

    info!("regionshot started");
    let init = AppState {
        status: hint,
        overlay_visible: false,
    };
    app.launch(init)?;
    Ok(())
}
