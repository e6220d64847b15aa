mod app;
mod application;
mod fonts;
mod input;
mod painters;
mod surface;

use flipclock_core::JsonFileBackend;
use flipclock_engine::logging::{LoggingConfig, init_logging};

use crate::application::Application;

/// Set to `1` to open borderless fullscreen.
const FULLSCREEN_ENV: &str = "FLIPCLOCK_FULLSCREEN";

fn main() {
    init_logging(LoggingConfig::default());

    let mut app = Application::new()
        .title("flipclock")
        .size(820.0, 560.0)
        .font(fonts::load_system_font())
        .fullscreen(std::env::var(FULLSCREEN_ENV).is_ok_and(|v| v == "1"));

    if let Some(path) = JsonFileBackend::default_path() {
        app = app.preferences_path(path);
    }

    if let Err(err) = app.run() {
        eprintln!("flipclock: {err:#}");
        std::process::exit(1);
    }
}
