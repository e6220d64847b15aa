use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use flipclock_core::{
    ClockModel, JsonFileBackend, MemoryBackend, PreferenceBackend, Preferences, SystemClock,
    ThemeRegistry,
};
use flipclock_engine::device::GpuInit;
use flipclock_engine::text::{FontId, FontSystem};
use flipclock_engine::window::{Runtime, RuntimeConfig};

use crate::app::ClockApp;

/// Window and storage configuration for the clock, consumed by [`run`].
///
/// ```rust,ignore
/// Application::new()
///     .title("flipclock")
///     .font(fonts::load_system_font())
///     .run()?;
/// ```
///
/// [`run`]: Application::run
pub struct Application {
    title: String,
    width: f64,
    height: f64,
    fonts: Vec<Vec<u8>>,
    preferences_path: Option<PathBuf>,
    fullscreen: bool,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title: "flipclock".to_string(),
            width: 820.0,
            height: 560.0,
            fonts: Vec::new(),
            preferences_path: None,
            fullscreen: false,
        }
    }

    /// Base window title; announcements are appended to it.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Registers a font candidate. The first one that parses is used for
    /// every label. Empty byte slices are skipped.
    pub fn font(mut self, data: Vec<u8>) -> Self {
        if !data.is_empty() {
            self.fonts.push(data);
        }
        self
    }

    /// Where preferences are stored. Without one they live in memory only.
    pub fn preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = Some(path.into());
        self
    }

    pub fn fullscreen(mut self, on: bool) -> Self {
        self.fullscreen = on;
        self
    }

    /// Opens the window and runs the clock until it is closed.
    pub fn run(self) -> Result<()> {
        let (fonts, font) = load_fonts(&self.fonts);
        let backend = self.preference_backend();
        let model = ClockModel::new(
            SystemClock,
            Preferences::new(backend),
            ThemeRegistry::builtin(),
        );

        let config = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
            start_fullscreen: self.fullscreen,
            ..RuntimeConfig::default()
        };

        let app = ClockApp::new(self.title, model, fonts, font);
        Runtime::run(config, GpuInit::default(), app)
    }

    fn preference_backend(&self) -> Box<dyn PreferenceBackend> {
        match &self.preferences_path {
            Some(path) => {
                log::info!("preferences: {}", path.display());
                Box::new(JsonFileBackend::new(path))
            }
            None => {
                log::warn!("no preferences path; settings will not persist");
                Box::new(MemoryBackend::new())
            }
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

fn load_fonts(candidates: &[Vec<u8>]) -> (FontSystem, Option<FontId>) {
    let mut fonts = FontSystem::new();
    let mut default = None;
    for bytes in candidates {
        match fonts.load_font(bytes) {
            Ok(id) => {
                default.get_or_insert(id);
            }
            Err(e) => log::warn!("skipping font: {e}"),
        }
    }
    if default.is_none() {
        log::warn!("no usable font; numerals and labels will not be drawn");
    }
    (fonts, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_font_data_is_not_registered() {
        let app = Application::new().font(Vec::new());
        assert!(app.fonts.is_empty());
    }

    #[test]
    fn unparseable_fonts_leave_no_default() {
        let (fonts, font) = load_fonts(&[vec![1, 2, 3]]);
        assert!(fonts.is_empty());
        assert!(font.is_none());
    }

    #[test]
    fn preferences_path_is_recorded() {
        let app = Application::new().preferences_path("/tmp/flipclock-test.json");
        assert_eq!(
            app.preferences_path.as_deref(),
            Some(std::path::Path::new("/tmp/flipclock-test.json"))
        );
    }
}
