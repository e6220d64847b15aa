#![allow(dead_code)]

use std::time::{Duration, Instant};

use flipclock_core::{
    ClockModel, ManualClock, MemoryBackend, PlatformError, PlatformSurface, Preferences, Theme,
    ThemeRegistry, TimeSample,
};

/// Records every call the model makes on the platform.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub palettes: Vec<String>,
    pub fullscreen: bool,
    pub announcements: Vec<String>,
}

impl PlatformSurface for RecordingSurface {
    fn apply_palette(&mut self, theme: &Theme) {
        self.palettes.push(theme.name.to_owned());
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<(), PlatformError> {
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), PlatformError> {
        self.fullscreen = false;
        Ok(())
    }

    fn announce(&mut self, text: &str) {
        self.announcements.push(text.to_owned());
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

pub fn at(h: u8, m: u8, s: u8, ms: u16) -> TimeSample {
    TimeSample::new(h, m, s, ms).unwrap()
}

pub struct Harness {
    pub clock: ManualClock,
    pub model: ClockModel<ManualClock, MemoryBackend>,
    pub surface: RecordingSurface,
    pub t0: Instant,
}

impl Harness {
    /// Starts a model at `start` wall time with the given stored preferences.
    pub fn start(start: TimeSample, backend: MemoryBackend) -> Self {
        let clock = ManualClock::new(start);
        let mut model =
            ClockModel::new(clock.clone(), Preferences::new(backend), ThemeRegistry::builtin());
        let mut surface = RecordingSurface::default();
        let t0 = Instant::now();
        model.start(t0, &mut surface);
        Self {
            clock,
            model,
            surface,
            t0,
        }
    }

    /// Sets the wall clock and fires everything due at `t0 + elapsed_since_start`.
    pub fn step(&mut self, elapsed_since_start: Duration, wall: TimeSample) -> bool {
        self.clock.set(wall);
        self.model.advance(self.t0 + elapsed_since_start, &mut self.surface)
    }
}
