use super::PreferenceBackend;
use crate::view::ClockView;

pub const THEME_INDEX_KEY: &str = "clockThemeIndex";
pub const VIEW_KEY: &str = "clockView";
pub const FORMAT_KEY: &str = "clockIs24Hour";

/// Typed, fail-soft access to the three clock preferences.
///
/// No operation here returns an error: unreadable or invalid values read as
/// the default, and failed writes are logged.
#[derive(Debug)]
pub struct Preferences<B> {
    backend: B,
}

impl<B: PreferenceBackend> Preferences<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored theme index, `0` if missing or not a non-negative integer.
    ///
    /// Range checking against the registry is the caller's job.
    pub fn theme_index(&self) -> usize {
        let Some(raw) = self.read(THEME_INDEX_KEY) else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {THEME_INDEX_KEY} value {raw:?}");
            0
        })
    }

    pub fn set_theme_index(&mut self, index: usize) {
        self.write(THEME_INDEX_KEY, &index.to_string());
    }

    pub fn view(&self) -> ClockView {
        let Some(raw) = self.read(VIEW_KEY) else {
            return ClockView::default();
        };
        raw.parse().unwrap_or_else(|e| {
            log::warn!("ignoring {VIEW_KEY}: {e}");
            ClockView::default()
        })
    }

    pub fn set_view(&mut self, view: ClockView) {
        self.write(VIEW_KEY, view.as_str());
    }

    /// `true` only for the exact stored string `"true"`.
    pub fn use_24_hour(&self) -> bool {
        self.read(FORMAT_KEY).as_deref() == Some("true")
    }

    pub fn set_use_24_hour(&mut self, value: bool) {
        self.write(FORMAT_KEY, if value { "true" } else { "false" });
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("could not read preference {key}: {e}");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        match self.backend.set(key, value) {
            Ok(()) => log::debug!("saved {key}={value}"),
            Err(e) => log::error!("could not save preference {key}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryBackend;

    #[test]
    fn defaults_when_empty() {
        let p = Preferences::new(MemoryBackend::new());
        assert_eq!(p.theme_index(), 0);
        assert_eq!(p.view(), ClockView::Analogue);
        assert!(!p.use_24_hour());
    }

    #[test]
    fn reads_stored_values() {
        let p = Preferences::new(
            MemoryBackend::new()
                .with_value(THEME_INDEX_KEY, "3")
                .with_value(VIEW_KEY, "digital")
                .with_value(FORMAT_KEY, "true"),
        );
        assert_eq!(p.theme_index(), 3);
        assert_eq!(p.view(), ClockView::Digital);
        assert!(p.use_24_hour());
    }

    #[test]
    fn invalid_values_fall_back() {
        let p = Preferences::new(
            MemoryBackend::new()
                .with_value(THEME_INDEX_KEY, "-1")
                .with_value(VIEW_KEY, "sundial")
                .with_value(FORMAT_KEY, "yes"),
        );
        assert_eq!(p.theme_index(), 0);
        assert_eq!(p.view(), ClockView::Analogue);
        assert!(!p.use_24_hour());
    }

    #[test]
    fn failing_reads_yield_defaults() {
        let p = Preferences::new(
            MemoryBackend::new()
                .with_value(VIEW_KEY, "digital")
                .failing_reads(),
        );
        assert_eq!(p.view(), ClockView::Analogue);
        assert_eq!(p.theme_index(), 0);
    }

    #[test]
    fn failing_writes_are_swallowed() {
        let mut p = Preferences::new(MemoryBackend::new().failing_writes());
        p.set_theme_index(2);
        p.set_view(ClockView::Digital);
        p.set_use_24_hour(true);
        assert_eq!(p.backend().raw(THEME_INDEX_KEY), None);
    }

    #[test]
    fn writes_use_string_forms() {
        let mut p = Preferences::new(MemoryBackend::new());
        p.set_theme_index(4);
        p.set_view(ClockView::Digital);
        p.set_use_24_hour(false);
        let b = p.backend();
        assert_eq!(b.raw(THEME_INDEX_KEY), Some("4"));
        assert_eq!(b.raw(VIEW_KEY), Some("digital"));
        assert_eq!(b.raw(FORMAT_KEY), Some("false"));
    }
}
