//! Persisted user preferences.
//!
//! Storage sits behind [`PreferenceBackend`]; [`Preferences`] adds the typed
//! keys and the fail-soft policy (reads fall back to defaults, failed writes
//! are logged and dropped).

mod backend;
mod store;

pub use backend::{
    JsonFileBackend, MemoryBackend, PREFS_PATH_ENV, PreferenceBackend, PreferenceError,
};
pub use store::{FORMAT_KEY, Preferences, THEME_INDEX_KEY, VIEW_KEY};
