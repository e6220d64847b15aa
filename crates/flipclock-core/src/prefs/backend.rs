use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that overrides the preference file location.
pub const PREFS_PATH_ENV: &str = "FLIPCLOCK_PREFS";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage is unavailable: {0}")]
    Unavailable(String),

    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a valid preference file")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value storage.
pub trait PreferenceBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl<T: PreferenceBackend + ?Sized> PreferenceBackend for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set(key, value)
    }
}

/// In-memory backend. Can be told to fail, to exercise the fallback paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        if self.fail_reads {
            return Err(PreferenceError::Unavailable(format!("read of {key} refused")));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if self.fail_writes {
            return Err(PreferenceError::Unavailable(format!("write of {key} refused")));
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Flat JSON object on disk, e.g. `{"clockView": "digital"}`.
///
/// The file is re-read on every access and replaced atomically on write.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$FLIPCLOCK_PREFS`, else `<config dir>/flipclock/preferences.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(PREFS_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join("flipclock").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| PreferenceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let text = serde_json::to_string_pretty(values).map_err(|source| PreferenceError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = match self.load() {
            Ok(values) => values,
            Err(e @ PreferenceError::Malformed { .. }) => {
                log::warn!("replacing unreadable preferences: {e}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_owned(), value.to_owned());
        self.store(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_backend_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("prefs.json"));
        assert_eq!(backend.get("clockView").unwrap(), None);
    }

    #[test]
    fn json_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut backend = JsonFileBackend::new(&path);
        backend.set("clockView", "digital").unwrap();
        backend.set("clockIs24Hour", "true").unwrap();

        let reopened = JsonFileBackend::new(&path);
        assert_eq!(reopened.get("clockView").unwrap().as_deref(), Some("digital"));
        assert_eq!(reopened.get("clockIs24Hour").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn json_backend_reports_malformed_file_and_recovers_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let mut backend = JsonFileBackend::new(&path);
        assert!(matches!(
            backend.get("clockView"),
            Err(PreferenceError::Malformed { .. })
        ));

        backend.set("clockView", "analogue").unwrap();
        assert_eq!(backend.get("clockView").unwrap().as_deref(), Some("analogue"));
    }

    #[test]
    fn memory_backend_failure_injection() {
        let mut b = MemoryBackend::new().with_value("k", "v").failing_reads();
        assert!(b.get("k").is_err());
        assert!(b.set("k", "w").is_ok());
        assert_eq!(b.raw("k"), Some("w"));

        let mut b = MemoryBackend::new().failing_writes();
        assert!(b.set("k", "v").is_err());
        assert_eq!(b.raw("k"), None);
    }
}
