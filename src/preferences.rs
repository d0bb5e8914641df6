use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// The one persisted user preference: which temperature unit to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference {
    pub use_celsius: bool,
}

impl Default for Preference {
    fn default() -> Self {
        Self { use_celsius: true }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
    #[error("failed to read preference file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write preference file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preference file {path} is malformed")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize preferences")]
    Serialize(#[from] toml::ser::Error),
}

// On-disk shape:
//
//   [Settings]
//   TemperatureUnit = "True"
//
#[derive(Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(rename = "Settings")]
    settings: Settings,
}

#[derive(Serialize, Deserialize)]
struct Settings {
    #[serde(rename = "TemperatureUnit", with = "text_bool")]
    use_celsius: bool,
}

mod text_bool {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(D::Error::custom(format!(
                "expected \"True\" or \"False\", got {other:?}"
            ))),
        }
    }
}

/// Loads and saves the temperature unit preference at a fixed path under the
/// user's configuration directory. The file is rewritten in full on every
/// save; there is no fallback storage, so write failures are unrecoverable.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join("fan-indicator").join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted preference. A missing file is created with the
    /// default before returning, so a second load observes the same value.
    pub fn load(&self) -> Result<Preference, ConfigError> {
        if !self.path.exists() {
            let preference = Preference::default();
            self.save(&preference)?;
            info!(path = %self.path.display(), "created preference file with defaults");
            return Ok(preference);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: PreferenceFile =
            toml::from_str(&contents).map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(Preference {
            use_celsius: file.settings.use_celsius,
        })
    }

    pub fn save(&self, preference: &Preference) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let file = PreferenceFile {
            settings: Settings {
                use_celsius: preference.use_celsius,
            },
        };
        let contents = toml::to_string_pretty(&file)?;
        fs::write(&self.path, contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(name: &str) -> PreferenceStore {
        let dir = std::env::temp_dir().join(format!(
            "fan-indicator-prefs-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        PreferenceStore::new(dir.join("preferences.toml"))
    }

    #[test]
    fn load_on_missing_file_creates_default() {
        let store = scratch_store("missing");

        let first = store.load().unwrap();
        assert!(first.use_celsius);
        assert!(store.path().exists());

        let second = store.load().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = scratch_store("round-trip");

        store.save(&Preference { use_celsius: false }).unwrap();
        assert!(!store.load().unwrap().use_celsius);

        store.save(&Preference { use_celsius: true }).unwrap();
        assert!(store.load().unwrap().use_celsius);
    }

    #[test]
    fn file_holds_true_false_strings() {
        let store = scratch_store("format");

        store.save(&Preference { use_celsius: true }).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("[Settings]"));
        assert!(contents.contains("TemperatureUnit = \"True\""));

        store.save(&Preference { use_celsius: false }).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("TemperatureUnit = \"False\""));
    }

    #[test]
    fn malformed_file_is_reported() {
        let store = scratch_store("malformed");
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[Settings]\nTemperatureUnit = \"Maybe\"\n").unwrap();

        assert!(matches!(store.load(), Err(ConfigError::Malformed { .. })));
    }
}
