use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How bulk construction treats an id that occurs more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later record replaces the earlier one.
    #[default]
    Replace,
    /// Construction fails.
    Reject,
}

/// Configuration for building and validating a tree store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// What to do when the input repeats an id.
    pub duplicate_ids: DuplicatePolicy,

    /// Whether records with a missing parent are acceptable.
    ///
    /// When `false`, validation reports every orphan as an issue.
    pub allow_orphans: bool,

    /// Whether parent links are allowed to form cycles.
    ///
    /// Queries that walk the hierarchy do not terminate on cyclic input, so
    /// this should only be enabled for data that is never walked. When
    /// `false`, the command-line front end refuses to open cyclic input and
    /// validation reports every cycle as an issue.
    pub allow_cycles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duplicate_ids: DuplicatePolicy::default(),
            allow_orphans: default_allow_orphans(),
            allow_cycles: false,
        }
    }
}

/// Errors that can occur when loading or saving a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] io::Error),
    /// The file is not valid configuration.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] io::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }
}

const fn default_allow_orphans() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        duplicate_ids: DuplicatePolicy,

        #[serde(default = "default_allow_orphans")]
        allow_orphans: bool,

        #[serde(default)]
        allow_cycles: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                duplicate_ids,
                allow_orphans,
                allow_cycles,
            } => Self {
                duplicate_ids,
                allow_orphans,
                allow_cycles,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            duplicate_ids: config.duplicate_ids,
            allow_orphans: config.allow_orphans,
            allow_cycles: config.allow_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nduplicate_ids = \"reject\"\nallow_orphans = false\nallow_cycles = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.duplicate_ids, DuplicatePolicy::Reject);
        assert!(!config.allow_orphans);
        assert!(config.allow_cycles);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read(_)));
        assert!(error.to_string().starts_with("failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nduplicate_ids = \"sometimes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tree-store.toml");
        let config = Config {
            duplicate_ids: DuplicatePolicy::Reject,
            allow_orphans: false,
            allow_cycles: false,
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
