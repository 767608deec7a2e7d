//! Run settings shared by every engine
//!
//! Settings are built once per command invocation and handed to each
//! engine constructor. They can be loaded from a TOML file; every field is
//! optional there.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Default value functions for serde
fn default_config_suffix() -> String {
    "_rgb_nodes.txt".to_string()
}
fn default_scratch_suffix() -> String {
    "_temp.txt".to_string()
}
fn default_backup_suffix() -> String {
    ".bak".to_string()
}
fn default_extensions() -> Vec<String> {
    vec!["wrl".to_string()]
}

/// How much detail to report for each processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Outcome only
    Brief,
    /// Outcome plus the error message
    #[default]
    Normal,
    /// Outcome, error message, error class and debug logging
    Verbose,
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brief" => Ok(Verbosity::Brief),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            _ => Err(format!(
                "Invalid verbosity '{s}'. Valid values: brief, normal, verbose"
            )),
        }
    }
}

/// Settings for one command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Appended to a document path to name its default companion config
    #[serde(default = "default_config_suffix")]
    pub config_suffix: String,
    /// Appended to a document path to name its scratch file
    #[serde(default = "default_scratch_suffix")]
    pub scratch_suffix: String,
    /// Appended to a document path to name the transient backup
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    /// Extensions picked up when a directory is expanded; empty means all
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            config_suffix: default_config_suffix(),
            scratch_suffix: default_scratch_suffix(),
            backup_suffix: default_backup_suffix(),
            extensions: default_extensions(),
        }
    }
}

impl Settings {
    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wrlrgb").join("settings.toml"))
    }

    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| Error::InvalidSettings {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load the settings file from the platform config directory, or defaults.
    pub fn discover() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Default companion config path for a document.
    pub fn config_path_for(&self, document: &Path) -> PathBuf {
        with_suffix(document, &self.config_suffix)
    }

    /// Scratch path for a document.
    pub fn scratch_path_for(&self, document: &Path) -> PathBuf {
        with_suffix(document, &self.scratch_suffix)
    }

    /// Backup path for a document.
    pub fn backup_path_for(&self, document: &Path) -> PathBuf {
        with_suffix(document, &self.backup_suffix)
    }

    /// Whether a file found while expanding a directory should be processed.
    pub fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').to_lowercase() == ext)
    }
}

/// Append a suffix to the full path (`a.wrl` + `.bak` -> `a.wrl.bak`).
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
