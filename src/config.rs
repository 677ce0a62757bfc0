//! drm-info configuration
//!
//! Optional TOML file, e.g. `~/.config/drm-info/config.toml`:
//!
//! ```toml
//! output = "stderr"
//! log_filter = "debug"
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where the report is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Stdout,
    Stderr,
}

impl Destination {
    /// Locked handle to the selected stream
    pub fn writer(self) -> Box<dyn Write> {
        match self {
            Destination::Stdout => Box::new(io::stdout().lock()),
            Destination::Stderr => Box::new(io::stderr().lock()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report destination
    pub output: Destination,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok()
            .map(|dir| dir.join("drm-info/config.toml"))
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the default config file, falling back to defaults
    ///
    /// A file that exists but cannot be used is handed back alongside the
    /// defaults; logging is not set up yet when this runs.
    pub fn load() -> (Self, Option<Error>) {
        Self::load_from(Self::default_path())
    }

    fn load_from(path: Option<PathBuf>) -> (Self, Option<Error>) {
        match path {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            },
            _ => (Self::default(), None),
        }
    }
}
