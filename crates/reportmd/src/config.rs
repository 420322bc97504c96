//! Configuration for the reportmd CLI.
//!
//! Parses `reportmd.toml` with serde and auto-discovers the file in the
//! current directory and its parents. CLI flags take precedence over
//! file values; every field is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "reportmd.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk shape: a single optional `[render]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    render: RenderSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RenderSection {
    base_url: Option<String>,
    out_dir: Option<PathBuf>,
}

/// Loaded configuration with paths resolved against the config file's
/// directory.
#[derive(Debug, Default)]
pub(crate) struct Config {
    /// Default base URL for link and image resolution.
    pub base_url: Option<String>,
    /// Default output directory for rendered fragments.
    pub out_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `config_path` must exist. Without one, `reportmd.toml`
    /// is discovered in the current directory and its parents, and
    /// absence simply means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if a config
    /// file cannot be read or parsed.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load from a specific file, resolving `out_dir` against its parent
    /// directory.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        Ok(Self {
            base_url: file.render.base_url,
            out_dir: file.render.out_dir.map(|dir| config_dir.join(dir)),
        })
    }
}
