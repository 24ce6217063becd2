//! Configuration file discovery and loading

use super::run_config::RunConfig;
use crate::error::TranslateError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: &[&str] = &[".vstransrc.json", ".vstransrc.toml", "vstrans.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches for `.vstransrc.json`, `.vstransrc.toml` and `vstrans.json`
    /// (in that order) in each directory up to the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| TranslateError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// Supports TOML (.toml) and JSON (everything else)
    pub fn load_from_file(path: &Path) -> Result<RunConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        let parsed = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|e| {
            TranslateError::config_error(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the first config found from
    /// `start_dir` upward is used, and defaults apply when there is none.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<RunConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(TranslateError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(RunConfig::default()),
        }
    }
}
