//! Value-set list files
//!
//! A run is driven by a JSON array of `{url, source_lang}` entries. `url` is
//! either a local expansion file or a canonical ValueSet URL.

use crate::error::TranslateError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One ValueSet to translate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValueSetEntry {
    pub url: String,
    pub source_lang: String,
}

impl ValueSetEntry {
    pub fn new(url: impl Into<String>, source_lang: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_lang: source_lang.into(),
        }
    }
}

/// Read a value-set list file
pub fn load_value_set_list(path: &Path) -> Result<Vec<ValueSetEntry>> {
    let content = fs::read_to_string(path).map_err(|e| TranslateError::io_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        TranslateError::config_error(format!(
            "Invalid value-set list '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Entries for every `*.json` file directly inside `folder`, sorted by path
pub fn discover_value_set_files(folder: &Path, source_lang: &str) -> Result<Vec<ValueSetEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(folder).map_err(|e| TranslateError::io_error(folder, e))? {
        let path = entry.map_err(|e| TranslateError::io_error(folder, e))?.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        if path.is_file() && is_json {
            entries.push(ValueSetEntry::new(
                path.to_string_lossy().into_owned(),
                source_lang,
            ));
        }
    }
    entries.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(entries)
}

/// Write a value-set list as compact UTF-8 JSON
pub fn write_value_set_list(path: &Path, entries: &[ValueSetEntry]) -> Result<()> {
    let content = serde_json::to_string(entries)?;
    fs::write(path, content).map_err(|e| TranslateError::io_error(path, e))
}
