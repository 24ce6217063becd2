//! Persistence of finished supplements
//!
//! The supplement is stamped with identifiers derived from the CodeSystem
//! metadata and written to `{target_folder}/{name}.json`. Existing files are
//! replaced; the content goes to a temporary sibling first and is renamed into
//! place, so an interrupted write leaves the previous file intact.

use crate::error::TranslateError;
use crate::metadata::CodeSystemMetadata;
use crate::models::SupplementDocument;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CANONICAL_BASE: &str = "https://fdpg.de/fhir/CodeSystem";
const ID_PREFIX: &str = "fdpg-supplement-codesystem";

/// Overwrite the identifying fields of the supplement
pub fn finalize(document: &mut SupplementDocument, metadata: &CodeSystemMetadata) {
    let name = &metadata.name;
    let count = document.group_count();
    document.set("title", format!("{name} Supplement gebunden an CS-Version"));
    document.set("id", format!("{ID_PREFIX}-{name}"));
    document.set("url", format!("{CANONICAL_BASE}/{name}/translations"));
    document.set("supplements", metadata.supplements());
    document.set("count", count);
    document.set("name", format!("{name}_supplement"));
}

/// Path the supplement for `metadata` is written to
pub fn output_path(target_folder: &Path, metadata: &CodeSystemMetadata) -> PathBuf {
    target_folder.join(format!("{}.json", metadata.name))
}

/// Finalize and write the supplement, returning the written path
pub fn save(
    document: &mut SupplementDocument,
    metadata: &CodeSystemMetadata,
    target_folder: &Path,
) -> Result<PathBuf> {
    finalize(document, metadata);

    fs::create_dir_all(target_folder)
        .map_err(|e| TranslateError::io_error(target_folder, e))?;

    let path = output_path(target_folder, metadata);
    let tmp_path = target_folder.join(format!(".{}.json.tmp", metadata.name));
    let content = document.to_json()?;

    fs::write(&tmp_path, content).map_err(|e| TranslateError::io_error(&tmp_path, e))?;
    fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        TranslateError::io_error(&path, e)
    })?;

    info!(
        "Translated {}. Saved at {}",
        metadata.name,
        path.display()
    );
    Ok(path)
}
