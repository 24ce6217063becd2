//! List Command - generate a value-set list from a folder
//!
//! Every `*.json` file directly inside the folder becomes one entry with the
//! given source language. The output is sorted by path.

use colored::Colorize;
use std::path::Path;
use tracing::info;
use vstrans_core::{Result, discover_value_set_files, write_value_set_list};

/// Execute the list command
pub fn list_command(folder: &Path, output: &Path, source_lang: &str) -> Result<()> {
    let entries = discover_value_set_files(folder, source_lang)?;
    write_value_set_list(output, &entries)?;

    info!(
        "Wrote {} ValueSets from {} to {}",
        entries.len(),
        folder.display(),
        output.display()
    );
    println!(
        "{} {} entries written to {}",
        "✅".green(),
        entries.len(),
        output.display()
    );
    Ok(())
}
