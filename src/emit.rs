//! Rust constant-table output
//!
//! One `nr.rs` per architecture:
//!
//! ```text
//! /* automatically generated by nrgen */
//!
//! pub const READ: usize = 0;
//! pub const WRITE: usize = 1;
//! ```

use crate::error::{NrError, Result};
use crate::resolve::NumberTable;
use std::fs;
use std::path::{Path, PathBuf};

/// First line of every generated file
pub const GENERATED_HEADER: &str = "/* automatically generated by nrgen */";

/// File name written inside each architecture directory
pub const ARTIFACT_NAME: &str = "nr.rs";

/// Render a table as Rust constant declarations
pub fn render_table(table: &NumberTable) -> Result<String> {
    let mut out = String::with_capacity(64 + table.len() * 40);
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");

    let mut previous: Option<String> = None;
    for (name, value) in table.sorted_entries() {
        let constant = name.to_ascii_uppercase();
        if previous.as_deref() == Some(constant.as_str()) {
            return Err(NrError::DuplicateConstant {
                arch: table.arch().to_string(),
                name: constant,
            });
        }
        out.push_str(&format!("pub const {constant}: usize = {value};\n"));
        previous = Some(constant);
    }

    Ok(out)
}

/// `<out_dir>/<label>/nr.rs`
pub fn artifact_path(out_dir: &Path, label: &str) -> PathBuf {
    out_dir.join(label).join(ARTIFACT_NAME)
}

/// Render a table's artifact, or `None` for an empty table
pub fn render_artifact(table: &NumberTable) -> Result<Option<String>> {
    if table.is_empty() {
        tracing::warn!("{}: no syscalls resolved, skipping", table.arch());
        return Ok(None);
    }
    render_table(table).map(Some)
}

/// Write already rendered contents to `<out_dir>/<label>/nr.rs`
pub fn write_rendered(out_dir: &Path, label: &str, contents: &str) -> Result<PathBuf> {
    let path = artifact_path(out_dir, label);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| NrError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, contents).map_err(|source| NrError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("{}: wrote {}", label, path.display());
    Ok(path)
}

/// Write a table's artifact, skipping empty tables
///
/// Returns the path written, or `None` when the table was empty.
pub fn write_table(out_dir: &Path, table: &NumberTable) -> Result<Option<PathBuf>> {
    render_artifact(table)?
        .map(|contents| write_rendered(out_dir, table.arch(), &contents))
        .transpose()
}
