//! File plumbing around [`TabularStore`].
//!
//! The store itself only reads and produces text. This module is the thin
//! layer that moves that text to and from disk.

use crate::config::StoreOptions;
use crate::error::{Result, ResultExt as _};
use crate::store::TabularStore;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

/// Output target for [`save_store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Delimited,
    StructuredDocument,
}

impl OutputFormat {
    /// `.json` files get the structured document, everything else delimited text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Self::StructuredDocument,
            _ => Self::Delimited,
        }
    }
}

/// Read a whole source file into memory.
///
/// # Errors
///
/// Returns error if the file cannot be opened or is not valid UTF-8.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))
}

/// Load a store from `path` using `options`.
///
/// # Errors
///
/// Returns error if the file cannot be read or its contents do not parse.
pub fn load_store(path: &Path, options: StoreOptions) -> Result<TabularStore> {
    let text = read_source(path)?;
    let store = TabularStore::from_source(&text, options)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!(
        "Loaded {} ({} rows, {} columns)",
        path.display(),
        store.row_count(),
        store.column_count()
    );
    Ok(store)
}

/// Write `store` to `path` in `format`.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn save_store(store: &TabularStore, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Delimited => store.write_delimited(&mut writer)?,
        OutputFormat::StructuredDocument => store.write_structured_document(&mut writer)?,
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush output file: {}", path.display()))?;

    log::info!("Wrote {} rows to {} ({format:?})", store.row_count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("out.JSON")),
            OutputFormat::StructuredDocument
        );
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("out.tsv")),
            OutputFormat::Delimited
        );
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("out")),
            OutputFormat::Delimited
        );
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("people.csv");

        let mut store = TabularStore::with_header(["id", "name"], ",")?;
        store.add_row(["1", "Alice"])?;
        save_store(&store, &path, OutputFormat::Delimited)?;

        let loaded = load_store(&path, StoreOptions::default())?;
        assert_eq!(loaded, store);
        Ok(())
    }

    #[test]
    fn test_missing_source_names_path() {
        let err = read_source(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, StoreError::Other(_)));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }

    #[test]
    fn test_empty_file_is_empty_source() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "")?;

        let err = load_store(&path, StoreOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no header line"));
        Ok(())
    }
}
