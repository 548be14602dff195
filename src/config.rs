//! Store options and their JSON persistence.
//!
//! Options can come from a JSON file such as
//!
//! ```json
//! {
//!   "input_delimiter": ";",
//!   "output_delimiter": ",",
//!   "delimited_layout": "row_per_line",
//!   "skip_blank_lines": false
//! }
//! ```
//!
//! Any missing key takes its default value.

use crate::error::{Result, ResultExt as _, StoreError};
use crate::store::DelimitedLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DELIMITER: &str = ",";

/// Environment variable consulted by the CLI for the input delimiter.
pub const DELIMITER_ENV: &str = "TABSTORE_DELIMITER";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreOptions {
    /// Separator used to split source lines and delimiter-joined arguments.
    pub input_delimiter: String,
    /// Separator written between fields of delimited output.
    pub output_delimiter: String,
    pub delimited_layout: DelimitedLayout,
    /// Ignore blank source lines after the header instead of parsing them as
    /// rows. Off by default: a blank line is an empty value in a one-column
    /// table.
    pub skip_blank_lines: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            input_delimiter: DEFAULT_DELIMITER.to_owned(),
            output_delimiter: DEFAULT_DELIMITER.to_owned(),
            delimited_layout: DelimitedLayout::default(),
            skip_blank_lines: false,
        }
    }
}

impl StoreOptions {
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDelimiter`] if either delimiter is empty.
    pub fn validate(&self) -> Result<()> {
        validate_delimiter(&self.input_delimiter)?;
        validate_delimiter(&self.output_delimiter)
    }
}

pub(crate) fn validate_delimiter(delimiter: &str) -> Result<()> {
    if delimiter.is_empty() {
        return Err(StoreError::InvalidDelimiter(delimiter.to_owned()));
    }
    Ok(())
}

/// Load options from a JSON file and validate them.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid JSON, or names an
/// empty delimiter.
pub fn load_options(path: &Path) -> Result<StoreOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {}", path.display()))?;
    let options: StoreOptions = serde_json::from_str(&content)?;
    options.validate()?;
    log::debug!("Loaded store options from {}", path.display());
    Ok(options)
}

/// Write options as pretty JSON, creating the parent directory if needed.
///
/// # Errors
///
/// Returns error if the directory or file cannot be written.
pub fn save_options(options: &StoreOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(options)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write options file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = StoreOptions::default();
        assert_eq!(options.input_delimiter, ",");
        assert_eq!(options.output_delimiter, ",");
        assert_eq!(options.delimited_layout, DelimitedLayout::RowPerLine);
        assert!(!options.skip_blank_lines);
    }

    #[test]
    fn test_partial_file_takes_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "input_delimiter": ";" }"#)?;

        let options = load_options(&path)?;
        assert_eq!(options.input_delimiter, ";");
        assert_eq!(options.output_delimiter, ",");
        Ok(())
    }

    #[test]
    fn test_empty_delimiter_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "output_delimiter": "" }"#)?;

        let err = load_options(&path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDelimiter(_)));
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("options.json");
        let options = StoreOptions {
            input_delimiter: "\t".to_owned(),
            delimited_layout: DelimitedLayout::ValuePerLine,
            ..StoreOptions::default()
        };

        save_options(&options, &path)?;
        assert_eq!(load_options(&path)?, options);
        Ok(())
    }
}
