//! The in-memory tabular store.
//!
//! A [`TabularStore`] owns an ordered header and a list of rows. Every row
//! holds exactly one value per header column, in header order, at all times:
//! operations that would break that shape fail before touching any data.
//!
//! ```
//! use tabstore::TabularStore;
//!
//! let mut store = TabularStore::with_header(["id", "name"], ",")?;
//! store.add_row(["1", "Alice"])?.add_row_line("2,Bob")?;
//!
//! assert_eq!(store.row_count(), 2);
//! assert_eq!(store.get_column("name"), Some(vec!["Alice", "Bob"]));
//!
//! assert!(store.remove_all_rows_matching("name", "Alice"));
//! assert_eq!(store.get_row_at(0)?.get("id"), Some("2"));
//! # Ok::<(), tabstore::error::StoreError>(())
//! ```
//!
//! Row and column counts are derived from the collections themselves, never
//! tracked separately.

pub mod render;
pub mod row;

pub use render::DelimitedLayout;
pub use row::{Row, RowRef};

use crate::config::{StoreOptions, validate_delimiter};
use crate::error::{Result, StoreError};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularStore {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    options: StoreOptions,
}

impl TabularStore {
    /// Empty store with default options.
    ///
    /// ```
    /// use tabstore::TabularStore;
    ///
    /// let store = TabularStore::new();
    /// assert!(store.is_empty());
    /// assert_eq!(store.delimiter(), ",");
    /// assert_eq!((store.row_count(), store.column_count()), (0, 0));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store using `options`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDelimiter`] if a delimiter is empty.
    pub fn with_options(options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Store with the given header and input delimiter and no rows.
    ///
    /// # Errors
    ///
    /// Fails on an empty delimiter or a repeated column name.
    pub fn with_header<I, S>(names: I, delimiter: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_delimiter(delimiter)?;
        let header = collect_fields(names);
        ensure_unique(&header)?;
        Ok(Self {
            header,
            rows: Vec::new(),
            options: StoreOptions {
                input_delimiter: delimiter.to_owned(),
                ..StoreOptions::default()
            },
        })
    }

    /// Same as [`with_header`](Self::with_header) with the names joined by
    /// `delimiter` in a single string.
    ///
    /// # Errors
    ///
    /// Fails on an empty delimiter or a repeated column name.
    pub fn with_header_line(line: &str, delimiter: &str) -> Result<Self> {
        validate_delimiter(delimiter)?;
        Self::with_header(line.split(delimiter), delimiter)
    }

    /// Build a store from `options` and load `text` with the configured layout.
    ///
    /// # Errors
    ///
    /// See [`load_from_source_with_layout`](Self::load_from_source_with_layout).
    pub fn from_source(text: &str, options: StoreOptions) -> Result<Self> {
        let layout = options.delimited_layout;
        let mut store = Self::with_options(options)?;
        store.load_from_source_with_layout(text, layout)?;
        Ok(store)
    }

    /// Replace header and rows with the contents of `text`.
    ///
    /// The first line is the header; every following line is one row split by
    /// the input delimiter.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptySource`] if there is no header line,
    /// [`StoreError::DuplicateColumn`] for a repeated header name, and
    /// [`StoreError::ShapeMismatch`] for a row of the wrong width. The store is
    /// left untouched on error.
    pub fn load_from_source(&mut self, text: &str) -> Result<&mut Self> {
        self.load_from_source_with_layout(text, DelimitedLayout::RowPerLine)
    }

    /// Like [`load_from_source`](Self::load_from_source), reading rows laid
    /// out as `layout`.
    ///
    /// # Errors
    ///
    /// As [`load_from_source`](Self::load_from_source), plus
    /// [`StoreError::MalformedSource`] when a value-per-line row is truncated
    /// or not followed by a blank line.
    ///
    /// Both the header and the value-per-line suffixes are split with the
    /// input delimiter. Output written with a different output delimiter is
    /// read back after [`set_delimiter`](Self::set_delimiter) to match.
    pub fn load_from_source_with_layout(
        &mut self,
        text: &str,
        layout: DelimitedLayout,
    ) -> Result<&mut Self> {
        let mut lines = text.lines();
        let header_line = lines.next().ok_or(StoreError::EmptySource)?;

        let header = collect_fields(header_line.split(self.delimiter()));
        ensure_unique(&header)?;
        let mut staged = Self {
            header,
            rows: Vec::new(),
            options: self.options.clone(),
        };

        match layout {
            DelimitedLayout::RowPerLine => staged.load_row_lines(lines)?,
            DelimitedLayout::ValuePerLine => staged.load_value_lines(lines)?,
        }

        log::debug!(
            "Loaded {} rows with {} columns",
            staged.row_count(),
            staged.column_count()
        );
        self.header = staged.header;
        self.rows = staged.rows;
        Ok(self)
    }

    fn load_row_lines<'t>(&mut self, lines: impl Iterator<Item = &'t str>) -> Result<()> {
        for (offset, line) in lines.enumerate() {
            if line.is_empty() && self.options.skip_blank_lines {
                log::warn!("Skipping blank line {}", offset + 2);
                continue;
            }
            self.add_row_line(line)?;
        }
        Ok(())
    }

    // Each row is `column_count` value lines, then one blank line. Values
    // other than a row's last carry a trailing input delimiter.
    fn load_value_lines<'t>(&mut self, lines: impl Iterator<Item = &'t str>) -> Result<()> {
        let width = self.column_count();
        let separator = self.delimiter().to_owned();
        let mut lines = lines.enumerate().peekable();

        while lines.peek().is_some() {
            let mut values = Vec::with_capacity(width);
            for position in 0..width {
                let Some((offset, line)) = lines.next() else {
                    return Err(StoreError::MalformedSource {
                        line: row_start_line(self.rows.len(), width),
                        reason: format!("row ends after {position} of {width} values"),
                    });
                };
                let value = if position + 1 < width {
                    line.strip_suffix(separator.as_str()).ok_or_else(|| {
                        StoreError::MalformedSource {
                            line: offset + 2,
                            reason: format!("value is missing trailing {separator:?}"),
                        }
                    })?
                } else {
                    line
                };
                values.push(value.to_owned());
            }

            match lines.next() {
                None | Some((_, "")) => {}
                Some((offset, _)) => {
                    return Err(StoreError::MalformedSource {
                        line: offset + 2,
                        reason: "expected a blank line after the row".to_owned(),
                    });
                }
            }
            self.rows.push(values);
        }
        Ok(())
    }

    /// Change the delimiter used for later string-based parsing. Data already
    /// loaded is not re-split.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDelimiter`] for an empty delimiter.
    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) -> Result<&mut Self> {
        let delimiter = delimiter.into();
        validate_delimiter(&delimiter)?;
        self.options.input_delimiter = delimiter;
        Ok(self)
    }

    /// Change the separator written between fields of delimited output.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDelimiter`] for an empty delimiter.
    pub fn set_output_delimiter(&mut self, delimiter: impl Into<String>) -> Result<&mut Self> {
        let delimiter = delimiter.into();
        validate_delimiter(&delimiter)?;
        self.options.output_delimiter = delimiter;
        Ok(self)
    }

    /// Choose the layout used by [`render_delimited`](Self::render_delimited).
    pub fn set_delimited_layout(&mut self, layout: DelimitedLayout) -> &mut Self {
        self.options.delimited_layout = layout;
        self
    }

    /// Reset to an empty store with default options.
    pub fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
        self.options = StoreOptions::default();
    }

    /// Column names in order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Current delimiters, layout and blank-line handling.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Input delimiter used for parsing.
    pub fn delimiter(&self) -> &str {
        &self.options.input_delimiter
    }

    /// Separator written between fields of delimited output.
    pub fn output_delimiter(&self) -> &str {
        &self.options.output_delimiter
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, the length of the header.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// True when there is neither a header nor any row.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    // ------------------------------------------------------------------
    // Header

    /// Replace column names positionally, keeping every value in place.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShapeMismatch`] unless exactly `column_count` names are
    /// given, [`StoreError::DuplicateColumn`] for a repeated name.
    pub fn rename_header<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = collect_fields(names);
        self.check_width(names.len())?;
        ensure_unique(&names)?;
        log::debug!("Renamed header {:?} -> {names:?}", self.header);
        self.header = names;
        Ok(())
    }

    /// [`rename_header`](Self::rename_header) taking one delimiter-joined string.
    ///
    /// # Errors
    ///
    /// As [`rename_header`](Self::rename_header).
    pub fn rename_header_line(&mut self, line: &str) -> Result<()> {
        let names = self.split_line(line);
        self.rename_header(names)
    }

    // ------------------------------------------------------------------
    // Rows

    /// Append a row; values pair with header columns by position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeMismatch`] unless exactly `column_count`
    /// values are given.
    pub fn add_row<I, S>(&mut self, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = collect_fields(values);
        self.check_width(values.len())?;
        log::trace!("Adding row {}", self.rows.len());
        self.rows.push(values);
        Ok(self)
    }

    /// [`add_row`](Self::add_row) taking one delimiter-joined string.
    ///
    /// # Errors
    ///
    /// As [`add_row`](Self::add_row).
    pub fn add_row_line(&mut self, line: &str) -> Result<&mut Self> {
        let values = self.split_line(line);
        self.add_row(values)
    }

    /// Append a row, reporting failure as `false` instead of an error.
    pub fn try_add_row<I, S>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_row(values).is_ok()
    }

    /// [`try_add_row`](Self::try_add_row) for a delimiter-joined line.
    pub fn try_add_row_line(&mut self, line: &str) -> bool {
        self.add_row_line(line).is_ok()
    }

    /// Remove and return the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= row_count`.
    pub fn remove_row_at(&mut self, index: usize) -> Result<Row> {
        self.check_row_index(index)?;
        let values = self.rows.remove(index);
        log::trace!("Removed row {index}");
        Ok(self.header.iter().cloned().zip(values).collect())
    }

    /// Remove every row whose value at `key` equals `value`.
    ///
    /// Returns whether anything was removed. An unknown `key` matches nothing.
    pub fn remove_all_rows_matching(&mut self, key: &str, value: &str) -> bool {
        let Some(position) = self.column_index(key) else {
            return false;
        };
        let before = self.rows.len();
        self.rows
            .retain(|row| row.get(position).is_none_or(|v| v != value));
        let removed = before - self.rows.len();
        if removed > 0 {
            log::debug!("Removed {removed} rows where {key} = {value:?}");
        }
        removed > 0
    }

    /// Borrow the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= row_count`.
    pub fn get_row_at(&self, index: usize) -> Result<RowRef<'_>> {
        self.rows
            .get(index)
            .map(|values| RowRef::new(&self.header, values))
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }

    /// First row, in row order, holding `value` in any column.
    pub fn find_first_row_by_value(&self, value: &str) -> Option<RowRef<'_>> {
        self.rows().find(|row| row.contains_value(value))
    }

    /// Every row in order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows
            .iter()
            .map(|values| RowRef::new(&self.header, values))
    }

    // ------------------------------------------------------------------
    // Columns

    /// Append column `name`, giving row `i` the value `values[i]`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShapeMismatch`] unless exactly `row_count` values are
    /// given, [`StoreError::DuplicateColumn`] if `name` is already a column.
    pub fn add_column<I, S>(&mut self, name: impl Into<String>, values: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let values = collect_fields(values);
        if values.len() != self.rows.len() {
            return Err(StoreError::ShapeMismatch {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        if self.column_index(&name).is_some() {
            return Err(StoreError::DuplicateColumn(name));
        }

        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        log::debug!("Added column {name:?}");
        self.header.push(name);
        Ok(self)
    }

    /// [`add_column`](Self::add_column) taking one delimiter-joined string.
    ///
    /// # Errors
    ///
    /// As [`add_column`](Self::add_column).
    pub fn add_column_line(&mut self, name: impl Into<String>, line: &str) -> Result<&mut Self> {
        let values = self.split_line(line);
        self.add_column(name, values)
    }

    /// Append a column, reporting failure as `false` instead of an error.
    pub fn try_add_column<I, S>(&mut self, name: impl Into<String>, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_column(name, values).is_ok()
    }

    pub fn try_add_column_line(&mut self, name: impl Into<String>, line: &str) -> bool {
        self.add_column_line(name, line).is_ok()
    }

    /// Drop column `name` from the header and every row.
    ///
    /// Returns `false` if there is no such column.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(position) = self.column_index(name) else {
            return false;
        };
        self.header.remove(position);
        for row in &mut self.rows {
            row.remove(position);
        }
        log::debug!("Removed column {name:?}");
        true
    }

    /// Drop the column at `index`, returning its name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if `index >= column_count`.
    pub fn remove_column_at(&mut self, index: usize) -> Result<String> {
        let name = self.column_name(index)?.to_owned();
        self.remove_column(&name);
        Ok(name)
    }

    /// Values of column `name` in row order, or `None` for an unknown column.
    pub fn get_column(&self, name: &str) -> Option<Vec<&str>> {
        let position = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(position).map(String::as_str))
                .collect(),
        )
    }

    // ------------------------------------------------------------------
    // Point updates

    /// Overwrite the value at row `row` under column `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`] for a bad row,
    /// [`StoreError::UnknownColumn`] if `key` is not in the header.
    pub fn set_value_at(&mut self, row: usize, key: &str, value: impl Into<String>) -> Result<()> {
        self.check_row_index(row)?;
        let position = self
            .column_index(key)
            .ok_or_else(|| StoreError::UnknownColumn(key.to_owned()))?;
        let len = self.rows.len();
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|values| values.get_mut(position))
            .ok_or(StoreError::IndexOutOfRange { index: row, len })?;
        *cell = value.into();
        log::trace!("Set row {row} column {key:?}");
        Ok(())
    }

    /// Positional form of [`set_value_at`](Self::set_value_at).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for a bad column or row.
    pub fn set_value_at_position(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        let key = self.column_name(column)?.to_owned();
        self.set_value_at(row, &key, value)
    }

    // ------------------------------------------------------------------

    fn column_name(&self, index: usize) -> Result<&str> {
        self.header
            .get(index)
            .map(String::as_str)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.header.len(),
            })
    }

    fn check_row_index(&self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    fn check_width(&self, found: usize) -> Result<()> {
        if found != self.header.len() {
            return Err(StoreError::ShapeMismatch {
                expected: self.header.len(),
                found,
            });
        }
        Ok(())
    }

    fn split_line(&self, line: &str) -> Vec<String> {
        collect_fields(line.split(self.delimiter()))
    }
}

fn collect_fields<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}

fn ensure_unique(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(StoreError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

// 1-based source line of the first value of `row` in the value-per-line layout.
fn row_start_line(row: usize, width: usize) -> usize {
    2 + row * (width + 1)
}
