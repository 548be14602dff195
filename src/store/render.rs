//! Text output for [`TabularStore`]: delimited text and a JSON-style
//! array-of-objects document.
//!
//! Both renderers emit values verbatim. Nothing is quoted or escaped, so a
//! value containing the delimiter, a quote or a newline produces output that
//! will not parse back.

use super::TabularStore;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// How rows are laid out in delimited output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimitedLayout {
    /// One line per row, fields joined by the output delimiter.
    #[default]
    RowPerLine,
    /// Legacy layout: every value on its own line, the output delimiter after
    /// each value except a row's last, and a blank line after every row.
    ValuePerLine,
}

impl TabularStore {
    /// Render the store as delimited text using the configured layout.
    ///
    /// A store without columns renders an empty header line, which reads back
    /// as one column named `""`, so such stores do not round-trip.
    pub fn render_delimited(&self) -> String {
        self.render_delimited_as(self.options.delimited_layout)
    }

    /// Render the store as delimited text with an explicit layout.
    pub fn render_delimited_as(&self, layout: DelimitedLayout) -> String {
        let separator = self.output_delimiter();
        let mut out = self.header.join(separator);
        out.push('\n');

        for values in &self.rows {
            match layout {
                DelimitedLayout::RowPerLine => {
                    out.push_str(&values.join(separator));
                    out.push('\n');
                }
                DelimitedLayout::ValuePerLine => {
                    let last = values.len().saturating_sub(1);
                    for (i, value) in values.iter().enumerate() {
                        out.push_str(value);
                        if i < last {
                            out.push_str(separator);
                        }
                        out.push('\n');
                    }
                    out.push('\n');
                }
            }
        }

        log::debug!(
            "Rendered {} rows as delimited text ({layout:?})",
            self.row_count()
        );
        out
    }

    /// Render the store as an array of objects, one per row.
    ///
    /// ```
    /// # use tabstore::TabularStore;
    /// let mut store = TabularStore::with_header(["id", "name"], ",").unwrap();
    /// store.add_row(["1", "Alice"]).unwrap();
    /// assert_eq!(
    ///     store.render_structured_document(),
    ///     "[\n\t{\n\t\t\"id\": \"1\",\n\t\t\"name\": \"Alice\"\n\t}\n]\n"
    /// );
    /// ```
    pub fn render_structured_document(&self) -> String {
        let mut out = String::from("[\n");
        let last_row = self.rows.len().saturating_sub(1);

        for (row_index, values) in self.rows.iter().enumerate() {
            out.push_str("\t{\n");
            let last_field = values.len().saturating_sub(1);
            for (field_index, (name, value)) in self.header.iter().zip(values).enumerate() {
                out.push_str("\t\t\"");
                out.push_str(name);
                out.push_str("\": \"");
                out.push_str(value);
                out.push('"');
                if field_index < last_field {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str("\t}");
            if row_index < last_row {
                out.push(',');
            }
            out.push('\n');
        }

        out.push_str("]\n");
        log::debug!("Rendered {} rows as a structured document", self.row_count());
        out
    }

    /// Write delimited text to `writer`.
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails.
    pub fn write_delimited<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.render_delimited().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the structured document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns error if the writer fails.
    pub fn write_structured_document<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.render_structured_document().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
