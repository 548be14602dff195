//! Row views handed out by [`TabularStore`](super::TabularStore).
//!
//! The store keeps each row as a list of values laid out in header order, so a
//! row's key set always equals the header. [`RowRef`] pairs those values with
//! the header on the way out; [`Row`] is the owned, detached form.

use serde::ser::{Serialize, SerializeMap as _, Serializer};

/// Borrowed view of one stored row.
///
/// The view borrows the store, so it cannot outlive a later shape-changing
/// call. Use [`RowRef::to_row`] to keep a copy.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    header: &'a [String],
    values: &'a [String],
}

impl<'a> RowRef<'a> {
    pub(crate) fn new(header: &'a [String], values: &'a [String]) -> Self {
        Self { header, values }
    }

    /// Value stored under `key`, if the header has that column.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        let position = self.header.iter().position(|name| name == key)?;
        self.values.get(position).map(String::as_str)
    }

    /// Value at a column position.
    pub fn get_at(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).map(String::as_str)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a row of a zero-column store.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        self.header
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Values in header order.
    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// Whether any column holds exactly `value`.
    pub fn contains_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Owned copy of this row.
    pub fn to_row(&self) -> Row {
        self.iter().collect()
    }
}

impl PartialEq<Row> for RowRef<'_> {
    fn eq(&self, other: &Row) -> bool {
        self.iter().eq(other.iter())
    }
}

/// Owned row: an insertion-ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Values in column order, dropping the names.
    pub fn into_values(self) -> Vec<String> {
        self.fields.into_iter().map(|(_, value)| value).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<RowRef<'_>> for Row {
    fn from(row: RowRef<'_>) -> Self {
        row.to_row()
    }
}

// Serialized as a JSON object with keys in column order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        vec!["id".to_owned(), "name".to_owned()]
    }

    #[test]
    fn test_row_ref_lookup() {
        let header = header();
        let values = vec!["7".to_owned(), "Ada".to_owned()];
        let row = RowRef::new(&header, &values);

        assert_eq!(row.get("name"), Some("Ada"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_at(0), Some("7"));
        assert!(row.contains_value("Ada"));
        assert!(!row.contains_value("ada"));
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row: Row = [("zeta", "1"), ("alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_to_row_matches_view() {
        let header = header();
        let values = vec!["1".to_owned(), "Bob".to_owned()];
        let view = RowRef::new(&header, &values);
        let owned = view.to_row();

        assert_eq!(view, owned);
        assert_eq!(owned.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(owned.into_values(), vec!["1", "Bob"]);
    }
}
