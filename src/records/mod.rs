// src/records/mod.rs

pub mod sink;
pub mod source;

pub use sink::write;
pub use source::{read, read_path};

/// One CSV record: field name → value, in column order.
///
/// Keys are unique. Inserting a key that is already present overwrites the
/// value but keeps the field where it first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Rows in source order plus the header line they were read with.
///
/// `headers` is transformed together with the rows, so after the header
/// transform and enrichment it is the list of columns to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_in_place() {
        let mut row: Row = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        row.insert("a", "9");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(row.get("a"), Some("9"));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut row: Row = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(row.remove("b"), Some("2".to_string()));
        assert_eq!(row.remove("b"), None);
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![("a", "1"), ("c", "3")]);
    }
}
