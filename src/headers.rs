// src/headers.rs
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::Config;
use crate::records::{Dataset, Row};

/// Column rename table plus the set of (renamed) columns to drop.
#[derive(Debug, Clone, Default)]
pub struct HeaderTransform {
    pub mapping: BTreeMap<String, String>,
    pub remove: BTreeSet<String>,
}

impl HeaderTransform {
    pub fn new(mapping: BTreeMap<String, String>, remove: BTreeSet<String>) -> Self {
        Self { mapping, remove }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.header_mapping.clone(),
            config.headers_to_remove.clone(),
        )
    }

    fn new_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.mapping.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Rename every key found in the mapping; other keys are kept as is.
    ///
    /// If two columns end up with the same name, the later column's value wins
    /// and sits where the first one was.
    pub fn rename(&self, dataset: Dataset) -> Dataset {
        let mut headers: Vec<String> = Vec::with_capacity(dataset.headers.len());
        for h in &dataset.headers {
            let renamed = self.new_name(h);
            if !headers.iter().any(|x| x == renamed) {
                headers.push(renamed.to_string());
            }
        }

        let rows = dataset
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (self.new_name(&k).to_string(), v))
                    .collect::<Row>()
            })
            .collect();

        Dataset::new(headers, rows)
    }

    /// Drop every column in the remove set. Runs after [`rename`](Self::rename),
    /// so the set is matched against new names.
    pub fn remove(&self, dataset: Dataset) -> Dataset {
        let headers = dataset
            .headers
            .into_iter()
            .filter(|h| !self.remove.contains(h))
            .collect();

        let rows = dataset
            .rows
            .into_iter()
            .map(|mut row| {
                for key in &self.remove {
                    row.remove(key);
                }
                row
            })
            .collect();

        Dataset::new(headers, rows)
    }

    pub fn apply(&self, dataset: Dataset) -> Dataset {
        let before = dataset.headers.len();
        let out = self.remove(self.rename(dataset));
        debug!(before, after = out.headers.len(), "transformed headers");
        out
    }
}
