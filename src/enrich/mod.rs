// src/enrich/mod.rs

pub mod limiter;

pub use limiter::{FixedInterval, RateLimiter, Unlimited};

use tracing::{debug, info, warn};

use crate::geocode::{AddressResolver, Coordinate};
use crate::records::Dataset;

/// Counters for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub rows: usize,
    pub resolved: usize,
    /// Rows with a blank or missing address; no lookup was made.
    pub skipped: usize,
    pub failed: usize,
}

/// Adds a coordinate column to every row, one lookup at a time.
pub struct Enricher<R, L> {
    resolver: R,
    limiter: L,
    address_column: String,
    coordinates_column: String,
}

impl<R: AddressResolver, L: RateLimiter> Enricher<R, L> {
    pub fn new(
        resolver: R,
        limiter: L,
        address_column: impl Into<String>,
        coordinates_column: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            limiter,
            address_column: address_column.into(),
            coordinates_column: coordinates_column.into(),
        }
    }

    #[cfg(test)]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Geocode each row's address in order and store the result under the
    /// coordinates column.
    ///
    /// The address cell is trimmed before lookup; a cell that is blank after
    /// trimming (or a row without the column) is left unresolved without a call.
    /// A failed lookup is logged and leaves that row unresolved; it never stops
    /// the pass. Lookups never overlap and are spaced by the rate limiter.
    pub async fn enrich(&mut self, mut dataset: Dataset) -> (Dataset, EnrichStats) {
        let mut stats = EnrichStats {
            rows: dataset.len(),
            ..Default::default()
        };
        info!(rows = stats.rows, "geocoding addresses");
        if !dataset.is_empty() && !dataset.headers.contains(&self.address_column) {
            warn!(column = %self.address_column, "address column missing, no row will be geocoded");
        }

        for (idx, row) in dataset.rows.iter_mut().enumerate() {
            let address = row
                .get(&self.address_column)
                .unwrap_or("")
                .trim()
                .to_string();

            let coord = if address.is_empty() {
                debug!(row = idx + 1, "no address");
                stats.skipped += 1;
                Coordinate::Unresolved
            } else {
                self.limiter.acquire().await;
                let result = self.resolver.resolve(&address).await;
                self.limiter.release();

                match result {
                    Ok(c) => {
                        if c.is_resolved() {
                            stats.resolved += 1;
                        } else {
                            stats.failed += 1;
                        }
                        debug!(row = idx + 1, %address, coord = %c, "resolved");
                        c
                    }
                    Err(e) => {
                        warn!(row = idx + 1, %address, error = %format!("{:#}", e), "lookup failed");
                        stats.failed += 1;
                        Coordinate::Unresolved
                    }
                }
            };

            row.insert(self.coordinates_column.as_str(), coord.to_string());
        }

        if !dataset.headers.contains(&self.coordinates_column) {
            dataset.headers.push(self.coordinates_column.clone());
        }

        info!(
            resolved = stats.resolved,
            skipped = stats.skipped,
            failed = stats.failed,
            "geocoding done"
        );
        (dataset, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::CannedResolver;
    use crate::records::Row;
    use std::time::Duration;

    fn dataset(addresses: &[&str]) -> Dataset {
        let rows = addresses
            .iter()
            .enumerate()
            .map(|(i, a)| -> Row {
                [("Name", format!("venue {}", i)), ("Address", a.to_string())]
                    .into_iter()
                    .collect()
            })
            .collect();
        Dataset::new(vec!["Name".into(), "Address".into()], rows)
    }

    fn enricher<L: RateLimiter>(resolver: CannedResolver, limiter: L) -> Enricher<CannedResolver, L> {
        Enricher::new(resolver, limiter, "Address", "Coordinates")
    }

    #[tokio::test]
    async fn every_row_gains_one_field_in_order() {
        let resolver = CannedResolver::new()
            .with("1 Main St", 47.0, -122.5)
            .with("2 Pike Pl", 47.6, -122.3);
        let input = dataset(&["1 Main St", "2 Pike Pl", "1 Main St"]);
        let widths: Vec<usize> = input.rows.iter().map(Row::len).collect();

        let mut e = enricher(resolver, Unlimited);
        let (out, stats) = e.enrich(input).await;

        assert_eq!(out.len(), 3);
        for (row, before) in out.rows.iter().zip(widths) {
            assert_eq!(row.len(), before + 1);
        }
        assert_eq!(out.headers, vec!["Name", "Address", "Coordinates"]);
        assert_eq!(out.rows[0].get("Coordinates"), Some("[47,-122.5]"));
        assert_eq!(out.rows[1].get("Coordinates"), Some("[47.6,-122.3]"));
        // no cache: repeated address is looked up again
        assert_eq!(e.resolver().calls(), vec!["1 Main St", "2 Pike Pl", "1 Main St"]);
        assert_eq!(
            stats,
            EnrichStats {
                rows: 3,
                resolved: 3,
                skipped: 0,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn blank_or_missing_address_skips_lookup() {
        let mut input = dataset(&["", "   "]);
        let mut no_column = Row::new();
        no_column.insert("Name", "no address column");
        input.rows.push(no_column);

        let mut e = enricher(CannedResolver::new(), FixedInterval::new(Duration::from_secs(60)));
        let (out, stats) = e.enrich(input).await;

        assert!(e.resolver().calls().is_empty());
        assert_eq!(stats.skipped, 3);
        for row in &out.rows {
            assert_eq!(row.get("Coordinates"), Some(""));
        }
    }

    #[tokio::test]
    async fn failed_lookup_degrades_and_continues() {
        let resolver = CannedResolver::new().with("2 Pike Pl", 47.6, -122.3);
        let mut e = enricher(resolver, Unlimited);
        let (out, stats) = e.enrich(dataset(&["nowhere", "2 Pike Pl"])).await;

        assert_eq!(out.rows[0].get("Coordinates"), Some(""));
        assert_eq!(out.rows[1].get("Coordinates"), Some("[47.6,-122.3]"));
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(e.resolver().calls().len(), 2);
    }

    #[tokio::test]
    async fn consecutive_lookups_are_spaced_by_interval() {
        let interval = Duration::from_millis(40);
        let resolver = CannedResolver::new()
            .with("a", 1.0, 1.0)
            .with("b", 2.0, 2.0)
            .with("c", 3.0, 3.0);
        let mut e = enricher(resolver, FixedInterval::new(interval));
        e.enrich(dataset(&["a", "", "b", "c"])).await;

        let instants = e.resolver().call_instants();
        assert_eq!(instants.len(), 3);
        for pair in instants.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= interval);
        }
    }

    #[tokio::test]
    async fn empty_dataset_still_gets_the_column() {
        let mut e = enricher(CannedResolver::new(), Unlimited);
        let (out, stats) = e.enrich(dataset(&[])).await;
        assert!(out.is_empty());
        assert_eq!(out.headers.last().map(String::as_str), Some("Coordinates"));
        assert_eq!(stats.rows, 0);
    }
}
