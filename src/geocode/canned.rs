// src/geocode/canned.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Mutex,
};
use tokio::time::Instant;

use super::{AddressResolver, Coordinate};

/// In-memory resolver with fixed answers, for running the pipeline offline.
///
/// Unknown addresses fail the same way an empty candidate list does. Every
/// non-blank lookup is recorded with the instant it started.
#[derive(Debug, Default)]
pub struct CannedResolver {
    answers: HashMap<String, Coordinate>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl CannedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.answers
            .insert(address.into(), Coordinate::new(lat, lon));
        self
    }

    /// Addresses looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(a, _)| a.clone()).collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.lock_calls().iter().map(|(_, t)| *t).collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, Instant)>> {
        // a poisoned log is still a valid log
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AddressResolver for CannedResolver {
    async fn resolve(&self, address: &str) -> Result<Coordinate> {
        if address.trim().is_empty() {
            return Ok(Coordinate::Unresolved);
        }
        self.lock_calls()
            .push((address.to_string(), Instant::now()));

        self.answers
            .get(address)
            .copied()
            .ok_or_else(|| anyhow!("no results for {:?}", address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_known_and_fails_unknown() {
        let r = CannedResolver::new().with("123 Main St", 47.6, -122.3);

        assert_eq!(
            r.resolve("123 Main St").await.unwrap(),
            Coordinate::new(47.6, -122.3)
        );
        assert!(r.resolve("nowhere").await.is_err());
        assert_eq!(r.resolve("   ").await.unwrap(), Coordinate::Unresolved);
        assert_eq!(r.calls(), vec!["123 Main St", "nowhere"]);
    }
}
