// src/geocode/mod.rs

pub mod canned;
pub mod geoapify;

pub use canned::CannedResolver;
pub use geoapify::GeoapifyResolver;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::{fmt, sync::Arc};

/// Result of geocoding one address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Resolved { lat: f64, lon: f64 },
    Unresolved,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate::Resolved { lat, lon }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Coordinate::Resolved { .. })
    }

    /// Read back a cell written by the `Display` impl: `[lat,lon]` or empty.
    pub fn parse(cell: &str) -> Result<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Ok(Coordinate::Unresolved);
        }

        let inner = cell
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| anyhow!("coordinate cell {:?} is not [lat,lon]", cell))?;
        let (lat, lon) = inner
            .split_once(',')
            .ok_or_else(|| anyhow!("coordinate cell {:?} is missing a comma", cell))?;

        Ok(Coordinate::new(
            lat.trim()
                .parse()
                .with_context(|| format!("bad latitude in {:?}", cell))?,
            lon.trim()
                .parse()
                .with_context(|| format!("bad longitude in {:?}", cell))?,
        ))
    }
}

/// `[lat,lon]` with shortest round-trip float formatting; empty when unresolved.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Resolved { lat, lon } => write!(f, "[{},{}]", lat, lon),
            Coordinate::Unresolved => Ok(()),
        }
    }
}

/// Something that can turn free-text addresses into coordinates.
///
/// A blank address must come back as `Ok(Coordinate::Unresolved)` without any
/// outbound call. Every other failure is an `Err`; callers decide whether that
/// is fatal.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Coordinate>;
}

#[async_trait]
impl<T: AddressResolver + ?Sized> AddressResolver for Arc<T> {
    async fn resolve(&self, address: &str) -> Result<Coordinate> {
        (**self).resolve(address).await
    }
}
