// src/pipeline.rs
use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::info;

use crate::config::Config;
use crate::enrich::{EnrichStats, Enricher, FixedInterval, RateLimiter};
use crate::geocode::{AddressResolver, GeoapifyResolver};
use crate::headers::HeaderTransform;
use crate::records::{self, Dataset};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub headers: Vec<String>,
    pub stats: EnrichStats,
}

/// Read → rename/remove columns → geocode → write.
///
/// The output file is only touched at the very end and is replaced atomically,
/// so a failed run leaves any previous output as it was.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(input = %config.input_path.display(), output = %config.output_path.display())
)]
pub async fn run<R, L>(config: &Config, resolver: R, limiter: L) -> Result<RunSummary>
where
    R: AddressResolver,
    L: RateLimiter,
{
    // ─── 1) read source CSV ──────────────────────────────────────────
    let raw = records::read_path(&config.input_path)?;
    info!(rows = raw.len(), columns = raw.headers.len(), "read input");

    // ─── 2) rename, then drop columns ────────────────────────────────
    let transformed = HeaderTransform::from_config(config).apply(raw);
    if !transformed.headers.contains(&config.address_column) {
        bail!(
            "{:?} has no {:?} column after renaming (columns: {:?})",
            config.input_path,
            config.address_column,
            transformed.headers
        );
    }

    // ─── 3) geocode, one row at a time ───────────────────────────────
    let mut enricher = Enricher::new(
        resolver,
        limiter,
        config.address_column.as_str(),
        config.coordinates_column.as_str(),
    );
    let (enriched, stats) = enricher.enrich(transformed).await;

    // ─── 4) write output ─────────────────────────────────────────────
    write_atomic(&enriched, &config.output_path)?;
    info!(path = %config.output_path.display(), rows = enriched.len(), "CSV file saved");

    Ok(RunSummary {
        output_path: config.output_path.clone(),
        headers: enriched.headers,
        stats,
    })
}

/// Production wiring: Geoapify over HTTP, paced by the configured delay.
pub async fn run_geoapify(config: &Config) -> Result<RunSummary> {
    let resolver = GeoapifyResolver::new(&config.geocoder)?;
    let limiter = FixedInterval::new(config.request_delay());
    run(config, resolver, limiter).await
}

fn write_atomic(dataset: &Dataset, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    records::write(dataset, &dataset.headers, tmp.as_file_mut())?;
    tmp.persist(path)
        .with_context(|| format!("Failed to persist CSV file: {:?}", path))?;
    Ok(())
}
