// src/records/source.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

use super::{Dataset, Row};

/// Parse a CSV stream whose first record is the header line.
///
/// Every record must have as many fields as the header; anything else is a
/// parse error and aborts the read.
pub fn read<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let raw_headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header line")?
        .iter()
        .map(str::to_string)
        .collect();
    if raw_headers.is_empty() {
        bail!("CSV has no header line");
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;
        let row: Row = raw_headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    // a repeated header name collapses to one column, same as in each row
    let mut headers: Vec<String> = Vec::with_capacity(raw_headers.len());
    for h in raw_headers {
        if !headers.contains(&h) {
            headers.push(h);
        }
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
    Ok(Dataset::new(headers, rows))
}

#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    read(file).with_context(|| format!("Failed to read CSV file: {:?}", path))
}
