// src/records/sink.rs
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;

use super::Dataset;

/// Serialize `dataset` as CSV: one header line from `headers`, then one line
/// per row with values in header order. A field the row lacks is written empty.
pub fn write<W: Write>(dataset: &Dataset, headers: &[String], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(headers)
        .context("writing CSV header line")?;

    for (idx, row) in dataset.rows.iter().enumerate() {
        let record = headers.iter().map(|h| row.get(h).unwrap_or(""));
        wtr.write_record(record)
            .with_context(|| format!("writing CSV record {}", idx + 1))?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{read, Row};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writes_values_in_header_order() -> Result<()> {
        let row: Row = [("b", "2"), ("a", "1")].into_iter().collect();
        let ds = Dataset::new(headers(&["b", "a"]), vec![row]);

        let mut out = Vec::new();
        write(&ds, &headers(&["a", "b"]), &mut out)?;
        assert_eq!(String::from_utf8(out)?, "a,b\n1,2\n");
        Ok(())
    }

    #[test]
    fn missing_field_is_written_empty() -> Result<()> {
        let row: Row = [("a", "1")].into_iter().collect();
        let ds = Dataset::new(headers(&["a"]), vec![row]);

        let mut out = Vec::new();
        write(&ds, &headers(&["a", "Coordinates"]), &mut out)?;
        assert_eq!(String::from_utf8(out)?, "a,Coordinates\n1,\n");
        Ok(())
    }

    #[test]
    fn quoted_values_survive_a_round_trip() -> Result<()> {
        let row: Row = [
            ("Name", "Mic \"Night\""),
            ("Address", "1 Pike Pl, Seattle"),
            ("Coordinates", "[47.6097,-122.3422]"),
        ]
        .into_iter()
        .collect();
        let cols = headers(&["Name", "Address", "Coordinates"]);
        let ds = Dataset::new(cols.clone(), vec![row]);

        let mut out = Vec::new();
        write(&ds, &cols, &mut out)?;
        let back = read(out.as_slice())?;

        assert_eq!(back.headers, cols);
        assert_eq!(back.rows, ds.rows);
        Ok(())
    }
}
