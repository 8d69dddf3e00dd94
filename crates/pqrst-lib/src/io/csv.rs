use crate::signal::EcgTrace;
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("missing column {:?}; found {:?}", name, headers))
}

fn field(record: &StringRecord, idx: usize, row: usize) -> Result<f64> {
    let raw = record
        .get(idx)
        .ok_or_else(|| anyhow!("row {} is missing column {}", row, idx))?;
    raw.parse::<f64>()
        .with_context(|| format!("row {}: {:?} is not a number", row, raw))
}

/// Load an ECG lead from a delimited file with a header row. Without a time
/// column the trace gets the implicit sample-index time base.
pub fn load_ecg_csv(
    path: &Path,
    ecg_col: &str,
    time_col: Option<&str>,
    delimiter: u8,
) -> Result<EcgTrace> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let ecg_idx = column_index(&headers, ecg_col)?;
    let time_idx = time_col
        .map(|name| column_index(&headers, name))
        .transpose()?;

    let mut samples = Vec::new();
    let mut times = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {}", row + 1))?;
        samples.push(field(&record, ecg_idx, row + 1)?);
        if let Some(idx) = time_idx {
            times.push(field(&record, idx, row + 1)?);
        }
    }
    if samples.is_empty() {
        anyhow::bail!("{} contains no samples", path.display());
    }
    Ok(match time_idx {
        Some(_) => EcgTrace::with_time(samples, times),
        None => EcgTrace::new(samples),
    })
}
