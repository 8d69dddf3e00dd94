use crate::signal::samples_from_matrix;
use anyhow::{Context, Result};
use std::path::Path;

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse newline-delimited floating point series, ignoring blank/comment lines.
pub fn parse_f64_series(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, trimmed) in data_lines(text) {
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not f64: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(out)
}

/// Read a newline-delimited floating point series from disk.
pub fn read_f64_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_f64_series(&text)
}

/// Parse a numeric matrix: one row per line, values split on commas or
/// whitespace.
pub fn parse_f64_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (idx, trimmed) in data_lines(text) {
        let row = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(|field| {
                field
                    .parse::<f64>()
                    .with_context(|| format!("line {} has non-numeric value: {}", idx + 1, field))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(rows)
}

/// Parse a single-lead signal stored either as one row or as one column.
pub fn parse_signal(text: &str) -> Result<Vec<f64>> {
    let rows = parse_f64_matrix(text)?;
    Ok(samples_from_matrix(&rows)?)
}

/// Read a single-lead signal (row or column layout) from disk.
pub fn read_signal(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_signal(&text).with_context(|| format!("failed to parse {}", path.display()))
}
