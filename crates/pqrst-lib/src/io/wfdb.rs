use crate::signal::EcgTrace;
use anyhow::Result;
use std::path::Path;

/// Sampling frequency assumed when the header omits it.
const FALLBACK_FS: f64 = 250.0;

/// Convert raw ADC counts to physical units.
pub fn to_physical(raw: &[f64], gain: f64, baseline: f64) -> Vec<f64> {
    let gain = if gain == 0.0 { 1.0 } else { gain };
    raw.iter().map(|&sample| (sample - baseline) / gain).collect()
}

/// Load one lead of a WFDB record. The trace's time base is in seconds,
/// derived from the header's sampling frequency.
pub fn load_wfdb_lead(header_path: &Path, lead: usize) -> Result<EcgTrace> {
    let (header, signals) = wfdb_rust::parse_wfdb(header_path);
    if lead >= signals.len() {
        anyhow::bail!(
            "WFDB record contains {} signals, but lead {} was requested",
            signals.len(),
            lead
        );
    }
    let channel = &header.signal_specs[lead];
    let gain = channel.adc_gain.unwrap_or(1.0) as f64;
    let baseline = channel.baseline.or(channel.adc_zero).unwrap_or(0) as f64;
    let fs = header
        .record
        .sampling_frequency
        .map(|f| f as f64)
        .unwrap_or(FALLBACK_FS);
    let raw: Vec<f64> = signals[lead].iter().map(|&s| s as f64).collect();
    Ok(EcgTrace::with_rate(to_physical(&raw, gain, baseline), fs))
}
