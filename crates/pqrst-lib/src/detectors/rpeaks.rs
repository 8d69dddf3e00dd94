use crate::signal::Events;
use log::debug;

/// A local maximum and its prominence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    pub index: usize,
    pub prominence: f64,
}

/// Indices of strict local maxima, endpoints excluded. A flat top that rises
/// and then falls is reported at its first sample.
pub fn find_local_maxima(data: &[f64]) -> Vec<usize> {
    let n = data.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let mut i = 1;
    while i < n - 1 {
        if data[i] > data[i - 1] {
            let mut end = i;
            while end + 1 < n && data[end + 1] == data[i] {
                end += 1;
            }
            if end + 1 < n && data[end + 1] < data[i] {
                peaks.push(i);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    peaks
}

/// Prominence of each peak: its height above the higher of the two lowest
/// points reached before the signal climbs above it (or ends) on each side.
pub fn peak_prominences(data: &[f64], peaks: &[usize]) -> Vec<f64> {
    peaks
        .iter()
        .map(|&peak| {
            let height = data[peak];
            let left_min = data[..peak]
                .iter()
                .rev()
                .take_while(|&&v| v <= height)
                .fold(height, |acc, &v| acc.min(v));
            let right_min = data[peak + 1..]
                .iter()
                .take_while(|&&v| v <= height)
                .fold(height, |acc, &v| acc.min(v));
            height - left_min.max(right_min)
        })
        .collect()
}

/// Local maxima paired with their prominences.
pub fn peak_candidates(data: &[f64]) -> Vec<PeakCandidate> {
    let peaks = find_local_maxima(data);
    let prominences = peak_prominences(data, &peaks);
    peaks
        .into_iter()
        .zip(prominences)
        .map(|(index, prominence)| PeakCandidate { index, prominence })
        .collect()
}

/// Locate R peaks: local maxima whose prominence reaches `floor(r_threshold)`,
/// thinned so accepted peaks are at least `min_separation` samples apart.
///
/// Candidates are accepted in order of descending prominence; on equal
/// prominence the earlier index is visited first. The result is ascending.
pub fn locate_r_peaks(data: &[f64], r_threshold: f64, min_separation: usize) -> Events {
    let floor = r_threshold.floor();
    let mut candidates: Vec<PeakCandidate> = peak_candidates(data)
        .into_iter()
        .filter(|c| c.prominence >= floor)
        .collect();
    let prominent = candidates.len();
    candidates.sort_by(|a, b| {
        b.prominence
            .total_cmp(&a.prominence)
            .then(a.index.cmp(&b.index))
    });

    let mut kept: Vec<usize> = Vec::new();
    for candidate in candidates {
        let clear = kept
            .iter()
            .all(|&k| k.abs_diff(candidate.index) >= min_separation);
        if clear {
            kept.push(candidate.index);
        }
    }
    kept.sort_unstable();
    debug!(
        "R-peak locator: {} prominent maxima (floor {}), {} kept at separation {}",
        prominent,
        floor,
        kept.len(),
        min_separation
    );
    Events::from_indices(kept)
}
