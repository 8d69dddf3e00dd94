use crate::{
    config::{BeatGeometry, DetectorConfig, DetectorOptions},
    detectors::{
        rpeaks::locate_r_peaks,
        subpeaks::{locate_sub_peaks, SubPeakOffsets},
        window::{build_segments, BeatSegment, BeatWindow},
    },
    error::{BeatError, DetectError},
    signal::{EcgTrace, Events},
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// One detected landmark: where it is, how high, and when.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub index: usize,
    pub amplitude: f64,
    pub time: f64,
}

/// Five beat-aligned landmark sequences, one entry per accepted beat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PqrstComplexes {
    pub p: Vec<Landmark>,
    pub q: Vec<Landmark>,
    pub r: Vec<Landmark>,
    pub s: Vec<Landmark>,
    pub t: Vec<Landmark>,
}

impl PqrstComplexes {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    fn push(&mut self, trace: &EcgTrace, segment: &BeatSegment<'_>, found: &SubPeakOffsets) {
        let at = |position| map_landmark(trace, segment, position);
        self.p.push(at(found.p));
        self.q.push(at(found.q));
        self.r.push(at(found.r));
        self.s.push(at(found.s));
        self.t.push(at(found.t));
    }
}

/// Convert an in-window position back to the trace's index and time.
pub fn map_landmark(trace: &EcgTrace, segment: &BeatSegment<'_>, position: usize) -> Landmark {
    let index = segment.absolute(position);
    Landmark {
        index,
        amplitude: trace.samples[index],
        time: trace.time.time_at(index),
    }
}

/// Everything one detector call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub config: DetectorConfig,
    pub geometry: BeatGeometry,
    /// Every R peak the locator accepted, including beats dropped later.
    pub r_peaks: Events,
    pub complexes: PqrstComplexes,
    /// Beats skipped because of their window or search geometry.
    pub dropped: Vec<BeatError>,
}

impl Detection {
    /// True when the R-peak locator found nothing at all.
    pub fn no_peaks_found(&self) -> bool {
        self.r_peaks.is_empty()
    }

    pub fn beat_count(&self) -> usize {
        self.complexes.len()
    }
}

/// Locate P, Q, R, S and T for every beat of `trace`, resolving unset
/// options from the trace first.
pub fn detect(trace: &EcgTrace, options: &DetectorOptions) -> Result<Detection, DetectError> {
    trace.validate()?;
    let config = options.resolve(trace)?;
    detect_with_config(trace, &config)
}

/// Run the detector with an already resolved configuration.
pub fn detect_with_config(
    trace: &EcgTrace,
    config: &DetectorConfig,
) -> Result<Detection, DetectError> {
    trace.validate()?;
    config.validate()?;

    let geometry = config.geometry(trace.sampling_rate(), trace.len());
    if geometry.left == 0 {
        warn!(
            "beat window has no samples before R ({} samples per beat at {:.3} samples/unit); every beat will be dropped",
            geometry.samples_per_beat,
            trace.sampling_rate()
        );
    }

    let r_peaks = locate_r_peaks(&trace.samples, config.r_threshold, geometry.min_separation);
    if r_peaks.is_empty() {
        info!("no R peaks found in {} samples", trace.len());
    }

    let window = BeatWindow::from_geometry(&geometry);
    let (segments, mut dropped) = build_segments(&trace.samples, &r_peaks, &window);

    let mut complexes = PqrstComplexes::default();
    for segment in &segments {
        match locate_sub_peaks(segment, config.s_search) {
            Ok(found) => complexes.push(trace, segment, &found),
            Err(err) => {
                warn!("dropping beat: {}", err);
                dropped.push(err);
            }
        }
    }
    dropped.sort_by_key(BeatError::r_index);

    debug!(
        "detected {} beats from {} R peaks ({} dropped, window {} samples)",
        complexes.len(),
        r_peaks.len(),
        dropped.len(),
        window.len()
    );

    Ok(Detection {
        config: *config,
        geometry,
        r_peaks,
        complexes,
        dropped,
    })
}
