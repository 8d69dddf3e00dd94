use crate::{
    error::DetectError,
    signal::{sample_std, EcgTrace},
};
use serde::{Deserialize, Serialize};

/// Fraction of the nominal beat period used to size windows and R-R spacing.
pub const PERIOD_SHRINK: f64 = 0.8;
/// Default heart rate (Hz) when the caller gives none.
pub const DEFAULT_HEART_RATE_HZ: f64 = 1.0;
/// Default R threshold as a multiple of the signal's standard deviation.
pub const DEFAULT_THRESHOLD_SD: f64 = 3.0;

/// Which part of the beat window the S trough is searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchScope {
    /// Minimum over every sample of the window.
    FullWindow,
    /// Minimum over the R sample and everything after it.
    #[default]
    AfterR,
}

/// Caller-facing detector knobs. Unset fields fall back to defaults derived
/// from the trace during [`DetectorOptions::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Minimum R-peak prominence (floored before use).
    pub r_threshold: Option<f64>,
    /// Approximate heart rate in beats per time unit of the trace.
    pub heart_rate_hz: Option<f64>,
    pub s_search: Option<SearchScope>,
}

impl DetectorOptions {
    /// Values set on `other` win over values set on `self`.
    pub fn merge(self, other: DetectorOptions) -> DetectorOptions {
        DetectorOptions {
            r_threshold: other.r_threshold.or(self.r_threshold),
            heart_rate_hz: other.heart_rate_hz.or(self.heart_rate_hz),
            s_search: other.s_search.or(self.s_search),
        }
    }

    /// Fill in defaults from `trace` and validate the result.
    pub fn resolve(&self, trace: &EcgTrace) -> Result<DetectorConfig, DetectError> {
        let r_threshold = self
            .r_threshold
            .unwrap_or_else(|| DEFAULT_THRESHOLD_SD * sample_std(&trace.samples));
        let config = DetectorConfig {
            r_threshold,
            heart_rate_hz: self.heart_rate_hz.unwrap_or(DEFAULT_HEART_RATE_HZ),
            s_search: self.s_search.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Fully resolved detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub r_threshold: f64,
    pub heart_rate_hz: f64,
    pub s_search: SearchScope,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.heart_rate_hz.is_finite() || self.heart_rate_hz <= 0.0 {
            return Err(DetectError::NonPositiveHeartRate(self.heart_rate_hz));
        }
        if !self.r_threshold.is_finite() {
            return Err(DetectError::NonFiniteThreshold(self.r_threshold));
        }
        Ok(())
    }

    /// Expected beat period after the safety shrink.
    pub fn beat_period(&self) -> f64 {
        PERIOD_SHRINK / self.heart_rate_hz
    }

    /// Window sizes for a trace of `trace_len` samples at `sampling_rate`.
    ///
    /// `N` is capped at `trace_len`: a window that long already covers more
    /// than the whole trace, so every beat is out of bounds either way. The
    /// R-R separation keeps the uncapped period.
    pub fn geometry(&self, sampling_rate: f64, trace_len: usize) -> BeatGeometry {
        let n = (self.beat_period() * sampling_rate).floor();
        BeatGeometry {
            min_separation: (PERIOD_SHRINK * n).floor() as usize,
            ..BeatGeometry::new((n as usize).min(trace_len))
        }
    }
}

/// Sample-domain sizes shared by every beat of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatGeometry {
    /// Expected samples per beat, `N`.
    pub samples_per_beat: usize,
    /// Minimum spacing between accepted R peaks.
    pub min_separation: usize,
    /// Samples before R in each window, `ceil(N / 3)`.
    pub left: usize,
    /// Samples after R in each window, `ceil(2N / 3)`.
    pub right: usize,
}

impl BeatGeometry {
    pub fn new(samples_per_beat: usize) -> Self {
        let n = samples_per_beat;
        Self {
            samples_per_beat: n,
            min_separation: (PERIOD_SHRINK * n as f64).floor() as usize,
            left: n.div_ceil(3),
            right: n.saturating_mul(2).div_ceil(3),
        }
    }
}
