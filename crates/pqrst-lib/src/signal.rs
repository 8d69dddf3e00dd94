use crate::error::DetectError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Time coordinate of every sample in a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeBase {
    /// Sample `i` (0-based) sits at time `i + 1`.
    Implicit { len: usize },
    /// One strictly increasing timestamp per sample.
    Explicit(Vec<f64>),
}

impl TimeBase {
    /// Uniform timestamps `(i + 1) / fs`, so the derived sampling rate equals `fs`.
    pub fn from_rate(len: usize, fs: f64) -> Self {
        TimeBase::Explicit((0..len).map(|i| (i + 1) as f64 / fs).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            TimeBase::Implicit { len } => *len,
            TimeBase::Explicit(times) => times.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time_at(&self, index: usize) -> f64 {
        match self {
            TimeBase::Implicit { .. } => (index + 1) as f64,
            TimeBase::Explicit(times) => times[index],
        }
    }

    /// Time of the last sample, 0 for an empty base.
    pub fn end_time(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.time_at(self.len() - 1)
    }

    /// Samples per time unit, derived from length and total duration.
    pub fn sampling_rate(&self) -> f64 {
        self.len() as f64 / self.end_time()
    }

    /// Check the base against a signal of `signal_len` samples.
    pub fn validate(&self, signal_len: usize) -> Result<(), DetectError> {
        if self.len() != signal_len {
            return Err(DetectError::TimeLengthMismatch {
                signal: signal_len,
                time: self.len(),
            });
        }
        if let TimeBase::Explicit(times) = self {
            let stalled = times
                .windows(2)
                .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater));
            if let Some(pos) = stalled {
                return Err(DetectError::TimeNotIncreasing { index: pos + 1 });
            }
        }
        let end = self.end_time();
        if !end.is_finite() || end <= 0.0 {
            return Err(DetectError::NonPositiveDuration(end));
        }
        Ok(())
    }
}

/// A single-lead recording: amplitude samples plus their time base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgTrace {
    pub samples: Vec<f64>,
    pub time: TimeBase,
}

impl EcgTrace {
    /// Trace with the implicit `1..=L` time base.
    pub fn new(samples: Vec<f64>) -> Self {
        let len = samples.len();
        Self {
            samples,
            time: TimeBase::Implicit { len },
        }
    }

    pub fn with_time(samples: Vec<f64>, times: Vec<f64>) -> Self {
        Self {
            samples,
            time: TimeBase::Explicit(times),
        }
    }

    pub fn with_rate(samples: Vec<f64>, fs: f64) -> Self {
        let time = TimeBase::from_rate(samples.len(), fs);
        Self { samples, time }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sampling_rate(&self) -> f64 {
        self.time.sampling_rate()
    }

    pub fn duration(&self) -> f64 {
        self.time.end_time()
    }

    /// Reject traces the detector cannot work on.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.is_empty() {
            return Err(DetectError::EmptySignal);
        }
        self.time.validate(self.samples.len())
    }
}

/// Flatten a `1 x L` or `L x 1` matrix into a single row of samples.
pub fn samples_from_matrix(rows: &[Vec<f64>]) -> Result<Vec<f64>, DetectError> {
    let cols = rows.first().map(Vec::len).unwrap_or(0);
    if rows.is_empty() || cols == 0 || rows.iter().any(|row| row.len() != cols) {
        return Err(DetectError::BadOrientation {
            rows: rows.len(),
            cols,
        });
    }
    match (rows.len(), cols) {
        (1, _) => Ok(rows[0].clone()),
        (_, 1) => Ok(rows.iter().map(|row| row[0]).collect()),
        (rows, cols) => Err(DetectError::BadOrientation { rows, cols }),
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    (data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0)).sqrt()
}

/// Point events on a timeline (e.g., R-peak indices)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    pub indices: Vec<usize>,
}

impl Events {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// RR intervals, in the trace's time unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RRSeries {
    pub rr: Vec<f64>,
}

impl RRSeries {
    pub fn from_times(times: &[f64]) -> Self {
        let rr = times.windows(2).map(|w| w[1] - w[0]).collect();
        Self { rr }
    }
}
