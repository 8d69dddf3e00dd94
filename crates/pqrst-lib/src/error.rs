use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Call-level failures. These are raised before any search runs and no
/// partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    #[error("invalid parameter: signal is empty")]
    EmptySignal,
    #[error("invalid parameter: heart rate must be positive and finite, got {0}")]
    NonPositiveHeartRate(f64),
    #[error("invalid parameter: R threshold must be finite, got {0}")]
    NonFiniteThreshold(f64),
    #[error("invalid parameter: time base has {time} entries but signal has {signal} samples")]
    TimeLengthMismatch { signal: usize, time: usize },
    #[error("invalid parameter: time base is not strictly increasing at sample {index}")]
    TimeNotIncreasing { index: usize },
    #[error("invalid parameter: recording duration must be positive, got {0}")]
    NonPositiveDuration(f64),
    #[error("invalid parameter: expected a single row or column, got a {rows}x{cols} matrix")]
    BadOrientation { rows: usize, cols: usize },
}

/// The five landmarks of one heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkKind {
    P,
    Q,
    R,
    S,
    T,
}

impl fmt::Display for LandmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LandmarkKind::P => "P",
            LandmarkKind::Q => "Q",
            LandmarkKind::R => "R",
            LandmarkKind::S => "S",
            LandmarkKind::T => "T",
        };
        f.write_str(name)
    }
}

/// Per-beat failures. The offending beat is dropped, the rest of the trace
/// is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BeatError {
    #[error("window [{start}, {end}] around R at {r_index} exceeds signal of {len} samples")]
    WindowOutOfBounds {
        r_index: usize,
        start: isize,
        end: isize,
        len: usize,
    },
    #[error("empty search range for {landmark} around R at {r_index}")]
    DegenerateSearchRange {
        r_index: usize,
        landmark: LandmarkKind,
    },
}

impl BeatError {
    pub fn r_index(&self) -> usize {
        match self {
            BeatError::WindowOutOfBounds { r_index, .. } => *r_index,
            BeatError::DegenerateSearchRange { r_index, .. } => *r_index,
        }
    }
}
