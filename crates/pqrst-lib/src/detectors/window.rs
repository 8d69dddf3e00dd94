use crate::{config::BeatGeometry, error::BeatError, signal::Events};
use log::warn;

/// Shared window shape: offsets `-left ..= right` around each R sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatWindow {
    pub left: usize,
    pub right: usize,
}

impl BeatWindow {
    pub fn from_geometry(geometry: &BeatGeometry) -> Self {
        Self {
            left: geometry.left,
            right: geometry.right,
        }
    }

    pub fn len(&self) -> usize {
        self.left + self.right + 1
    }

    /// In-window position of the R sample (offset 0).
    pub fn center(&self) -> usize {
        self.left
    }

    /// Copy the samples around `r_index`. A window that leaves the signal is
    /// an error; it is never clipped.
    pub fn extract<'a>(
        &self,
        samples: &'a [f64],
        r_index: usize,
    ) -> Result<BeatSegment<'a>, BeatError> {
        let start = r_index as isize - self.left as isize;
        let end = r_index as isize + self.right as isize;
        if start < 0 || end >= samples.len() as isize {
            return Err(BeatError::WindowOutOfBounds {
                r_index,
                start,
                end,
                len: samples.len(),
            });
        }
        let start = start as usize;
        Ok(BeatSegment {
            r_index,
            start,
            center: self.center(),
            samples: &samples[start..=end as usize],
        })
    }
}

/// One beat's slice of the trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatSegment<'a> {
    pub r_index: usize,
    /// Absolute index of the first window sample.
    pub start: usize,
    /// In-window position of the R sample.
    pub center: usize,
    pub samples: &'a [f64],
}

impl BeatSegment<'_> {
    /// Absolute sample index of an in-window position.
    pub fn absolute(&self, position: usize) -> usize {
        self.start + position
    }
}

/// Carve a window around every R peak. Beats whose window runs off the
/// trace are returned separately.
pub fn build_segments<'a>(
    samples: &'a [f64],
    r_peaks: &Events,
    window: &BeatWindow,
) -> (Vec<BeatSegment<'a>>, Vec<BeatError>) {
    let mut segments = Vec::with_capacity(r_peaks.len());
    let mut dropped = Vec::new();
    for &r in &r_peaks.indices {
        match window.extract(samples, r) {
            Ok(segment) => segments.push(segment),
            Err(err) => {
                warn!("dropping beat: {}", err);
                dropped.push(err);
            }
        }
    }
    (segments, dropped)
}
