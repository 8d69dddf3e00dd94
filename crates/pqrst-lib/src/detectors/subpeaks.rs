use crate::{
    config::SearchScope,
    detectors::window::BeatSegment,
    error::{BeatError, LandmarkKind},
};
use std::ops::{Bound, RangeBounds};

/// In-window positions of the five landmarks of one beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPeakOffsets {
    pub p: usize,
    pub q: usize,
    pub r: usize,
    pub s: usize,
    pub t: usize,
}

fn extremum<R, F>(data: &[f64], range: R, better: F) -> Option<usize>
where
    R: RangeBounds<usize>,
    F: Fn(f64, f64) -> bool,
{
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => data.len(),
    }
    .min(data.len());
    if start >= end {
        return None;
    }
    let mut best = start;
    for (i, &value) in data[start..end].iter().enumerate().skip(1) {
        if better(value, data[best]) {
            best = start + i;
        }
    }
    Some(best)
}

/// Position of the smallest sample in `range`; the first one wins on ties.
pub fn argmin<R: RangeBounds<usize>>(data: &[f64], range: R) -> Option<usize> {
    extremum(data, range, |candidate, best| candidate < best)
}

/// Position of the largest sample in `range`; the first one wins on ties.
pub fn argmax<R: RangeBounds<usize>>(data: &[f64], range: R) -> Option<usize> {
    extremum(data, range, |candidate, best| candidate > best)
}

/// Run the dependent landmark searches inside one beat window:
///
/// 1. coarse Q: minimum before R
/// 2. S: minimum over `scope`
/// 3. P: maximum from the window start up to the coarse Q
/// 4. Q: minimum between P and R, replacing the coarse estimate
/// 5. T: maximum from S to the window end
pub fn locate_sub_peaks(
    segment: &BeatSegment<'_>,
    scope: SearchScope,
) -> Result<SubPeakOffsets, BeatError> {
    let data = segment.samples;
    let center = segment.center;
    let degenerate = |landmark| BeatError::DegenerateSearchRange {
        r_index: segment.r_index,
        landmark,
    };

    let for_p = argmin(data, ..center).ok_or_else(|| degenerate(LandmarkKind::Q))?;
    let for_t = match scope {
        SearchScope::FullWindow => argmin(data, ..),
        SearchScope::AfterR => argmin(data, center..),
    }
    .ok_or_else(|| degenerate(LandmarkKind::S))?;
    let for_q = argmax(data, ..=for_p).ok_or_else(|| degenerate(LandmarkKind::P))?;
    let q = argmin(data, for_q..=center).ok_or_else(|| degenerate(LandmarkKind::Q))?;
    let t = argmax(data, for_t..).ok_or_else(|| degenerate(LandmarkKind::T))?;

    Ok(SubPeakOffsets {
        p: for_q,
        q,
        r: center,
        s: for_t,
        t,
    })
}
