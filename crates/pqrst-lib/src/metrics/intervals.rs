use crate::{detectors::pqrst::PqrstComplexes, signal::RRSeries};
use serde::{Deserialize, Serialize};

/// Peak-to-peak spans of one beat, in the trace's time unit. Onsets and
/// offsets are not detected, so these are measured between landmark peaks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatIntervals {
    pub r_time: f64,
    /// P peak to Q trough.
    pub pq: f64,
    /// Q trough to S trough.
    pub qrs: f64,
    /// Q trough to T peak.
    pub qt: f64,
    /// Bazett-corrected QT using the preceding RR interval.
    pub qtc: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub n: usize,
    pub rr: RRSeries,
    pub mean_rr: f64,
    pub mean_pq: f64,
    pub mean_qrs: f64,
    pub mean_qt: f64,
    pub heart_rate_hz: f64,
    pub beats: Vec<BeatIntervals>,
}

pub fn beat_intervals(complexes: &PqrstComplexes) -> Vec<BeatIntervals> {
    let c = complexes;
    (0..c.len())
        .map(|i| {
            let qt = c.t[i].time - c.q[i].time;
            let qtc = i
                .checked_sub(1)
                .map(|prev| c.r[i].time - c.r[prev].time)
                .filter(|rr| *rr > 0.0)
                .map(|rr| qt / rr.sqrt());
            BeatIntervals {
                r_time: c.r[i].time,
                pq: c.q[i].time - c.p[i].time,
                qrs: c.s[i].time - c.q[i].time,
                qt,
                qtc,
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

pub fn summarize(complexes: &PqrstComplexes) -> IntervalSummary {
    let beats = beat_intervals(complexes);
    let r_times: Vec<f64> = complexes.r.iter().map(|l| l.time).collect();
    let rr = RRSeries::from_times(&r_times);
    let mean_rr = mean(rr.rr.iter().copied());
    let heart_rate_hz = if mean_rr > 0.0 { 1.0 / mean_rr } else { 0.0 };
    IntervalSummary {
        n: beats.len(),
        mean_rr,
        mean_pq: mean(beats.iter().map(|b| b.pq)),
        mean_qrs: mean(beats.iter().map(|b| b.qrs)),
        mean_qt: mean(beats.iter().map(|b| b.qt)),
        heart_rate_hz,
        rr,
        beats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::pqrst::Landmark;

    fn at(time: f64) -> Landmark {
        Landmark {
            index: 0,
            amplitude: 0.0,
            time,
        }
    }

    fn complexes(r_times: &[f64]) -> PqrstComplexes {
        let mut c = PqrstComplexes::default();
        for &r in r_times {
            c.p.push(at(r - 0.2));
            c.q.push(at(r - 0.05));
            c.r.push(at(r));
            c.s.push(at(r + 0.05));
            c.t.push(at(r + 0.3));
        }
        c
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn per_beat_spans() {
        let beats = beat_intervals(&complexes(&[1.0, 2.0]));
        assert_eq!(beats.len(), 2);
        assert!(close(beats[0].pq, 0.15));
        assert!(close(beats[0].qrs, 0.1));
        assert!(close(beats[0].qt, 0.35));
        assert_eq!(beats[0].qtc, None);
        assert!(close(beats[1].qtc.unwrap(), 0.35));
    }

    #[test]
    fn summary_derives_rate_from_rr() {
        let summary = summarize(&complexes(&[0.5, 1.3, 2.1, 2.9]));
        assert_eq!(summary.n, 4);
        assert_eq!(summary.rr.rr.len(), 3);
        assert!(close(summary.mean_rr, 0.8));
        assert!(close(summary.heart_rate_hz, 1.25));
        assert!(close(summary.mean_qt, 0.35));
    }

    #[test]
    fn empty_complexes_give_zeroed_summary() {
        let summary = summarize(&PqrstComplexes::default());
        assert_eq!(summary.n, 0);
        assert!(summary.rr.rr.is_empty());
        assert_eq!(summary.mean_rr, 0.0);
        assert_eq!(summary.heart_rate_hz, 0.0);
    }
}
