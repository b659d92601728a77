//! Rational beat timing for chord sequences
//!
//! Chord starts and durations are kept as exact rationals so per-chord
//! durations (uniform or randomized in quarter-beat steps) add up without
//! drift before being turned into MIDI ticks or annotation seconds.

use num_rational::Ratio;

/// Exact time in beats from the start of the file
pub type Beats = Ratio<i64>;

/// A half-open span [start, end) occupied by one chord
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: Beats,
    pub end: Beats,
}

impl Span {
    pub fn new(start: Beats, end: Beats) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Beats {
        self.end - self.start
    }
}

/// Helper to create Beats from a ratio n/d
#[inline]
pub fn time(n: i64, d: i64) -> Beats {
    Ratio::new(n, d)
}

/// Whole beats
#[inline]
pub fn beats(n: i64) -> Beats {
    Ratio::from_integer(n)
}

/// Lay chords end to end starting at beat 0
pub fn timeline(durations: &[Beats]) -> Vec<Span> {
    let mut cursor = beats(0);
    durations
        .iter()
        .map(|&duration| {
            let span = Span::new(cursor, cursor + duration);
            cursor = span.end;
            span
        })
        .collect()
}

/// `count` chords of identical length
pub fn uniform(count: usize, duration: Beats) -> Vec<Beats> {
    vec![duration; count]
}

/// Convert beats to MIDI ticks, rounding to the nearest tick
pub fn to_ticks(t: Beats, ticks_per_quarter: u16) -> u32 {
    let ticks = (t * Ratio::from_integer(ticks_per_quarter as i64)).round();
    ticks.to_integer().max(0) as u32
}

/// Convert beats to seconds at a tempo in beats per minute
pub fn to_seconds(t: Beats, tempo_bpm: u32) -> f64 {
    to_f64(t * Ratio::new(60, tempo_bpm.max(1) as i64))
}

/// Convert rational to f64
#[inline]
pub fn to_f64(t: Beats) -> f64 {
    *t.numer() as f64 / *t.denom() as f64
}

/// Quantize a length in beats to the nearest quarter beat (never below one quarter)
pub fn quantize_quarters(value: f64) -> Beats {
    let quarters = (value * 4.0).round().max(1.0) as i64;
    time(quarters, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_arithmetic() {
        let a = time(1, 4);
        let b = time(3, 4);
        assert_eq!(a + b, beats(1));
    }

    #[test]
    fn test_timeline_is_contiguous() {
        let spans = timeline(&[beats(2), time(3, 2), beats(2)]);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, beats(0));
        assert_eq!(spans[1].start, beats(2));
        assert_eq!(spans[2].start, time(7, 2));
        assert_eq!(spans[2].end, time(11, 2));
        assert_eq!(spans[1].duration(), time(3, 2));
    }

    #[test]
    fn test_uniform() {
        assert_eq!(uniform(3, beats(2)), vec![beats(2); 3]);
    }

    #[test]
    fn test_to_ticks() {
        assert_eq!(to_ticks(beats(2), 480), 960);
        assert_eq!(to_ticks(time(1, 4), 480), 120);
        assert_eq!(to_ticks(time(1, 3), 480), 160);
    }

    #[test]
    fn test_to_seconds() {
        assert!((to_seconds(beats(2), 60) - 2.0).abs() < 1e-9);
        assert!((to_seconds(beats(2), 120) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantize_quarters() {
        assert_eq!(quantize_quarters(1.3), time(5, 4));
        assert_eq!(quantize_quarters(0.01), time(1, 4));
        assert_eq!(quantize_quarters(2.0), beats(2));
    }
}
