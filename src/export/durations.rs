//! Per-chord durations: seeded random sampling and the `durations.json` sidecar.
//!
//! When durations are randomized at generation time, the seconds of every
//! chord are recorded next to the MIDI files so the annotation writer can
//! reproduce the same timeline later.

use crate::error::{ExportError, Result};
use chordsweep_core::types::time::{self, Beats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the sidecar inside a progression's MIDI folder
pub const SIDECAR_NAME: &str = "durations.json";

/// File stem -> chord durations in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationTable {
    entries: BTreeMap<String, Vec<f64>>,
}

impl DurationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stem: impl Into<String>, seconds: Vec<f64>) {
        self.entries.insert(stem.into(), seconds);
    }

    pub fn get(&self, stem: &str) -> Option<&[f64]> {
        self.entries.get(stem).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load `<dir>/durations.json` if it exists
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(SIDECAR_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let table = Self::load(&path)?;
        log::debug!("loaded {} durations from {}", table.len(), path.display());
        Ok(Some(table))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ExportError::io(path, e))
    }
}

/// Draws chord lengths uniformly from a beat range in quarter-beat steps
pub struct DurationSampler {
    rng: StdRng,
    min_quarters: i64,
    max_quarters: i64,
}

impl DurationSampler {
    /// Bounds are rounded to the nearest quarter beat, never below one quarter
    pub fn new(min_beats: f64, max_beats: f64, seed: u64) -> Self {
        let min_quarters = (min_beats * 4.0).round().max(1.0) as i64;
        let max_quarters = ((max_beats * 4.0).round() as i64).max(min_quarters);
        Self {
            rng: StdRng::seed_from_u64(seed),
            min_quarters,
            max_quarters,
        }
    }

    pub fn sample(&mut self) -> Beats {
        let quarters = self.rng.random_range(self.min_quarters..=self.max_quarters);
        time::time(quarters, 4)
    }

    pub fn sample_n(&mut self, count: usize) -> Vec<Beats> {
        (0..count).map(|_| self.sample()).collect()
    }
}

/// Chord lengths in seconds at `tempo_bpm`
pub fn to_seconds(durations: &[Beats], tempo_bpm: u32) -> Vec<f64> {
    durations
        .iter()
        .map(|&d| time::to_seconds(d, tempo_bpm))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_is_reproducible() {
        let mut a = DurationSampler::new(1.0, 3.0, 42);
        let mut b = DurationSampler::new(1.0, 3.0, 42);
        assert_eq!(a.sample_n(20), b.sample_n(20));
    }

    #[test]
    fn test_samples_stay_in_range_on_quarter_grid() {
        let mut sampler = DurationSampler::new(1.0, 3.0, 7);
        for d in sampler.sample_n(200) {
            assert!(d >= time::beats(1) && d <= time::beats(3));
            assert_eq!((d * time::beats(4)).denom(), &1);
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut sampler = DurationSampler::new(2.0, 2.0, 0);
        assert!(sampler.sample_n(5).iter().all(|&d| d == time::beats(2)));

        let mut inverted = DurationSampler::new(2.0, 1.0, 0);
        assert_eq!(inverted.sample(), time::beats(2));
    }

    #[test]
    fn test_seconds_follow_tempo() {
        let secs = to_seconds(&[time::beats(2), time::time(3, 2)], 120);
        assert_eq!(secs, vec![1.0, 0.75]);
    }

    #[test]
    fn test_table_json_shape() {
        let mut table = DurationTable::new();
        table.insert("C-1-251-0", vec![2.0, 1.5, 2.25]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"C-1-251-0":[2.0,1.5,2.25]}"#);

        let back: DurationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("C-1-251-0"), Some(&[2.0, 1.5, 2.25][..]));
        assert_eq!(back.get("missing"), None);
    }
}
