//! Configuration for dataset generation
//!
//! Every section is `#[serde(default)]`, so a config file only needs the
//! values it overrides.

use anyhow::{bail, Context};
use chordsweep_core::Sweep;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub paths: PathsConfig,
    pub midi: MidiConfig,
    pub sweep: Sweep,
    pub audio: AudioConfig,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathsConfig::default(),
            midi: MidiConfig::default(),
            sweep: Sweep::default_range(),
            audio: AudioConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// Output directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub midi_dir: PathBuf,
    pub wav_dir: PathBuf,
    pub jams_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            midi_dir: PathBuf::from("data/midi"),
            wav_dir: PathBuf::from("data/wav"),
            jams_dir: PathBuf::from("data/jams"),
        }
    }
}

/// MIDI rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    pub tempo: u32,
    pub velocity: u8,
    /// Length of every chord when durations are not randomized
    pub chord_beats: f64,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            tempo: 60,
            velocity: 100,
            chord_beats: 2.0,
        }
    }
}

/// External synthesizer used for WAV conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub program: String,
    pub sample_rate: u32,
    pub workers: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            program: "timidity".to_string(),
            sample_rate: 16000,
            workers: 4,
        }
    }
}

/// Randomized per-chord durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub randomize: bool,
    pub min_beats: f64,
    pub max_beats: f64,
    pub seed: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            randomize: false,
            min_beats: 1.0,
            max_beats: 3.0,
            seed: 0,
        }
    }
}

/// Slowest tempo whose microseconds-per-quarter still fit a 24-bit tempo event
const MIN_TEMPO: u32 = 4;

/// Longest chord, in beats, that generation accepts
pub const MAX_CHORD_BEATS: f64 = 64.0;

/// Shortest chord: one quarter beat
const MIN_CHORD_BEATS: f64 = 0.25;

/// Validate configuration values
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if !(MIN_TEMPO..=1000).contains(&config.midi.tempo) {
        bail!("midi.tempo must be between {} and 1000 BPM", MIN_TEMPO);
    }
    if config.midi.velocity == 0 || config.midi.velocity > 127 {
        bail!("midi.velocity must be between 1 and 127");
    }
    if !(MIN_CHORD_BEATS..=MAX_CHORD_BEATS).contains(&config.midi.chord_beats) {
        bail!(
            "midi.chord_beats must be between {} and {} beats",
            MIN_CHORD_BEATS,
            MAX_CHORD_BEATS
        );
    }

    config
        .sweep
        .validate()
        .context("sweep range is not usable")?;

    if config.audio.program.trim().is_empty() {
        bail!("audio.program must name a synthesizer");
    }
    if config.audio.sample_rate == 0 {
        bail!("audio.sample_rate must be positive");
    }
    if config.audio.workers == 0 {
        bail!("audio.workers must be at least 1");
    }

    if config.timing.min_beats < MIN_CHORD_BEATS {
        bail!("timing.min_beats must be at least a quarter beat");
    }
    if config.timing.max_beats > MAX_CHORD_BEATS {
        bail!("timing.max_beats must be at most {} beats", MAX_CHORD_BEATS);
    }
    if config.timing.min_beats > config.timing.max_beats {
        bail!("timing.min_beats must be <= timing.max_beats");
    }

    Ok(())
}

/// Load configuration from JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Save configuration to JSON file
pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path.as_ref(), content)
        .with_context(|| format!("failed to write config {}", path.as_ref().display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.midi.tempo, 60);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.paths.wav_dir, PathBuf::from("data/wav"));
        assert_eq!(config.sweep.low_octave, 1);
        assert_eq!(config.sweep.high_octave, 6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "midi": { "tempo": 90 }, "sweep": { "high_octave": 3 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.midi.tempo, 90);
        assert_eq!(config.midi.velocity, 100);
        assert_eq!(config.sweep.low_octave, 1);
        assert_eq!(config.sweep.high_octave, 3);
        assert_eq!(config.sweep.pitch_classes.len(), 12);
        assert_eq!(config.audio.program, "timidity");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.midi.velocity = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.sweep.high_octave = 8;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.timing.min_beats = 4.0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.audio.workers = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_chord_lengths_are_bounded() {
        let mut config = Config::default();
        config.timing.randomize = true;
        config.timing.max_beats = 1e17;
        assert!(validate_config(&config).is_err());

        config.timing.max_beats = MAX_CHORD_BEATS;
        assert!(validate_config(&config).is_ok());

        let mut config = Config::default();
        config.midi.chord_beats = 1e17;
        assert!(validate_config(&config).is_err());
        config.midi.chord_beats = 0.1;
        assert!(validate_config(&config).is_err());
        config.midi.chord_beats = MAX_CHORD_BEATS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_repeated_pitch_classes_rejected() {
        let json = r#"{ "sweep": { "low_octave": 2, "high_octave": 2, "pitch_classes": [0, 0] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(validate_config(&config).is_err());

        let json = r#"{ "sweep": { "low_octave": 2, "high_octave": 2, "pitch_classes": [0, 7] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(validate_config(&config).is_ok());
    }
}
