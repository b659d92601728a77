//! Dataset generation: one MIDI file per realization of a progression.

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::export::durations::{self, DurationSampler, DurationTable, SIDECAR_NAME};
use crate::export::midi::{write_realization, NoteStyle};
use chordsweep_core::types::time::{self, Beats};
use chordsweep_core::{CommonProgressions, ProgressionSpec, Sweep};
use std::path::PathBuf;

/// Bounds and seed for randomized chord lengths
#[derive(Debug, Clone, PartialEq)]
pub struct RandomTiming {
    pub min_beats: f64,
    pub max_beats: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub midi_dir: PathBuf,
    pub sweep: Sweep,
    pub style: NoteStyle,
    /// Length of every chord unless `randomize` is set
    pub chord_beats: Beats,
    pub randomize: Option<RandomTiming>,
}

impl GenerateOptions {
    pub fn from_config(config: &Config) -> Self {
        let randomize = config.timing.randomize.then(|| RandomTiming {
            min_beats: config.timing.min_beats,
            max_beats: config.timing.max_beats,
            seed: config.timing.seed,
        });
        Self {
            midi_dir: config.paths.midi_dir.clone(),
            sweep: config.sweep.clone(),
            style: NoteStyle {
                tempo_bpm: config.midi.tempo,
                velocity: config.midi.velocity,
            },
            chord_beats: time::quantize_quarters(config.midi.chord_beats),
            randomize,
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub name: String,
    pub output_dir: PathBuf,
    pub files: usize,
    /// Present when durations were randomized
    pub sidecar: Option<PathBuf>,
}

/// Progression names become folder and file names, so keep them to a safe set
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '#'));
    if valid {
        Ok(())
    } else {
        Err(ExportError::InvalidName(name.to_string()))
    }
}

/// Number of files `generate_progression` would write
pub fn count(progression: &str, sweep: &Sweep) -> Result<usize> {
    let spec = ProgressionSpec::parse(progression)?;
    sweep.validate()?;
    Ok(spec.realization_count(sweep))
}

/// Write `<midi_dir>/<name>/<start>-<name>-<index>.mid` for every realization.
///
/// The progression, name and sweep are all checked before the first file
/// is written.
pub fn generate_progression(
    progression: &str,
    name: &str,
    options: &GenerateOptions,
) -> Result<GenerationSummary> {
    validate_name(name)?;
    let spec = ProgressionSpec::parse(progression)?;
    let enumeration = spec.enumerate(&options.sweep)?;

    let output_dir = options.midi_dir.join(name);
    std::fs::create_dir_all(&output_dir).map_err(|e| ExportError::io(&output_dir, e))?;
    log::info!(
        "generating {} files for '{}' into {}",
        enumeration.len(),
        spec,
        output_dir.display()
    );

    let mut sampler = options
        .randomize
        .as_ref()
        .map(|r| DurationSampler::new(r.min_beats, r.max_beats, r.seed));
    let mut table = DurationTable::new();
    let uniform = time::uniform(spec.len(), options.chord_beats);

    let mut files = 0;
    for realization in enumeration {
        let stem = realization.file_stem(name);
        let sampled;
        let chord_lengths: &[Beats] = match sampler.as_mut() {
            Some(sampler) => {
                sampled = sampler.sample_n(spec.len());
                table.insert(
                    stem.clone(),
                    durations::to_seconds(&sampled, options.style.tempo_bpm),
                );
                &sampled
            }
            None => &uniform,
        };

        let path = output_dir.join(format!("{}.mid", stem));
        write_realization(&path, &realization.chords, chord_lengths, &options.style)?;
        files += 1;
    }

    let sidecar = match sampler {
        Some(_) => {
            let path = output_dir.join(SIDECAR_NAME);
            table.save(&path)?;
            Some(path)
        }
        None => None,
    };

    log::info!("wrote {} files for '{}'", files, name);
    Ok(GenerationSummary {
        name: name.to_string(),
        output_dir,
        files,
        sidecar,
    })
}

/// Generate every progression of the built-in catalogue under its short name
pub fn generate_catalogue(options: &GenerateOptions) -> Result<Vec<GenerationSummary>> {
    CommonProgressions::ALL
        .iter()
        .map(|(name, progression)| generate_progression(progression, name, options))
        .collect()
}
