//! MIDI to WAV conversion through an external synthesizer (timidity by default)
//!
//! Each file is rendered by its own process. Folders are converted on a small
//! worker pool fed through a crossbeam channel; a failing file is logged and
//! counted, never fatal to the batch.

use crate::config::AudioConfig;
use crate::error::{ExportError, Result};
use crate::export::{collect_midi_files, file_stem};
use crossbeam_channel::unbounded;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;

/// An external MIDI renderer invoked as `<program> <in> -Ow1 -s <rate> -o <out>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    pub program: String,
    pub sample_rate: u32,
}

impl Synthesizer {
    pub fn new(program: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            program: program.into(),
            sample_rate,
        }
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.program.clone(), config.sample_rate)
    }

    /// Command-line arguments for one conversion
    pub fn args(&self, midi: &Path, wav: &Path) -> Vec<OsString> {
        vec![
            midi.as_os_str().to_owned(),
            "-Ow1".into(),
            "-s".into(),
            self.sample_rate.to_string().into(),
            "-o".into(),
            wav.as_os_str().to_owned(),
        ]
    }

    /// Render `midi` into `wav`, waiting for the process to finish
    pub fn render(&self, midi: &Path, wav: &Path) -> Result<()> {
        let failed = |reason: String| ExportError::SynthesizerFailed {
            program: self.program.clone(),
            input: midi.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.program)
            .args(self.args(midi, wav))
            .output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{} {}", output.status, stderr.trim())));
        }
        Ok(())
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::from_config(&AudioConfig::default())
    }
}

/// `<wav_dir>/<stem>.wav`
pub fn wav_path(midi: &Path, wav_dir: &Path) -> PathBuf {
    wav_dir.join(format!("{}.wav", file_stem(midi)))
}

/// Convert one file and return the path of the WAV written
pub fn midi_to_wav(midi: &Path, wav_dir: &Path, synth: &Synthesizer) -> Result<PathBuf> {
    std::fs::create_dir_all(wav_dir).map_err(|e| ExportError::io(wav_dir, e))?;
    let wav = wav_path(midi, wav_dir);
    synth.render(midi, &wav)?;
    Ok(wav)
}

/// Outcome of a folder conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub converted: Vec<PathBuf>,
    /// Input file and the reason it failed
    pub failed: Vec<(PathBuf, String)>,
}

impl ConversionReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// Convert every `*.mid` below `folder` using `workers` threads.
/// A missing or empty folder only logs a warning.
pub fn convert_folder(
    folder: &Path,
    wav_dir: &Path,
    synth: &Synthesizer,
    workers: usize,
) -> Result<ConversionReport> {
    let mut report = ConversionReport::default();
    if !folder.exists() {
        log::warn!("folder {} does not exist", folder.display());
        return Ok(report);
    }
    let files = collect_midi_files(folder)?;
    if files.is_empty() {
        log::warn!("no .mid files in {}", folder.display());
        return Ok(report);
    }

    log::info!(
        "converting {} files with {} ({} workers)",
        files.len(),
        synth.program,
        workers.max(1)
    );

    let (job_tx, job_rx) = unbounded::<PathBuf>();
    let (done_tx, done_rx) = unbounded::<(PathBuf, Result<PathBuf>)>();
    for file in files {
        if job_tx.send(file).is_err() {
            break;
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            let jobs = job_rx.clone();
            let done = done_tx.clone();
            scope.spawn(move || {
                for midi in jobs.iter() {
                    let result = midi_to_wav(&midi, wav_dir, synth);
                    if done.send((midi, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    for (midi, result) in done_rx.iter() {
        match result {
            Ok(wav) => {
                log::debug!("converted {} => {}", midi.display(), wav.display());
                report.converted.push(wav);
            }
            Err(e) => {
                log::warn!("{}", e);
                report.failed.push((midi, e.to_string()));
            }
        }
    }
    report.converted.sort();
    report.failed.sort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timidity_arguments() {
        let synth = Synthesizer::default();
        let args = synth.args(Path::new("in/C-1-251-0.mid"), Path::new("out/C-1-251-0.wav"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["in/C-1-251-0.mid", "-Ow1", "-s", "16000", "-o", "out/C-1-251-0.wav"]
        );
        assert_eq!(synth.program, "timidity");
    }

    #[test]
    fn test_wav_path_uses_stem() {
        assert_eq!(
            wav_path(Path::new("data/midi/251/Eb-3-251-4.mid"), Path::new("data/wav")),
            PathBuf::from("data/wav/Eb-3-251-4.wav")
        );
    }

    #[test]
    fn test_missing_program_is_reported_not_fatal() {
        let root = std::env::temp_dir().join(format!("chordsweep-convert-{}", std::process::id()));
        let midi_dir = root.join("midi");
        std::fs::create_dir_all(&midi_dir).unwrap();
        for name in ["a.mid", "b.mid", "c.mid"] {
            std::fs::write(midi_dir.join(name), b"").unwrap();
        }

        let synth = Synthesizer::new("chordsweep-no-such-synth", 16000);
        let report = convert_folder(&midi_dir, &root.join("wav"), &synth, 2).unwrap();
        assert_eq!(report.converted.len(), 0);
        assert_eq!(report.failed.len(), 3);
        assert_eq!(report.total(), 3);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_folder_is_empty_report() {
        let report = convert_folder(
            Path::new("/nonexistent/chordsweep"),
            Path::new("/nonexistent/wav"),
            &Synthesizer::default(),
            4,
        )
        .unwrap();
        assert_eq!(report, ConversionReport::default());
    }
}
