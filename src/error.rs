//! Error types for the file-producing side of chordsweep

use chordsweep_core::TheoryError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while writing MIDI, sidecar or annotation files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value midly cannot encode (tempo, velocity, tick delta)
    #[error("MIDI encoding error: {0}")]
    Midi(String),

    #[error("pitch {0} is outside the MIDI range 0-127")]
    PitchOutOfRange(i16),

    #[error("invalid progression name '{0}': use letters, digits, '-', '_' or '#'")]
    InvalidName(String),

    #[error("{program} failed on {}: {reason}", input.display())]
    SynthesizerFailed {
        program: String,
        input: PathBuf,
        reason: String,
    },

    #[error(transparent)]
    Theory(#[from] TheoryError),
}

impl ExportError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ExportError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
