//! File outputs: MIDI realizations, the duration sidecar and JAMS annotations

pub mod durations;
pub mod jams;
pub mod midi;

use crate::error::{ExportError, Result};
use std::path::{Path, PathBuf};

pub use durations::{DurationSampler, DurationTable};
pub use jams::JamsDocument;
pub use midi::{write_realization, NoteStyle};

/// Every `*.mid` below `folder`, recursively, in sorted order.
/// A missing folder yields an empty list.
pub fn collect_midi_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if folder.is_dir() {
        walk(folder, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| ExportError::io(dir, e))?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "mid") {
            files.push(path);
        }
    }
    Ok(())
}

/// File name without extension, lossily decoded
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
