//! JAMS chord annotations
//!
//! One document per generated MIDI file. The chord labels come from the
//! numeral sequence and key given by the user; the timing comes from the
//! duration sidecar when one exists, otherwise a fixed length per chord.

use crate::error::{ExportError, Result};
use crate::export::{collect_midi_files, file_stem, DurationTable};
use chordsweep_core::{translate_all, ChordLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const JAMS_VERSION: &str = "0.3.4";

/// Namespace of chord annotations
pub const CHORD_NAMESPACE: &str = "chord";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JamsDocument {
    pub annotations: Vec<Annotation>,
    pub file_metadata: FileMetadata,
    pub sandbox: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub title: String,
    pub artist: String,
    pub release: String,
    pub duration: f64,
    pub identifiers: serde_json::Map<String, serde_json::Value>,
    pub jams_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotation_metadata: AnnotationMetadata,
    pub namespace: String,
    pub data: Vec<Observation>,
    pub sandbox: AnnotationSandbox,
    pub time: f64,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    pub curator: Curator,
    pub annotator: serde_json::Map<String, serde_json::Value>,
    pub version: String,
    pub corpus: String,
    pub annotation_tools: String,
    pub annotation_rules: String,
    pub validation: String,
    pub data_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curator {
    pub name: String,
    pub email: String,
}

/// One timed chord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: f64,
    pub duration: f64,
    pub value: String,
    pub confidence: Option<f64>,
}

/// The numerals and key the labels were derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSandbox {
    pub roman_numerals: Vec<String>,
    pub key: String,
}

/// Build a document from already translated labels and per-chord seconds.
/// Labels without a matching duration are dropped.
pub fn build_document(
    title: &str,
    numerals: &[String],
    key: &str,
    labels: &[ChordLabel],
    seconds: &[f64],
) -> JamsDocument {
    let mut start = 0.0;
    let data: Vec<Observation> = labels
        .iter()
        .zip(seconds)
        .map(|(label, &duration)| {
            let observation = Observation {
                time: start,
                duration,
                value: label.to_string(),
                confidence: None,
            };
            start += duration;
            observation
        })
        .collect();

    let annotation = Annotation {
        annotation_metadata: AnnotationMetadata::default(),
        namespace: CHORD_NAMESPACE.to_string(),
        data,
        sandbox: AnnotationSandbox {
            roman_numerals: numerals.to_vec(),
            key: key.to_string(),
        },
        time: 0.0,
        duration: None,
    };

    JamsDocument {
        annotations: vec![annotation],
        file_metadata: FileMetadata {
            title: title.to_string(),
            artist: String::new(),
            release: String::new(),
            duration: start,
            identifiers: serde_json::Map::new(),
            jams_version: JAMS_VERSION.to_string(),
        },
        sandbox: serde_json::Map::new(),
    }
}

pub fn write_document(document: &JamsDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content).map_err(|e| ExportError::io(path, e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// What to annotate and where to put it
#[derive(Debug, Clone)]
pub struct AnnotationJob<'a> {
    /// `-` separated numerals, e.g. `ii,7-V,7-I,maj7`
    pub numerals: &'a str,
    pub key: &'a str,
    /// Stored as the document title
    pub title: &'a str,
    pub jams_dir: &'a Path,
    /// Chord length used when no sidecar entry exists
    pub default_seconds: f64,
}

/// Write `<jams_dir>/<stem>.jams` for every `*.mid` below `folder`.
///
/// Numerals and key are checked before any file is written. A missing or
/// empty folder only logs a warning.
pub fn annotate_folder(folder: &Path, job: &AnnotationJob) -> Result<Vec<PathBuf>> {
    let labels = translate_all(job.numerals, job.key)?;
    let numerals: Vec<String> = job
        .numerals
        .split('-')
        .map(|s| s.trim().to_string())
        .collect();

    if !folder.exists() {
        log::warn!("folder {} does not exist", folder.display());
        return Ok(Vec::new());
    }
    let midi_files = collect_midi_files(folder)?;
    if midi_files.is_empty() {
        log::warn!("no .mid files in {}", folder.display());
        return Ok(Vec::new());
    }

    let mut sidecars: BTreeMap<PathBuf, Option<DurationTable>> = BTreeMap::new();
    let default_seconds = vec![job.default_seconds; labels.len()];
    let mut written = Vec::with_capacity(midi_files.len());

    for midi in &midi_files {
        let stem = file_stem(midi);
        let dir = midi.parent().unwrap_or(folder).to_path_buf();
        if !sidecars.contains_key(&dir) {
            let table = DurationTable::load_from_dir(&dir)?;
            sidecars.insert(dir.clone(), table);
        }

        let recorded = sidecars
            .get(&dir)
            .and_then(|table| table.as_ref())
            .and_then(|table| table.get(&stem));
        let seconds = match recorded {
            Some(seconds) if seconds.len() == labels.len() => seconds,
            Some(seconds) => {
                log::warn!(
                    "{}: sidecar has {} durations for {} chords, using defaults",
                    stem,
                    seconds.len(),
                    labels.len()
                );
                default_seconds.as_slice()
            }
            None => default_seconds.as_slice(),
        };

        let document = build_document(job.title, &numerals, job.key, &labels, seconds);
        let path = job.jams_dir.join(format!("{}.jams", stem));
        write_document(&document, &path)?;
        written.push(path);
    }

    log::info!(
        "wrote {} annotations to {}",
        written.len(),
        job.jams_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JamsDocument {
        let labels = translate_all("ii,min7-V,7-I,maj7", "C").unwrap();
        let numerals = vec![
            "ii,min7".to_string(),
            "V,7".to_string(),
            "I,maj7".to_string(),
        ];
        build_document("251", &numerals, "C", &labels, &[2.0, 1.5, 2.5])
    }

    #[test]
    fn test_timeline_and_labels() {
        let doc = sample();
        assert_eq!(doc.annotations.len(), 1);
        let data = &doc.annotations[0].data;
        let values: Vec<&str> = data.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["D:min7", "G:7", "C:maj7"]);
        assert_eq!(data[1].time, 2.0);
        assert_eq!(data[2].time, 3.5);
        assert_eq!(doc.file_metadata.duration, 6.0);
        assert_eq!(doc.file_metadata.title, "251");
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["annotations"][0]["namespace"], "chord");
        assert_eq!(value["annotations"][0]["sandbox"]["key"], "C");
        assert_eq!(
            value["annotations"][0]["sandbox"]["roman_numerals"][1],
            "V,7"
        );
        assert!(value["annotations"][0]["data"][0]["confidence"].is_null());
        assert_eq!(value["file_metadata"]["jams_version"], JAMS_VERSION);
    }

    #[test]
    fn test_document_parses_back() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        let back: JamsDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_bad_key_fails_before_writing() {
        let job = AnnotationJob {
            numerals: "ii-V-I",
            key: "H",
            title: "251",
            jams_dir: Path::new("/nonexistent/jams"),
            default_seconds: 2.0,
        };
        assert!(matches!(
            annotate_folder(Path::new("/nonexistent/midi"), &job),
            Err(ExportError::Theory(_))
        ));
    }
}
