use chordsweep::config::{load_config, save_config, Config};
use chordsweep::export::durations::{DurationTable, SIDECAR_NAME};
use chordsweep::export::jams::{annotate_folder, AnnotationJob, JamsDocument};
use chordsweep::generate::{generate_progression, GenerateOptions, RandomTiming};
use chordsweep_core::{PitchClass, Sweep};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use std::path::{Path, PathBuf};

/// A fresh directory under the system temp dir, removed on drop
struct TempDir(PathBuf);

impl TempDir {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "chordsweep-it-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn options(midi_dir: &Path, sweep: Sweep) -> GenerateOptions {
    GenerateOptions {
        midi_dir: midi_dir.to_path_buf(),
        sweep,
        ..GenerateOptions::default()
    }
}

fn note_ons(smf: &Smf) -> usize {
    smf.tracks
        .iter()
        .flatten()
        .filter(|e| {
            matches!(
                e.kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                }
            )
        })
        .count()
}

#[test]
fn test_generate_writes_every_realization() {
    let dir = TempDir::new("generate");
    let opts = options(dir.path(), Sweep::single(PitchClass::C, 1));

    let summary = generate_progression("ii-V-I", "ii-V-I", &opts).unwrap();
    assert_eq!(summary.files, 27);
    assert_eq!(summary.sidecar, None);

    let out = dir.path().join("ii-V-I");
    assert!(out.join("C-1-ii-V-I-0.mid").is_file());
    assert!(out.join("C-1-ii-V-I-26.mid").is_file());
    assert!(!out.join("C-1-ii-V-I-27.mid").exists());
    assert!(!out.join(SIDECAR_NAME).exists());

    let bytes = std::fs::read(out.join("C-1-ii-V-I-0.mid")).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(note_ons(&smf), 9);
    let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
        TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
        _ => None,
    });
    assert_eq!(tempo, Some(1_000_000));
}

#[test]
fn test_generated_files_are_identical_across_runs() {
    let first = TempDir::new("repeat-a");
    let second = TempDir::new("repeat-b");
    let sweep = Sweep::single(PitchClass::from_semitones(3), 3);
    generate_progression("I-vi-ii-V", "1625", &options(first.path(), sweep.clone())).unwrap();
    generate_progression("I-vi-ii-V", "1625", &options(second.path(), sweep)).unwrap();

    for index in [0, 40, 80] {
        let name = format!("1625/Eb-3-1625-{}.mid", index);
        assert_eq!(
            std::fs::read(first.path().join(&name)).unwrap(),
            std::fs::read(second.path().join(&name)).unwrap()
        );
    }
}

#[test]
fn test_randomized_durations_are_seeded_and_recorded() {
    let first = TempDir::new("random-a");
    let second = TempDir::new("random-b");
    let sweep = Sweep::single(PitchClass::C, 2);
    let randomize = Some(RandomTiming {
        min_beats: 1.0,
        max_beats: 3.0,
        seed: 11,
    });

    let mut a = options(first.path(), sweep.clone());
    a.randomize = randomize.clone();
    let mut b = options(second.path(), sweep);
    b.randomize = randomize;

    let summary = generate_progression("ii-V-I", "251", &a).unwrap();
    generate_progression("ii-V-I", "251", &b).unwrap();

    let sidecar = summary.sidecar.unwrap();
    let table = DurationTable::load(&sidecar).unwrap();
    assert_eq!(table.len(), 27);
    let seconds = table.get("C-2-251-5").unwrap();
    assert_eq!(seconds.len(), 3);
    assert!(seconds.iter().all(|&s| (1.0..=3.0).contains(&s)));

    let other = DurationTable::load(&second.path().join("251").join(SIDECAR_NAME)).unwrap();
    assert_eq!(table, other);
}

#[test]
fn test_annotate_generated_folder() {
    let dir = TempDir::new("annotate");
    let midi_dir = dir.path().join("midi");
    let jams_dir = dir.path().join("jams");
    generate_progression(
        "ii,7-V,7-I,maj7",
        "251-7",
        &options(&midi_dir, Sweep::single(PitchClass::C, 3)),
    )
    .unwrap();

    let job = AnnotationJob {
        numerals: "ii,min7-V,7-I,maj7",
        key: "C",
        title: "251-7",
        jams_dir: &jams_dir,
        default_seconds: 2.0,
    };
    let written = annotate_folder(&midi_dir.join("251-7"), &job).unwrap();
    assert_eq!(written.len(), 64);

    let content = std::fs::read_to_string(jams_dir.join("C-3-251-7-0.jams")).unwrap();
    let doc: JamsDocument = serde_json::from_str(&content).unwrap();
    let values: Vec<&str> = doc.annotations[0]
        .data
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(values, vec!["D:min7", "G:7", "C:maj7"]);
    assert_eq!(doc.file_metadata.duration, 6.0);
    assert_eq!(doc.annotations[0].sandbox.key, "C");
}

#[test]
fn test_annotate_uses_sidecar_durations() {
    let dir = TempDir::new("annotate-sidecar");
    let midi_dir = dir.path().join("midi");
    let jams_dir = dir.path().join("jams");
    let mut opts = options(&midi_dir, Sweep::single(PitchClass::C, 2));
    opts.randomize = Some(RandomTiming {
        min_beats: 1.0,
        max_beats: 3.0,
        seed: 3,
    });
    let summary = generate_progression("I-IV-V", "145", &opts).unwrap();
    let table = DurationTable::load(&summary.sidecar.unwrap()).unwrap();

    let job = AnnotationJob {
        numerals: "I-IV-V",
        key: "C",
        title: "145",
        jams_dir: &jams_dir,
        default_seconds: 2.0,
    };
    annotate_folder(&summary.output_dir, &job).unwrap();

    let content = std::fs::read_to_string(jams_dir.join("C-2-145-7.jams")).unwrap();
    let doc: JamsDocument = serde_json::from_str(&content).unwrap();
    let durations: Vec<f64> = doc.annotations[0].data.iter().map(|o| o.duration).collect();
    assert_eq!(durations, table.get("C-2-145-7").unwrap());
    assert_eq!(doc.file_metadata.duration, durations.iter().sum::<f64>());
}

#[test]
fn test_config_round_trip() {
    let dir = TempDir::new("config");
    let path = dir.path().join("config.json");
    let mut config = Config::default();
    config.midi.tempo = 90;
    config.sweep = Sweep::octaves(2, 5);
    config.timing.randomize = true;
    save_config(&config, &path).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = TempDir::new("config-bad");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "midi": { "velocity": 0 } }"#).unwrap();
    assert!(load_config(&path).is_err());
    assert!(load_config(dir.path().join("missing.json")).is_err());
}
