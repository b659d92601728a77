// Standard MIDI File output for chord realizations.
//
// Every realization becomes one SMF format 0 file: a tempo event followed by
// each chord's notes, all voices of a chord starting together on channel 0
// and lasting for that chord's duration. Written with the `midly` crate.

use crate::error::{ExportError, Result};
use chordsweep_core::types::time::{self, Beats};
use chordsweep_core::Voicing;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// All notes go to the first channel
const CHANNEL: u8 = 0;

/// Largest value a 24-bit tempo event can hold
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// Largest delta a variable-length quantity can hold
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Tempo and velocity shared by every note of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteStyle {
    pub tempo_bpm: u32,
    pub velocity: u8,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            tempo_bpm: 60,
            velocity: 100,
        }
    }
}

impl NoteStyle {
    fn tempo_micros(&self) -> Result<u24> {
        if self.tempo_bpm == 0 {
            return Err(ExportError::Midi("tempo must be positive".to_string()));
        }
        let micros = 60_000_000 / self.tempo_bpm;
        if micros > MAX_TEMPO_MICROS {
            return Err(ExportError::Midi(format!(
                "tempo {} BPM is too slow for a MIDI tempo event",
                self.tempo_bpm
            )));
        }
        Ok(u24::new(micros))
    }

    fn velocity(&self) -> Result<u7> {
        if self.velocity > 127 {
            return Err(ExportError::Midi(format!(
                "velocity {} is above 127",
                self.velocity
            )));
        }
        Ok(u7::new(self.velocity))
    }
}

/// Checked conversion of an absolute pitch to a MIDI key
fn midi_key(pitch: i16) -> Result<u7> {
    if !(0..=127).contains(&pitch) {
        return Err(ExportError::PitchOutOfRange(pitch));
    }
    Ok(u7::new(pitch as u8))
}

/// A note edge at an absolute tick
#[derive(Debug, Clone, Copy)]
struct NoteEdge {
    tick: u32,
    on: bool,
    key: u7,
}

/// Build an in-memory SMF for a chord sequence.
///
/// `durations` gives the length of each chord in beats; chords are laid end
/// to end from beat 0. Extra durations or chords beyond the shorter list are
/// ignored.
pub fn chords_to_smf(chords: &[Voicing], durations: &[Beats], style: &NoteStyle) -> Result<Smf<'static>> {
    let tempo = style.tempo_micros()?;
    let velocity = style.velocity()?;
    let spans = time::timeline(durations);

    let mut edges = Vec::new();
    for (chord, span) in chords.iter().zip(&spans) {
        let start = time::to_ticks(span.start, TICKS_PER_QUARTER);
        let end = time::to_ticks(span.end, TICKS_PER_QUARTER);
        for &pitch in chord.voices() {
            let key = midi_key(pitch)?;
            edges.push(NoteEdge {
                tick: start,
                on: true,
                key,
            });
            edges.push(NoteEdge {
                tick: end,
                on: false,
                key,
            });
        }
    }
    // Note-offs sort before note-ons at the same tick
    edges.sort_by_key(|edge| (edge.tick, edge.on));

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = Vec::with_capacity(edges.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(tempo)),
    });

    let mut last_tick = 0;
    for edge in edges {
        let delta = edge.tick - last_tick;
        if delta > MAX_DELTA {
            return Err(ExportError::Midi(format!("delta of {} ticks is too long", delta)));
        }
        let message = if edge.on {
            MidiMessage::NoteOn {
                key: edge.key,
                vel: velocity,
            }
        } else {
            MidiMessage::NoteOff {
                key: edge.key,
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = edge.tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

/// Write one realization to `path`. The file handle is closed when this returns.
pub fn write_realization(
    path: &Path,
    chords: &[Voicing],
    durations: &[Beats],
    style: &NoteStyle,
) -> Result<()> {
    let smf = chords_to_smf(chords, durations, style)?;
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    smf.write_std(&mut writer)
        .map_err(|e| ExportError::io(path, e))?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
