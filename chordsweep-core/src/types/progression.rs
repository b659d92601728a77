//! Progression parsing and the keys × octaves × inversions sweep.
//!
//! A progression such as `"ii,7-V,7-I,maj7"` is realized from every starting
//! pitch of a [`Sweep`]. Each slot's chord root is placed with the fixed
//! major-scale offset of its degree (II = +2, III = +4, ...), whatever the
//! chord's own quality. For every starting pitch, every combination of
//! per-slot inversions is emitted, last slot varying fastest.

use crate::error::{Result, TheoryError};
use crate::types::chord::{inversion_count, Voicing};
use crate::types::note::{octave_of, PitchClass};
use crate::types::roman_numeral::NumeralToken;
use std::fmt;
use std::str::FromStr;

/// Progression lengths the enumerator accepts
pub const SUPPORTED_LENGTHS: [usize; 2] = [3, 4];

/// Highest voice a realization can reach above its starting pitch:
/// VII (+11), a sharp (+1), a fifth raised by a tetrad's third inversion (+7 +12).
pub const MAX_SPAN_ABOVE_START: i16 = 11 + 1 + 7 + 12;

/// Lowest voice below the starting pitch (a flat on the tonic)
pub const MAX_SPAN_BELOW_START: i16 = 1;

/// A parsed progression: 3 or 4 numeral slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionSpec {
    source: String,
    symbols: Vec<String>,
    slots: Vec<NumeralToken>,
}

impl ProgressionSpec {
    /// Split on `-`, parse every slot and check the slot count.
    pub fn parse(progression: &str) -> Result<Self> {
        let symbols: Vec<String> = progression
            .split('-')
            .map(|s| s.trim().to_string())
            .collect();

        if !SUPPORTED_LENGTHS.contains(&symbols.len()) {
            return Err(TheoryError::UnsupportedProgressionLength(symbols.len()));
        }

        let slots = symbols
            .iter()
            .map(|symbol| NumeralToken::parse(symbol))
            .collect::<Result<Vec<_>>>()?;

        Ok(ProgressionSpec {
            source: progression.trim().to_string(),
            symbols,
            slots,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Slot strings as written by the user (trimmed)
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn slots(&self) -> &[NumeralToken] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Root-position voicings of every slot from one starting pitch
    pub fn voicings_at(&self, start: i16) -> Vec<Voicing> {
        self.slots
            .iter()
            .map(|slot| slot.build(start + slot.degree.fixed_offset()))
            .collect()
    }

    /// Number of inversion combinations per starting pitch
    pub fn combinations_per_start(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| inversion_count(slot.voice_count()))
            .product()
    }

    /// Total realizations over a sweep
    pub fn realization_count(&self, sweep: &Sweep) -> usize {
        sweep.len() * self.combinations_per_start()
    }

    /// Lazily enumerate every realization over `sweep`
    pub fn enumerate<'a>(&'a self, sweep: &Sweep) -> Result<Enumeration<'a>> {
        Enumeration::new(self, sweep)
    }
}

impl FromStr for ProgressionSpec {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        ProgressionSpec::parse(s)
    }
}

impl fmt::Display for ProgressionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Starting pitch of a realization, named like `C-1` or `Eb-3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartPitch {
    pub midi: i16,
    pub pitch_class: PitchClass,
    pub octave: i8,
}

impl StartPitch {
    /// `octave` follows scientific numbering: octave 1 starts at MIDI 24
    pub fn new(pitch_class: PitchClass, octave: i8) -> Self {
        let midi = 12 * (octave as i16 + 1) + pitch_class.value() as i16;
        StartPitch {
            midi,
            pitch_class,
            octave,
        }
    }

    pub fn from_midi(midi: i16) -> Self {
        StartPitch {
            midi,
            pitch_class: PitchClass::of_midi(midi),
            octave: octave_of(midi),
        }
    }
}

impl fmt::Display for StartPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pitch_class.file_name(), self.octave)
    }
}

/// Accepts `<note>-<octave>` (`Eb-3`) or a bare MIDI number (`51`)
impl FromStr for StartPitch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(midi) = s.parse::<i16>() {
            return Ok(StartPitch::from_midi(midi));
        }
        let (name, octave) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <note>-<octave> or a MIDI number, got '{}'", s))?;
        let pitch_class: PitchClass = name.parse()?;
        let octave: i8 = octave
            .parse()
            .map_err(|_| format!("invalid octave in '{}'", s))?;
        Ok(StartPitch::new(pitch_class, octave))
    }
}

/// The chromatic range a progression is swept over
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sweep {
    pub low_octave: i8,
    pub high_octave: i8,
    pub pitch_classes: Vec<PitchClass>,
}

impl Sweep {
    /// Octaves `low..=high`, all twelve pitch classes
    pub fn octaves(low_octave: i8, high_octave: i8) -> Self {
        Sweep {
            low_octave,
            high_octave,
            pitch_classes: PitchClass::ALL.to_vec(),
        }
    }

    /// Octaves 1..=6, MIDI 24..=95. Not the full keyboard: a start in
    /// octave 7 or 8 can put the top voice of an inverted tetrad up to 31
    /// semitones higher, past MIDI 127, so those octaves fail `validate`.
    pub fn default_range() -> Self {
        Self::octaves(1, 6)
    }

    /// One starting pitch only
    pub fn single(pitch_class: PitchClass, octave: i8) -> Self {
        Sweep {
            low_octave: octave,
            high_octave: octave,
            pitch_classes: vec![pitch_class],
        }
    }

    /// Check the sweep is non-empty and that every realization stays in 0..=127
    pub fn validate(&self) -> Result<()> {
        if self.low_octave > self.high_octave {
            return Err(TheoryError::InvalidSweep(format!(
                "low octave {} is above high octave {}",
                self.low_octave, self.high_octave
            )));
        }
        if self.pitch_classes.is_empty() {
            return Err(TheoryError::InvalidSweep(
                "no pitch classes selected".to_string(),
            ));
        }
        let mut seen = [false; 12];
        for pc in &self.pitch_classes {
            if std::mem::replace(&mut seen[pc.value() as usize], true) {
                return Err(TheoryError::InvalidSweep(format!(
                    "pitch class {} is listed twice",
                    pc
                )));
            }
        }

        let starts: Vec<StartPitch> = self.start_pitches().collect();
        let lowest = starts.iter().map(|s| s.midi).min().unwrap_or(0);
        let highest = starts.iter().map(|s| s.midi).max().unwrap_or(0);
        if lowest - MAX_SPAN_BELOW_START < 0 || highest + MAX_SPAN_ABOVE_START > 127 {
            return Err(TheoryError::InvalidSweep(format!(
                "starting pitches {}..={} would leave the MIDI range",
                lowest, highest
            )));
        }
        Ok(())
    }

    /// Starting pitches in enumeration order: octave outer, pitch class inner
    pub fn start_pitches(&self) -> impl Iterator<Item = StartPitch> + '_ {
        (self.low_octave..=self.high_octave).flat_map(move |octave| {
            self.pitch_classes
                .iter()
                .map(move |&pc| StartPitch::new(pc, octave))
        })
    }

    /// Number of starting pitches
    pub fn len(&self) -> usize {
        if self.low_octave > self.high_octave {
            return 0;
        }
        (self.high_octave as i16 - self.low_octave as i16 + 1) as usize * self.pitch_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Sweep {
    fn default() -> Self {
        Self::default_range()
    }
}

/// One point of the enumeration: a starting pitch plus an inversion per slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realization {
    pub start: StartPitch,
    /// Zero-based counter, restarting at every starting pitch
    pub index: usize,
    pub inversions: Vec<usize>,
    pub chords: Vec<Voicing>,
}

impl Realization {
    /// `<start>-<name>-<index>`, e.g. `C-1-ii-V-I-0`
    pub fn file_stem(&self, name: &str) -> String {
        format!("{}-{}-{}", self.start, name, self.index)
    }
}

/// Lazy iterator over every realization of a progression
pub struct Enumeration<'a> {
    spec: &'a ProgressionSpec,
    starts: Vec<StartPitch>,
    start_pos: usize,
    base: Vec<Voicing>,
    odometer: Vec<usize>,
    index: usize,
    remaining: usize,
}

impl<'a> Enumeration<'a> {
    pub fn new(spec: &'a ProgressionSpec, sweep: &Sweep) -> Result<Self> {
        sweep.validate()?;
        let starts: Vec<StartPitch> = sweep.start_pitches().collect();
        let base = starts
            .first()
            .map(|start| spec.voicings_at(start.midi))
            .unwrap_or_default();
        let remaining = starts.len() * spec.combinations_per_start();

        log::debug!(
            "enumerating '{}': {} starting pitches x {} inversion combinations",
            spec,
            starts.len(),
            spec.combinations_per_start()
        );

        Ok(Enumeration {
            spec,
            starts,
            start_pos: 0,
            base,
            odometer: vec![0; spec.len()],
            index: 0,
            remaining,
        })
    }

    /// Step the per-slot inversion indices, last slot fastest.
    /// Returns false when every combination has been visited.
    fn advance_odometer(&mut self) -> bool {
        for slot in (0..self.odometer.len()).rev() {
            self.odometer[slot] += 1;
            if self.odometer[slot] < inversion_count(self.base[slot].len()) {
                return true;
            }
            self.odometer[slot] = 0;
        }
        false
    }
}

impl Iterator for Enumeration<'_> {
    type Item = Realization;

    fn next(&mut self) -> Option<Realization> {
        if self.remaining == 0 {
            return None;
        }

        let chords = self
            .base
            .iter()
            .zip(&self.odometer)
            .map(|(voicing, &k)| voicing.raise_leading(k))
            .collect();
        let realization = Realization {
            start: self.starts[self.start_pos],
            index: self.index,
            inversions: self.odometer.clone(),
            chords,
        };

        self.remaining -= 1;
        self.index += 1;
        if !self.advance_odometer() {
            self.start_pos += 1;
            self.index = 0;
            if let Some(start) = self.starts.get(self.start_pos) {
                self.base = self.spec.voicings_at(start.midi);
            }
        }

        Some(realization)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Enumeration<'_> {}

/// Parse `progression` and collect `(file stem, voicings)` for every realization
pub fn enumerate(progression: &str, name: &str, sweep: &Sweep) -> Result<Vec<(String, Vec<Voicing>)>> {
    let spec = ProgressionSpec::parse(progression)?;
    let realizations = spec.enumerate(sweep)?;
    Ok(realizations
        .map(|r| (r.file_stem(name), r.chords))
        .collect())
}

/// Named progressions the dataset is built from
pub struct CommonProgressions;

impl CommonProgressions {
    pub const ALL: [(&'static str, &'static str); 10] = [
        ("251", "ii-V-I"),
        ("251-7", "ii,7-V,7-I,maj7"),
        ("1625", "I-vi-ii-V"),
        ("1451", "I-IV-V-I"),
        ("1564", "I-V-vi-IV"),
        ("1645", "I-vi-IV-V"),
        ("6251", "vi-ii-V-I"),
        ("3625", "iii-vi-ii-V"),
        ("minor-251", "ii,hdim7-V,7-i,min7"),
        ("145", "I-IV-V"),
    ];

    /// Look up a progression by name
    pub fn get(name: &str) -> Option<&'static str> {
        Self::ALL
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, progression)| progression)
    }
}
