use std::fmt;
use std::str::FromStr;

/// Chromatic pitch class (0-11)
/// 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct PitchClass(u8);

/// Sharp spelling, used for chord labels ("C#:maj", "A#:min7").
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Mixed spelling used in generated file names ("Eb-3-ii-V-I-0.mid").
const FILE_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Enharmonic spellings accepted when reading a tonality or a note name.
const ENHARMONIC_TABLE: [(&str, u8); 21] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("Fb", 4),
    ("E#", 5),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
    ("Cb", 11),
    ("B#", 0),
];

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// All twelve pitch classes in chromatic order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Wrap any semitone count (negative included) into a pitch class
    pub fn from_semitones(semitones: i32) -> Self {
        PitchClass(semitones.rem_euclid(12) as u8)
    }

    /// Pitch class of an absolute MIDI pitch
    pub fn of_midi(pitch: i16) -> Self {
        Self::from_semitones(pitch as i32)
    }

    /// Look a spelling up in the enharmonic table (case-sensitive: "Eb", not "EB")
    pub fn from_name(name: &str) -> Option<Self> {
        ENHARMONIC_TABLE
            .iter()
            .find(|(spelling, _)| *spelling == name)
            .map(|&(_, pc)| PitchClass(pc))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Transpose by a number of semitones, wrapping around the octave
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitones(self.0 as i32 + semitones)
    }

    pub fn sharp_name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    pub fn file_name(self) -> &'static str {
        FILE_NAMES[self.0 as usize]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sharp_name())
    }
}

impl FromStr for PitchClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| format!("unknown note name '{}'", s))
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 11 {
            return Err(format!("Pitch class must be 0-11, got {}", value));
        }
        Ok(PitchClass(value))
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

/// Scientific octave number of a MIDI pitch (60 = C4)
pub fn octave_of(pitch: i16) -> i8 {
    (pitch.div_euclid(12) - 1) as i8
}

/// Human readable name of an absolute pitch, e.g. `60` -> `C4`
pub fn pitch_name(pitch: i16) -> String {
    format!("{}{}", PitchClass::of_midi(pitch), octave_of(pitch))
}
