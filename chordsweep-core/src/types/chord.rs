use crate::error::{Result, TheoryError};
use crate::types::note::{pitch_name, PitchClass};
use crate::types::roman_numeral::{Accidental, Extension};
use std::fmt;

/// Semitones in an octave
pub const OCTAVE: i16 = 12;

/// Number of inversion choices offered for a chord of `voices` voices.
///
/// Every index `0..voices` is used: a triad has three choices (root position,
/// first, second) and a tetrad four. This is the single inversion policy of
/// the crate; enumeration counts follow from it.
pub const fn inversion_count(voices: usize) -> usize {
    voices
}

/// A chord as an ordered list of absolute MIDI pitches (3 or 4 voices).
///
/// Voices are kept in construction order (root, third, fifth, seventh), not
/// sorted, so an inversion is visible as raised leading voices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Voicing {
    voices: Vec<i16>,
}

impl Voicing {
    /// Major triad = root, root+4, root+7; minor triad = root, root+3, root+7
    pub fn base_triad(root: i16, is_major: bool) -> Self {
        let third = if is_major { 4 } else { 3 };
        Voicing {
            voices: vec![root, root + third, root + 7],
        }
    }

    pub fn from_voices(voices: Vec<i16>) -> Self {
        Voicing { voices }
    }

    pub fn voices(&self) -> &[i16] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn lowest(&self) -> Option<i16> {
        self.voices.iter().copied().min()
    }

    pub fn highest(&self) -> Option<i16> {
        self.voices.iter().copied().max()
    }

    /// Shift every voice a semitone up (`#`) or down (`b`)
    pub fn raise(self, accidental: Accidental) -> Self {
        self.transpose(accidental.semitones())
    }

    pub fn transpose(mut self, semitones: i16) -> Self {
        for voice in &mut self.voices {
            *voice += semitones;
        }
        self
    }

    /// Reshape the triad or add a fourth voice according to `extension`.
    ///
    /// Rules are relative to the current (possibly raised/lowered) root,
    /// third and fifth. The fourth voice is derived from the fifth after any
    /// reshaping.
    pub fn alter(self, extension: Extension) -> Self {
        if self.voices.len() < 3 {
            return self;
        }
        let (n1, n2, n3) = (self.voices[0], self.voices[1], self.voices[2]);

        let voices = match extension {
            Extension::Dominant7 | Extension::Minor7 => vec![n1, n2, n3, n3 + 3],
            Extension::Major7 | Extension::MinorMajor7 | Extension::Major6 => {
                vec![n1, n2, n3, n3 + 4]
            }
            Extension::Minor6 => vec![n1, n2, n3, n3 + 5],
            Extension::Diminished7 => vec![n1, n2 - 1, n3 - 1, n3 - 1 + 3],
            Extension::HalfDiminished7 => vec![n1, n2 - 1, n3 - 1, n3 - 1 + 4],
            Extension::Sus2 => vec![n1, n1 + 2, n1 + 7],
            Extension::Sus4 => vec![n1, n1 + 5, n1 + 7],
            Extension::Diminished => vec![n1, n1 + 3, n1 + 6],
            Extension::Augmented => vec![n1, n1 + 4, n1 + 8],
            Extension::Major => vec![n1, n1 + 4, n1 + 7],
            Extension::Minor => vec![n1, n1 + 3, n1 + 7],
        };

        Voicing { voices }
    }

    /// Raise the leading `index` voices by one octave. Index 0 is root position.
    pub fn invert(&self, index: usize) -> Result<Voicing> {
        if index >= inversion_count(self.len()) {
            return Err(TheoryError::InversionOutOfRange {
                index,
                voices: self.len(),
            });
        }
        Ok(self.raise_leading(index))
    }

    /// Unchecked form used by the enumerator, whose indices are always in range
    pub(crate) fn raise_leading(&self, count: usize) -> Voicing {
        let voices = self
            .voices
            .iter()
            .enumerate()
            .map(|(i, &pitch)| if i < count { pitch + OCTAVE } else { pitch })
            .collect();
        Voicing { voices }
    }

    /// Every inversion this chord offers, in index order
    pub fn inversions(&self) -> impl Iterator<Item = Voicing> + '_ {
        (0..inversion_count(self.len())).map(move |k| self.raise_leading(k))
    }

    /// Sorted pitch classes (a multiset: doubled classes appear twice)
    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        let mut classes: Vec<PitchClass> =
            self.voices.iter().map(|&p| PitchClass::of_midi(p)).collect();
        classes.sort();
        classes
    }
}

impl fmt::Display for Voicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.voices.iter().map(|&p| pitch_name(p)).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(voices: &[i16]) -> Vec<i16> {
        voices.to_vec()
    }

    #[test]
    fn test_base_triads() {
        assert_eq!(Voicing::base_triad(60, true).voices(), &v(&[60, 64, 67])[..]);
        assert_eq!(Voicing::base_triad(62, false).voices(), &v(&[62, 65, 69])[..]);
    }

    #[test]
    fn test_raise_and_lower_are_inverse() {
        let triad = Voicing::base_triad(48, false);
        let back = triad
            .clone()
            .raise(Accidental::Sharp)
            .raise(Accidental::Flat);
        assert_eq!(back, triad);

        let sharp = triad.clone().raise(Accidental::Sharp);
        assert_eq!(sharp.voices(), &v(&[49, 52, 56])[..]);
    }

    #[test]
    fn test_extension_table() {
        let major = || Voicing::base_triad(60, true);
        let minor = || Voicing::base_triad(60, false);

        assert_eq!(major().alter(Extension::Dominant7).voices(), &v(&[60, 64, 67, 70])[..]);
        assert_eq!(major().alter(Extension::Major7).voices(), &v(&[60, 64, 67, 71])[..]);
        assert_eq!(minor().alter(Extension::Minor7).voices(), &v(&[60, 63, 67, 70])[..]);
        assert_eq!(minor().alter(Extension::MinorMajor7).voices(), &v(&[60, 63, 67, 71])[..]);
        assert_eq!(minor().alter(Extension::Diminished7).voices(), &v(&[60, 62, 66, 69])[..]);
        assert_eq!(
            minor().alter(Extension::HalfDiminished7).voices(),
            &v(&[60, 62, 66, 70])[..]
        );
        assert_eq!(minor().alter(Extension::Minor6).voices(), &v(&[60, 63, 67, 72])[..]);
        assert_eq!(major().alter(Extension::Major6).voices(), &v(&[60, 64, 67, 71])[..]);
        assert_eq!(major().alter(Extension::Sus2).voices(), &v(&[60, 62, 67])[..]);
        assert_eq!(minor().alter(Extension::Sus4).voices(), &v(&[60, 65, 67])[..]);
        assert_eq!(major().alter(Extension::Diminished).voices(), &v(&[60, 63, 66])[..]);
        assert_eq!(minor().alter(Extension::Augmented).voices(), &v(&[60, 64, 68])[..]);
        assert_eq!(minor().alter(Extension::Major).voices(), &v(&[60, 64, 67])[..]);
        assert_eq!(major().alter(Extension::Minor).voices(), &v(&[60, 63, 67])[..]);
    }

    #[test]
    fn test_extension_applies_after_raise() {
        let chord = Voicing::base_triad(62, false)
            .raise(Accidental::Sharp)
            .alter(Extension::Dominant7);
        assert_eq!(chord.voices(), &v(&[63, 66, 70, 73])[..]);
    }

    #[test]
    fn test_root_position_is_identity() {
        let triad = Voicing::base_triad(55, true);
        assert_eq!(triad.invert(0).unwrap(), triad);
    }

    #[test]
    fn test_inversions_raise_leading_voices() {
        let triad = Voicing::base_triad(60, true);
        assert_eq!(triad.invert(1).unwrap().voices(), &v(&[72, 64, 67])[..]);
        assert_eq!(triad.invert(2).unwrap().voices(), &v(&[72, 76, 67])[..]);

        let tetrad = triad.alter(Extension::Dominant7);
        assert_eq!(tetrad.invert(3).unwrap().voices(), &v(&[72, 76, 79, 70])[..]);
    }

    #[test]
    fn test_inversion_out_of_range() {
        let triad = Voicing::base_triad(60, true);
        assert_eq!(
            triad.invert(3),
            Err(TheoryError::InversionOutOfRange { index: 3, voices: 3 })
        );
    }

    #[test]
    fn test_inversions_preserve_pitch_classes() {
        let chords = [
            Voicing::base_triad(50, false),
            Voicing::base_triad(43, true).alter(Extension::Dominant7),
            Voicing::base_triad(61, false).alter(Extension::Minor6),
        ];
        for chord in chords {
            let expected = chord.pitch_classes();
            let all: Vec<Voicing> = chord.inversions().collect();
            assert_eq!(all.len(), inversion_count(chord.len()));
            for inverted in all {
                assert_eq!(inverted.pitch_classes(), expected);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Voicing::base_triad(60, true).to_string(), "[C4, E4, G4]");
    }
}
