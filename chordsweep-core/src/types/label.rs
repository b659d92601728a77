//! Roman numeral to `Root:Quality` chord labels for annotation files.
//!
//! Unlike the enumerator, the label root is placed with the key's own
//! diatonic offsets, so `III` in A minor is `C`, not `C#`.

use crate::error::Result;
use crate::types::note::PitchClass;
use crate::types::roman_numeral::NumeralToken;
use crate::types::tonality::Tonality;
use std::fmt;

/// A chord label such as `G:7` or `A#:min7`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChordLabel {
    pub root: PitchClass,
    pub quality: &'static str,
}

impl ChordLabel {
    /// Label a parsed numeral in a key. The accidental moves the root.
    pub fn for_numeral(numeral: &NumeralToken, tonality: &Tonality) -> Self {
        let mut root = tonality.degree_root(numeral.degree);
        if let Some(accidental) = numeral.accidental {
            root = root.transpose(accidental.semitones() as i32);
        }

        let quality = match numeral.extension {
            Some(extension) => extension.tag(),
            None if numeral.is_major => "maj",
            None => "min",
        };

        ChordLabel { root, quality }
    }
}

impl fmt::Display for ChordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.root.sharp_name(), self.quality)
    }
}

/// Parse `token` and `tonality` and label the chord
pub fn translate(token: &str, tonality: &str) -> Result<ChordLabel> {
    let numeral = NumeralToken::parse(token)?;
    let tonality = Tonality::resolve(tonality)?;
    Ok(ChordLabel::for_numeral(&numeral, &tonality))
}

/// Label every slot of a `-` separated numeral list
pub fn translate_all(numerals: &str, tonality: &str) -> Result<Vec<ChordLabel>> {
    let tonality = Tonality::resolve(tonality)?;
    numerals
        .split('-')
        .map(|token| NumeralToken::parse(token).map(|n| ChordLabel::for_numeral(&n, &tonality)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TheoryError;

    fn label(token: &str, key: &str) -> String {
        translate(token, key).unwrap().to_string()
    }

    #[test]
    fn test_plain_triads() {
        assert_eq!(label("I", "C"), "C:maj");
        assert_eq!(label("i", "Am"), "A:min");
        assert_eq!(label("IV", "G"), "C:maj");
        assert_eq!(label("vi", "F"), "D:min");
    }

    #[test]
    fn test_extension_tag_is_quality() {
        assert_eq!(label("V,7", "C"), "G:7");
        assert_eq!(label("ii,7", "C"), "D:7");
        assert_eq!(label("ii,min7", "C"), "D:min7");
        assert_eq!(label("vi,sus2", "Bb"), "G:sus2");
        assert_eq!(label("Imaj7", "Eb"), "D#:maj7");
    }

    #[test]
    fn test_minor_key_uses_natural_minor_offsets() {
        assert_eq!(label("III", "Am"), "C:maj");
        assert_eq!(label("VI", "Am"), "F:maj");
        assert_eq!(label("VII", "Am"), "G:maj");
        assert_eq!(label("ii,hdim7", "Am"), "B:hdim7");
    }

    #[test]
    fn test_accidental_moves_root() {
        assert_eq!(label("ii,#", "C"), "D#:min");
        assert_eq!(label("VII,b", "C"), "A#:maj");
        assert_eq!(label("I,b", "C"), "B:maj");
    }

    #[test]
    fn test_errors_propagate() {
        assert_eq!(
            translate("I", "H"),
            Err(TheoryError::UnresolvedTonality("H".to_string()))
        );
        assert!(matches!(
            translate("X", "C"),
            Err(TheoryError::UnrecognizedNumeral(_))
        ));
    }

    #[test]
    fn test_translate_all() {
        let labels: Vec<String> = translate_all("ii,min7-V,7-I,maj7", "C")
            .unwrap()
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(labels, vec!["D:min7", "G:7", "C:maj7"]);
    }
}
