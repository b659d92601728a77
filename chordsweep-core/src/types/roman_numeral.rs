// chordsweep-core/src/types/roman_numeral.rs
//
// Numeral tokens as they appear in one progression slot: "ii", "V,7",
// "ii,#,7", "Imaj7", "V#7". The letter case of the degree picks the base
// triad (upper = major, lower = minor) independently of the key.

use crate::error::{Result, TheoryError};
use crate::types::chord::Voicing;
use crate::types::tonality::MAJOR_SCALE;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleDegree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl ScaleDegree {
    pub const ALL: [ScaleDegree; 7] = [
        ScaleDegree::I,
        ScaleDegree::II,
        ScaleDegree::III,
        ScaleDegree::IV,
        ScaleDegree::V,
        ScaleDegree::VI,
        ScaleDegree::VII,
    ];

    /// Zero-based position in the scale (I = 0 .. VII = 6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Offset from the starting pitch used by the enumerator.
    ///
    /// Always the major-scale offset, whatever the chord's own quality or the
    /// key's mode (II = +2, III = +4, ...).
    pub fn fixed_offset(self) -> i16 {
        MAJOR_SCALE[self.index()] as i16
    }

    /// Parse an exact degree spelling. Returns the degree and whether the
    /// spelling was upper case (major base triad).
    pub fn parse(spelling: &str) -> Option<(ScaleDegree, bool)> {
        let degree = match spelling {
            "I" | "i" => ScaleDegree::I,
            "II" | "ii" => ScaleDegree::II,
            "III" | "iii" => ScaleDegree::III,
            "IV" | "iv" => ScaleDegree::IV,
            "V" | "v" => ScaleDegree::V,
            "VI" | "vi" => ScaleDegree::VI,
            "VII" | "vii" => ScaleDegree::VII,
            _ => return None,
        };
        let is_major = spelling.starts_with(|c: char| c.is_ascii_uppercase());
        Some((degree, is_major))
    }

    /// Spelling of this degree in the requested case
    pub fn numeral(self, is_major: bool) -> &'static str {
        const UPPER: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
        const LOWER: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];
        if is_major {
            UPPER[self.index()]
        } else {
            LOWER[self.index()]
        }
    }
}

/// Chromatic shift of the whole triad, written `#` or `b` after the degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    pub fn from_token(token: &str) -> Option<Accidental> {
        match token {
            "#" => Some(Accidental::Sharp),
            "b" => Some(Accidental::Flat),
            _ => None,
        }
    }

    pub fn semitones(self) -> i16 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// Quality / extension tags. This is the whitelist: anything else is an
/// [`TheoryError::UnrecognizedExtension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extension {
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    Diminished7,
    HalfDiminished7,
    Minor6,
    Major6,
    Sus2,
    Sus4,
    Diminished,
    Augmented,
    Major,
    Minor,
}

/// Tags ordered longest first so suffix matching always finds the longest tag.
const SUFFIX_ORDER: [Extension; 14] = [
    Extension::MinorMajor7,
    Extension::HalfDiminished7,
    Extension::Major7,
    Extension::Minor7,
    Extension::Diminished7,
    Extension::Minor6,
    Extension::Major6,
    Extension::Sus2,
    Extension::Sus4,
    Extension::Diminished,
    Extension::Augmented,
    Extension::Major,
    Extension::Minor,
    Extension::Dominant7,
];

impl Extension {
    pub const ALL: [Extension; 14] = [
        Extension::Dominant7,
        Extension::Major7,
        Extension::Minor7,
        Extension::MinorMajor7,
        Extension::Diminished7,
        Extension::HalfDiminished7,
        Extension::Minor6,
        Extension::Major6,
        Extension::Sus2,
        Extension::Sus4,
        Extension::Diminished,
        Extension::Augmented,
        Extension::Major,
        Extension::Minor,
    ];

    /// The tag as written in numerals and in chord labels
    pub fn tag(self) -> &'static str {
        match self {
            Extension::Dominant7 => "7",
            Extension::Major7 => "maj7",
            Extension::Minor7 => "min7",
            Extension::MinorMajor7 => "minmaj7",
            Extension::Diminished7 => "dim7",
            Extension::HalfDiminished7 => "hdim7",
            Extension::Minor6 => "min6",
            Extension::Major6 => "maj6",
            Extension::Sus2 => "sus2",
            Extension::Sus4 => "sus4",
            Extension::Diminished => "dim",
            Extension::Augmented => "aug",
            Extension::Major => "maj",
            Extension::Minor => "min",
        }
    }

    /// Whether applying this extension adds a fourth voice
    pub fn is_tetrad(self) -> bool {
        matches!(
            self,
            Extension::Dominant7
                | Extension::Major7
                | Extension::Minor7
                | Extension::MinorMajor7
                | Extension::Diminished7
                | Extension::HalfDiminished7
                | Extension::Minor6
                | Extension::Major6
        )
    }

    fn from_tag(tag: &str) -> Option<Extension> {
        Self::ALL.iter().copied().find(|ext| ext.tag() == tag)
    }

    /// Split the longest known tag off the end of `token`, leaving a non-empty head
    fn strip_longest_suffix(token: &str) -> Option<(&str, Extension)> {
        SUFFIX_ORDER.iter().find_map(|&ext| {
            token
                .strip_suffix(ext.tag())
                .filter(|head| !head.is_empty())
                .map(|head| (head, ext))
        })
    }
}

impl FromStr for Extension {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        Extension::from_tag(s).ok_or_else(|| TheoryError::UnrecognizedExtension(s.to_string()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One parsed progression slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumeralToken {
    pub degree: ScaleDegree,
    /// Upper-case numeral: major base triad; lower-case: minor
    pub is_major: bool,
    pub accidental: Option<Accidental>,
    pub extension: Option<Extension>,
}

impl NumeralToken {
    pub fn new(degree: ScaleDegree, is_major: bool) -> Self {
        NumeralToken {
            degree,
            is_major,
            accidental: None,
            extension: None,
        }
    }

    pub fn with_accidental(mut self, accidental: Accidental) -> Self {
        self.accidental = Some(accidental);
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Parse either the comma form (`ii,#,7`) or the glued form (`ii#7`)
    pub fn parse(input: &str) -> Result<Self> {
        let token = input.trim();
        if token.contains(',') {
            Self::parse_comma_form(token)
        } else {
            Self::parse_glued_form(token)
        }
    }

    fn parse_comma_form(token: &str) -> Result<Self> {
        let mut fields = token.split(',').map(str::trim);

        let head = fields.next().unwrap_or_default();
        let (degree, is_major) = ScaleDegree::parse(head)
            .ok_or_else(|| TheoryError::UnrecognizedNumeral(head.to_string()))?;
        let mut numeral = NumeralToken::new(degree, is_major);

        let mut field = fields.next();
        if let Some(accidental) = field.and_then(Accidental::from_token) {
            numeral = numeral.with_accidental(accidental);
            field = fields.next();
        }
        if let Some(tag) = field {
            numeral = numeral.with_extension(tag.parse()?);
        }
        if let Some(extra) = fields.next() {
            return Err(TheoryError::UnrecognizedExtension(extra.to_string()));
        }

        Ok(numeral)
    }

    fn parse_glued_form(token: &str) -> Result<Self> {
        let (rest, extension) = match Extension::strip_longest_suffix(token) {
            Some((head, ext)) => (head, Some(ext)),
            None => (token, None),
        };

        let (head, accidental) = match rest.char_indices().last() {
            Some((pos, c)) if pos > 0 && (c == '#' || c == 'b') => {
                (&rest[..pos], Accidental::from_token(&rest[pos..]))
            }
            _ => (rest, None),
        };

        match ScaleDegree::parse(head) {
            Some((degree, is_major)) => Ok(NumeralToken {
                degree,
                is_major,
                accidental,
                extension,
            }),
            None => Err(Self::classify_glued_failure(token)),
        }
    }

    /// A glued token that starts with a valid degree but carries an unknown
    /// tail ("V9", "V7b5") is an extension problem, not a numeral problem.
    fn classify_glued_failure(token: &str) -> TheoryError {
        let roman_len = token
            .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
            .unwrap_or(token.len());
        let (head, tail) = token.split_at(roman_len);
        if !tail.is_empty() && ScaleDegree::parse(head).is_some() {
            TheoryError::UnrecognizedExtension(tail.to_string())
        } else {
            TheoryError::UnrecognizedNumeral(token.to_string())
        }
    }

    /// Number of voices the built chord will have
    pub fn voice_count(&self) -> usize {
        match self.extension {
            Some(ext) if ext.is_tetrad() => 4,
            _ => 3,
        }
    }

    /// Build the root-position voicing on an absolute chord root:
    /// base triad, then the accidental shift, then the extension.
    pub fn build(&self, root: i16) -> Voicing {
        let mut voicing = Voicing::base_triad(root, self.is_major);
        if let Some(accidental) = self.accidental {
            voicing = voicing.raise(accidental);
        }
        if let Some(extension) = self.extension {
            voicing = voicing.alter(extension);
        }
        voicing
    }
}

impl FromStr for NumeralToken {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        NumeralToken::parse(s)
    }
}

/// Renders the canonical comma form, e.g. `ii,#,7`
impl fmt::Display for NumeralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degree.numeral(self.is_major))?;
        if let Some(accidental) = self.accidental {
            write!(f, ",{}", accidental.symbol())?;
        }
        if let Some(extension) = self.extension {
            write!(f, ",{}", extension)?;
        }
        Ok(())
    }
}
