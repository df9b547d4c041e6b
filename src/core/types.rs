// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrical role of one syllable.
///
/// `Wildcard` marks the lone syllable of a one-syllable word, which may fill
/// either slot of an iamb. It is a distinct value: it never compares equal to
/// `Stressed` or `Unstressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyllableClass {
    Stressed,
    Unstressed,
    Wildcard,
}

impl SyllableClass {
    /// Swaps stressed and unstressed. `Wildcard` is a fixed point.
    pub fn invert(self) -> Self {
        match self {
            SyllableClass::Stressed => SyllableClass::Unstressed,
            SyllableClass::Unstressed => SyllableClass::Stressed,
            SyllableClass::Wildcard => SyllableClass::Wildcard,
        }
    }

    /// Returns `self` when both agree, otherwise `Wildcard`.
    pub fn generalize(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            SyllableClass::Wildcard
        }
    }

    pub fn symbol(self) -> char {
        match self {
            SyllableClass::Stressed => '/',
            SyllableClass::Unstressed => 'u',
            SyllableClass::Wildcard => '*',
        }
    }
}

/// Why a line did or did not scan. The serialized form is the message
/// shown to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "Ok.")]
    Ok,
    #[serde(rename = "Wrong number of syllables.")]
    WrongSyllableCount,
    #[serde(rename = "Two syllables with stress in a row.")]
    DoubleStress,
    #[serde(rename = "Unknown word.")]
    UnknownWord,
}

impl Reason {
    pub fn message(self) -> &'static str {
        match self {
            Reason::Ok => "Ok.",
            Reason::WrongSyllableCount => "Wrong number of syllables.",
            Reason::DoubleStress => "Two syllables with stress in a row.",
            Reason::UnknownWord => "Unknown word.",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of checking one line.
///
/// `at` is the word index reached by the last branch the search evaluated,
/// so for lines with several pronunciation choices it depends on the order
/// of the dictionary's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub at: usize,
    pub reason: Reason,
}

impl ValidationResult {
    pub fn success(at: usize) -> Self {
        Self { ok: true, at, reason: Reason::Ok }
    }

    pub fn failure(at: usize, reason: Reason) -> Self {
        Self { ok: false, at, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_swaps_concrete_classes_and_fixes_wildcard() {
        assert_eq!(SyllableClass::Stressed.invert(), SyllableClass::Unstressed);
        assert_eq!(SyllableClass::Unstressed.invert(), SyllableClass::Stressed);
        assert_eq!(SyllableClass::Wildcard.invert(), SyllableClass::Wildcard);
    }

    #[test]
    fn generalize_widens_on_disagreement() {
        use SyllableClass::*;
        assert_eq!(Stressed.generalize(Stressed), Stressed);
        assert_eq!(Stressed.generalize(Unstressed), Wildcard);
        assert_eq!(Unstressed.generalize(Wildcard), Wildcard);
    }

    #[test]
    fn result_serializes_with_readable_reason() {
        let json = serde_json::to_value(ValidationResult::failure(0, Reason::DoubleStress)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ok": false, "at": 0, "reason": "Two syllables with stress in a row."})
        );

        let ok: ValidationResult =
            serde_json::from_str(r#"{"ok":true,"at":8,"reason":"Ok."}"#).unwrap();
        assert_eq!(ok, ValidationResult::success(8));
    }

    #[test]
    fn display_matches_serialized_message() {
        for reason in [Reason::Ok, Reason::WrongSyllableCount, Reason::DoubleStress, Reason::UnknownWord] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
        }
    }
}
