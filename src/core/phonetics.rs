// src/core/phonetics.rs
use crate::core::types::SyllableClass;

/// Classifies one phoneme in CMU notation.
///
/// Vowels carry a trailing stress digit: `0` is unstressed, `1` (primary) and
/// `2` (secondary) are stressed. Anything else is a consonant and does not
/// form a syllable.
pub fn classify_phoneme(phoneme: &str) -> Option<SyllableClass> {
    match phoneme.as_bytes().last() {
        Some(b'0') => Some(SyllableClass::Unstressed),
        Some(b'1') | Some(b'2') => Some(SyllableClass::Stressed),
        _ => None,
    }
}

/// Builds the accent pattern of one pronunciation: one class per vowel, in
/// order. A one-syllable word collapses to a single `Wildcard`.
pub fn accent_pattern<I, S>(phonemes: I) -> Vec<SyllableClass>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pattern: Vec<SyllableClass> = phonemes
        .into_iter()
        .filter_map(|p| classify_phoneme(p.as_ref()))
        .collect();

    if pattern.len() == 1 {
        // One syllable words can take either stress
        pattern[0] = SyllableClass::Wildcard;
    }
    pattern
}

/// Merges two patterns position by position, widening to `Wildcard` where
/// they disagree. The result is as long as the shorter input.
pub fn merge_patterns(a: &[SyllableClass], b: &[SyllableClass]) -> Vec<SyllableClass> {
    a.iter().zip(b).map(|(x, y)| x.generalize(*y)).collect()
}

/// Renders a pattern with `u` for unstressed, `/` for stressed and `*` for
/// either.
pub fn render_pattern(pattern: &[SyllableClass]) -> String {
    pattern.iter().map(|s| s.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use SyllableClass::*;

    #[test]
    fn stress_digits_classify_vowels() {
        assert_eq!(classify_phoneme("AH0"), Some(Unstressed));
        assert_eq!(classify_phoneme("EY1"), Some(Stressed));
        assert_eq!(classify_phoneme("AW2"), Some(Stressed));
        assert_eq!(classify_phoneme("TH"), None);
        assert_eq!(classify_phoneme("AH3"), None);
        assert_eq!(classify_phoneme(""), None);
    }

    #[test]
    fn single_syllable_is_wildcard_whatever_the_digit() {
        assert_eq!(accent_pattern(["D", "EY1"]), vec![Wildcard]);
        assert_eq!(accent_pattern(["AH0"]), vec![Wildcard]);
        assert_eq!(accent_pattern(["SH", "AE2", "L"]), vec![Wildcard]);
    }

    #[test]
    fn multi_syllable_keeps_each_vowel() {
        // TENENBAUM
        let pattern = accent_pattern(["T", "EH1", "N", "AH0", "N", "B", "AW2", "M"]);
        assert_eq!(pattern, vec![Stressed, Unstressed, Stressed]);
        // PYTHON
        assert_eq!(accent_pattern(["P", "AY1", "TH", "AA0", "N"]), vec![Stressed, Unstressed]);
    }

    #[test]
    fn consonant_only_pronunciation_has_no_syllables() {
        assert!(accent_pattern(["HH", "M"]).is_empty());
    }

    #[test]
    fn merge_widens_disagreements() {
        let merged = merge_patterns(&[Stressed, Unstressed, Unstressed], &[Stressed, Stressed]);
        assert_eq!(merged, vec![Stressed, Wildcard]);
        assert_eq!(render_pattern(&merged), "/*");
    }
}
