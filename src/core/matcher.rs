// File: src/core/matcher.rs
use crate::core::dictionary::{Dictionary, Pronunciation};
use crate::core::types::{Reason, SyllableClass, ValidationResult};

/// Five iambs.
pub const PENTAMETER_SYLLABLES: usize = 10;

/// Normalizes a line the way dictionary keys are written: ASCII punctuation
/// other than the apostrophe is removed, the text is uppercased and split on
/// whitespace.
pub fn preprocess(sentence: &str) -> Vec<String> {
    let cleaned: String = sentence
        .chars()
        .filter(|&c| c == '\'' || !c.is_ascii_punctuation())
        .collect();
    cleaned.to_uppercase().split_whitespace().map(str::to_string).collect()
}

/// Checks one line against the dictionary.
///
/// Every token is resolved first; a token the dictionary does not know ends
/// the check with `UnknownWord` at its index. Otherwise a depth-first search
/// over pronunciation variants looks for an assignment that alternates stress
/// and totals ten syllables.
pub fn match_line(dictionary: &Dictionary, sentence: &str, budget: usize) -> ValidationResult {
    let tokens = preprocess(sentence);

    let mut words = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        match dictionary.get(token) {
            Some(variants) => words.push(variants),
            None => return ValidationResult::failure(index, Reason::UnknownWord),
        }
    }

    Matcher::new(words, budget).run()
}

struct Matcher<'d> {
    words: Vec<&'d [Pronunciation]>,
    budget: usize,
    visited: usize,
    exhausted: bool,
}

/// One word on the search path: which variant to try next, and the failure
/// of the most recently explored branch below it.
struct Frame {
    index: usize,
    cursor: usize,
    state: SyllableClass,
    syllables: usize,
    last_failure: ValidationResult,
}

enum Step {
    Descend(usize, SyllableClass, usize),
    Exhausted(ValidationResult),
}

impl<'d> Matcher<'d> {
    fn new(words: Vec<&'d [Pronunciation]>, budget: usize) -> Self {
        Self { words, budget, visited: 0, exhausted: false }
    }

    /// Depth-first search over the variants of each word in source order,
    /// on an explicit stack so line length never bounds the call depth. The
    /// first success wins; otherwise the failure from the last explored
    /// branch is reported.
    fn run(&mut self) -> ValidationResult {
        // Pretend the syllable before the line was stressed, so the line must
        // open on an unstressed (or either-way) syllable.
        let mut stack = match self.enter(0, SyllableClass::Stressed, 0) {
            Ok(frame) => vec![frame],
            Err(result) => return result,
        };

        while let Some(frame) = stack.last_mut() {
            let step = self.next_variant(frame);

            match step {
                Step::Descend(index, state, syllables) => match self.enter(index, state, syllables) {
                    Ok(child) => stack.push(child),
                    Err(result) if result.ok => return result,
                    Err(result) => {
                        if let Some(current) = stack.last_mut() {
                            current.last_failure = result;
                        }
                    }
                },
                Step::Exhausted(failure) => {
                    stack.pop();
                    match stack.last_mut() {
                        Some(parent) => parent.last_failure = failure,
                        None => return failure,
                    }
                }
            }
        }

        // The loop only ends through a return above.
        ValidationResult::failure(0, Reason::WrongSyllableCount)
    }

    /// Opens the node for the word at `index`, or resolves it at once when
    /// no words remain or the budget is spent.
    fn enter(&mut self, index: usize, state: SyllableClass, syllables: usize) -> Result<Frame, ValidationResult> {
        if index == self.words.len() {
            return Err(if syllables == PENTAMETER_SYLLABLES {
                ValidationResult::success(index)
            } else {
                ValidationResult::failure(index, Reason::WrongSyllableCount)
            });
        }

        self.visited += 1;
        if self.visited > self.budget {
            if !self.exhausted {
                self.exhausted = true;
                tracing::warn!(budget = self.budget, index, "search budget exhausted");
            }
            return Err(ValidationResult::failure(index, Reason::WrongSyllableCount));
        }

        Ok(Frame {
            index,
            cursor: 0,
            state,
            syllables,
            last_failure: ValidationResult::failure(index, Reason::DoubleStress),
        })
    }

    /// Advances `frame` past the next variant that can follow its state.
    fn next_variant(&self, frame: &mut Frame) -> Step {
        let variants = self.words[frame.index];

        while let Some(pronunciation) = variants.get(frame.cursor) {
            frame.cursor += 1;

            // Wildcard never equals a concrete state, so it always passes.
            if pronunciation.start_state() == frame.state {
                continue;
            }

            let count = pronunciation.syllable_count();
            let next_state = if count % 2 == 1 { frame.state.invert() } else { frame.state };
            return Step::Descend(frame.index + 1, next_state, frame.syllables + count);
        }

        Step::Exhausted(frame.last_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = "\
A  AH0
A(1)  EY1
ABOUT  AH0 B AW1 T
CAT  K AE1 T
HAPPY  HH AE1 P IY0
OBJECT  AA1 B JH EH0 K T
OBJECT(1)  AH0 B JH EH1 K T
RECORD  R EH1 K ER0 D
RECORD(1)  R IH0 K AO1 R D
SAT  S AE1 T
TEMPERATE  T EH1 M P ER0 AH0 T
TEMPERATE(1)  T EH1 M P R AH0 T
TENENBAUM  T EH1 N AH0 N B AW2 M
THE  DH AH0
";

    fn dict() -> Dictionary {
        Dictionary::parse_str(WORDS).unwrap()
    }

    fn check(line: &str) -> ValidationResult {
        match_line(&dict(), line, 10_000)
    }

    #[test]
    fn preprocess_keeps_apostrophes_and_uppercases() {
        assert_eq!(
            preprocess("Shall I compare thee to a summer's day?"),
            ["SHALL", "I", "COMPARE", "THEE", "TO", "A", "SUMMER'S", "DAY"]
        );
        assert_eq!(preprocess("  well-known,   \"quoted\" "), ["WELLKNOWN", "QUOTED"]);
        assert!(preprocess("?!.").is_empty());
    }

    #[test]
    fn ten_wildcards_scan() {
        assert_eq!(check("the cat sat a cat the cat sat a cat"), ValidationResult::success(10));
    }

    #[test]
    fn empty_line_has_wrong_count() {
        assert_eq!(check(""), ValidationResult::failure(0, Reason::WrongSyllableCount));
    }

    #[test]
    fn too_few_syllables_fail_at_end() {
        assert_eq!(check("The cat sat."), ValidationResult::failure(3, Reason::WrongSyllableCount));
    }

    #[test]
    fn unknown_word_reported_at_its_index() {
        assert_eq!(check("the cat xyzzy sat"), ValidationResult::failure(2, Reason::UnknownWord));
    }

    #[test]
    fn unknown_word_wins_over_earlier_stress_clash() {
        // TENENBAUM alone would clash at 0, but the unknown word is definitive.
        assert_eq!(check("Tenenbaum xyzzy"), ValidationResult::failure(1, Reason::UnknownWord));
    }

    #[test]
    fn stressed_opening_clashes_with_sentinel() {
        assert_eq!(check("Tenenbaum"), ValidationResult::failure(0, Reason::DoubleStress));
        assert_eq!(check("happy cat"), ValidationResult::failure(0, Reason::DoubleStress));
    }

    #[test]
    fn backtracks_into_later_variant() {
        // OBJECT(1) starts unstressed and is the only variant that can open
        // the line; RECORD(1) is needed after it. u/ u/ * * * * * *
        let line = "object record cat sat a cat the cat";
        assert_eq!(check(line), ValidationResult::success(8));
    }

    #[test]
    fn reports_last_explored_branch() {
        // TEMPERATE's three-syllable variant clashes with HAPPY at 2, then the
        // two-syllable variant runs out of words at 3. The later branch wins.
        assert_eq!(check("the temperate happy"), ValidationResult::failure(3, Reason::WrongSyllableCount));
        // RECORD's stressed-first variant clashes at once; RECORD(1) recurses.
        assert_eq!(check("record cat"), ValidationResult::failure(2, Reason::WrongSyllableCount));
        assert_eq!(check("record happy"), ValidationResult::failure(1, Reason::DoubleStress));
    }

    #[test]
    fn odd_syllable_words_flip_state() {
        assert_eq!(check("the tenenbaum happy"), ValidationResult::failure(2, Reason::DoubleStress));
    }

    #[test]
    fn even_syllable_words_keep_state() {
        assert_eq!(check("the happy happy"), ValidationResult::failure(3, Reason::WrongSyllableCount));
        assert_eq!(check("about happy"), ValidationResult::failure(1, Reason::DoubleStress));
        assert_eq!(check("about about about about about"), ValidationResult::success(5));
    }

    #[test]
    fn long_lines_do_not_exhaust_the_call_stack() {
        let line = "the ".repeat(200_000);
        assert_eq!(
            match_line(&dict(), &line, crate::config::DEFAULT_SEARCH_BUDGET),
            ValidationResult::failure(200_000, Reason::WrongSyllableCount)
        );
    }

    #[test]
    fn exhausted_budget_fails_without_panicking() {
        let result = match_line(&dict(), "the cat sat a cat the cat sat a cat", 3);
        assert!(!result.ok);
        assert_eq!(result.reason, Reason::WrongSyllableCount);
    }
}
