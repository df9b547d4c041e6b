// --- File: src/core/dictionary.rs
use crate::core::phonetics::{accent_pattern, merge_patterns};
use crate::core::types::SyllableClass;
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::time::Instant;

/// One way of saying a word, as listed by the source dictionary.
///
/// Only the phonemes are serialized; deserializing rebuilds the accent
/// pattern through `Pronunciation::new`, so a restored value has the same
/// guarantees as a parsed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PhonemeRecord", try_from = "PhonemeRecord")]
pub struct Pronunciation {
    phonemes: Vec<String>,
    accent_pattern: Vec<SyllableClass>,
}

#[derive(Serialize, Deserialize)]
struct PhonemeRecord {
    phonemes: Vec<String>,
}

impl From<Pronunciation> for PhonemeRecord {
    fn from(p: Pronunciation) -> Self {
        Self { phonemes: p.phonemes }
    }
}

impl TryFrom<PhonemeRecord> for Pronunciation {
    type Error = String;

    fn try_from(record: PhonemeRecord) -> Result<Self, Self::Error> {
        let listing = record.phonemes.join(" ");
        Pronunciation::new(record.phonemes).ok_or_else(|| format!("pronunciation without vowels: {listing:?}"))
    }
}

impl Pronunciation {
    /// Builds a pronunciation from CMU phonemes, e.g. `["P", "AY1", "TH", "AA0", "N"]`.
    /// Returns `None` when no phoneme carries a stress digit, since such a
    /// pronunciation has no syllables to scan.
    pub fn new<S: Into<String>>(phonemes: impl IntoIterator<Item = S>) -> Option<Self> {
        let phonemes: Vec<String> = phonemes.into_iter().map(Into::into).collect();
        let accent_pattern = accent_pattern(&phonemes);
        if accent_pattern.is_empty() {
            return None;
        }
        Some(Self { phonemes, accent_pattern })
    }

    pub fn phonemes(&self) -> &[String] {
        &self.phonemes
    }

    pub fn accent_pattern(&self) -> &[SyllableClass] {
        &self.accent_pattern
    }

    /// Class of the first syllable.
    pub fn start_state(&self) -> SyllableClass {
        // `new` guarantees at least one syllable.
        self.accent_pattern[0]
    }

    pub fn syllable_count(&self) -> usize {
        self.accent_pattern.len()
    }
}

/// Uppercase word -> pronunciation variants in source order.
///
/// Built once and then only read, so it can be shared across threads behind
/// an `Arc` without locking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl Dictionary {
    /// Parses a dictionary file in CMU format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let started = Instant::now();
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let dictionary = Self::parse(BufReader::new(file), path)?;

        tracing::info!(
            path = %path.display(),
            words = dictionary.len(),
            pronunciations = dictionary.pronunciation_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded pronunciation dictionary"
        );
        Ok(dictionary)
    }

    /// Parses CMU-format data from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        Self::parse(reader, Path::new("<reader>"))
    }

    pub fn parse_str(source: &str) -> Result<Self, LoadError> {
        Self::parse(Cursor::new(source.as_bytes()), Path::new("<string>"))
    }

    /// Re-parses `path` from scratch. The current contents are replaced only
    /// if the new load succeeds.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Uses the compiled snapshot at `cache` when it is at least as new as
    /// `source`, otherwise parses `source` and refreshes the snapshot.
    pub fn load_cached(source: impl AsRef<Path>, cache: impl AsRef<Path>) -> Result<Self, LoadError> {
        crate::persistence::load_cached(source.as_ref(), cache.as_ref())
    }

    fn parse<R: BufRead>(mut reader: R, origin: &Path) -> Result<Self, LoadError> {
        let mut entries: HashMap<String, Vec<Pronunciation>> = HashMap::new();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| LoadError::io(origin, e))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            // The published file is not guaranteed to be clean UTF-8.
            let line = String::from_utf8_lossy(&buf);
            if line.starts_with(";;;") {
                continue;
            }
            // Entries for punctuation marks start with the mark itself.
            if !line.starts_with(|c: char| c.is_ascii_uppercase()) {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let key = match tokens.next() {
                Some(key) => key,
                None => continue,
            };
            let phonemes: Vec<&str> = tokens.collect();
            if phonemes.is_empty() {
                return Err(LoadError::Malformed {
                    line: line_no,
                    content: line.trim_end().to_string(),
                });
            }

            // WORD(1), WORD(2) ... are numbered variants of WORD.
            let word = match key.find('(') {
                Some(idx) => &key[..idx],
                None => key,
            };

            match Pronunciation::new(phonemes) {
                Some(pronunciation) => entries.entry(word.to_string()).or_default().push(pronunciation),
                None => tracing::debug!(word, line = line_no, "skipping pronunciation without vowels"),
            }
        }

        if entries.is_empty() {
            return Err(LoadError::Empty { path: origin.to_path_buf() });
        }
        Ok(Self { entries })
    }

    /// Variants for an already normalized (uppercase) word.
    pub fn get(&self, word: &str) -> Option<&[Pronunciation]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pronunciations across all words.
    pub fn pronunciation_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Single pattern covering every variant of `word`, with `Wildcard`
    /// wherever the variants disagree.
    pub fn merged_pattern(&self, word: &str) -> Option<Vec<SyllableClass>> {
        let (first, rest) = self.get(word)?.split_first()?;
        let merged = rest
            .iter()
            .fold(first.accent_pattern().to_vec(), |acc, p| merge_patterns(&acc, p.accent_pattern()));
        Some(merged)
    }
}
