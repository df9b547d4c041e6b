use crate::config::Config;
use crate::core::dictionary::Dictionary;
use crate::core::matcher::match_line;
use crate::core::types::ValidationResult;
use crate::error::LoadError;
use std::sync::Arc;

/// Entry point for callers: checks single lines or whole stanzas against a
/// shared, read-only dictionary.
///
/// Cloning is cheap; clones share the same dictionary.
#[derive(Debug, Clone)]
pub struct IambicValidator {
    dictionary: Arc<Dictionary>,
    search_budget: usize,
}

impl IambicValidator {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self::with_budget(dictionary, crate::config::DEFAULT_SEARCH_BUDGET)
    }

    pub fn with_budget(dictionary: Arc<Dictionary>, search_budget: usize) -> Self {
        Self { dictionary, search_budget }
    }

    /// Loads the dictionary named by `config`, through its snapshot when a
    /// cache path is configured.
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let dictionary = match &config.cache_path {
            Some(cache) => Dictionary::load_cached(&config.dictionary_path, cache)?,
            None => Dictionary::load(&config.dictionary_path)?,
        };
        Ok(Self::with_budget(Arc::new(dictionary), config.search_budget))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Decides whether `sentence` scans as iambic pentameter, and if not,
    /// where and why it fails.
    pub fn validate_line(&self, sentence: &str) -> ValidationResult {
        let result = match_line(&self.dictionary, sentence, self.search_budget);
        tracing::debug!(line = sentence, ok = result.ok, at = result.at, reason = %result.reason, "validated line");
        result
    }

    /// One result per line of `text`, after trimming blank edges.
    pub fn validate_lines(&self, text: &str) -> Vec<ValidationResult> {
        stanza_lines(text).map(|line| self.validate_line(line)).collect()
    }

    /// True only when every line of `text` scans. Blank lines at the edges
    /// are ignored; blank lines in the middle count as lines and fail.
    pub fn validate_block(&self, text: &str) -> bool {
        stanza_lines(text).all(|line| self.validate_line(line).ok)
    }
}

fn stanza_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim().lines()
}
