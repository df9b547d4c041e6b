// File: src/config.rs
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DICTIONARY_PATH: &str = "data/cmudict-0.7b.txt";
pub const DEFAULT_SEARCH_BUDGET: usize = 1_000_000;

pub const ENV_DICTIONARY: &str = "IAMBIC_DICTIONARY";
pub const ENV_CACHE: &str = "IAMBIC_CACHE";
pub const ENV_SEARCH_BUDGET: &str = "IAMBIC_SEARCH_BUDGET";

/// Where the dictionary comes from and how hard the matcher may search.
///
/// A JSON config file may set any subset of the fields; the rest keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary_path: PathBuf,
    /// Compiled snapshot of the parsed dictionary, if caching is wanted.
    pub cache_path: Option<PathBuf>,
    /// Upper bound on search nodes visited for a single line.
    pub search_budget: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            cache_path: None,
            search_budget: DEFAULT_SEARCH_BUDGET,
        }
    }
}

impl Config {
    /// Defaults, overridden by `IAMBIC_DICTIONARY`, `IAMBIC_CACHE` and
    /// `IAMBIC_SEARCH_BUDGET` when set.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Reads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Applies the `IAMBIC_*` environment overrides on top of `self`.
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;

        if let Some(path) = lookup(ENV_DICTIONARY).filter(|v| !v.is_empty()) {
            config.dictionary_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_CACHE).filter(|v| !v.is_empty()) {
            config.cache_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_SEARCH_BUDGET) {
            match raw.trim().parse::<usize>() {
                Ok(budget) if budget > 0 => config.search_budget = budget,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_SEARCH_BUDGET),
            }
        }
        config
    }

    pub fn with_dictionary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_path = path.into();
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn with_search_budget(mut self, budget: usize) -> Self {
        self.search_budget = budget;
        self
    }
}
