// File: src/error.rs
use std::path::PathBuf;

/// Failures that stop a pronunciation dictionary from being built.
///
/// A line that does not scan is never an error; see `ValidationResult`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read dictionary source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary entry on line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    #[error("dictionary source {path} contains no usable entries")]
    Empty { path: PathBuf },

    #[error("cannot use dictionary snapshot: {0}")]
    Snapshot(String),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io { path: path.into(), source }
    }
}

/// Failures reading a JSON config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
