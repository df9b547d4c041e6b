// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::Config;
pub use crate::core::dictionary::{Dictionary, Pronunciation};
pub use crate::core::engine::IambicValidator;
pub use crate::core::matcher::preprocess;
pub use crate::core::types::{Reason, SyllableClass, ValidationResult};
pub use crate::error::{ConfigError, LoadError};
