// src/core/mod.rs

pub mod dictionary;
pub mod engine;
pub mod matcher;
pub mod phonetics;
pub mod types;
