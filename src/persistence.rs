// File: src/persistence.rs
use crate::core::dictionary::Dictionary;
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the layout of `Dictionary` changes.
const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    dictionary: &'a Dictionary,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    dictionary: Dictionary,
}

/// Writes a compiled snapshot of `dictionary` to `path`.
///
/// The data goes to a temporary file next to `path` first and is then
/// renamed over it, so readers never see a half-written snapshot.
pub fn save_to_disk(dictionary: &Dictionary, path: &Path) -> Result<(), Error> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = SnapshotRef { version: SNAPSHOT_VERSION, dictionary };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    bincode::serialize_into(&mut writer, &snapshot).map_err(|e| Error::new(std::io::ErrorKind::Other, e))?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path)?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Dictionary, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot =
        bincode::deserialize_from(reader).map_err(|e| LoadError::Snapshot(e.to_string()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LoadError::Snapshot(format!(
            "format version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let dictionary = snapshot.dictionary;
    if let Some(word) = dictionary.words().find(|w| dictionary.get(w).map_or(true, <[_]>::is_empty)) {
        return Err(LoadError::Snapshot(format!("no pronunciations for {word:?}")));
    }
    Ok(dictionary)
}

/// Prefers the snapshot at `cache` when it is current; otherwise parses
/// `source` and rewrites the snapshot. Failing to write the snapshot is not
/// fatal.
pub fn load_cached(source: &Path, cache: &Path) -> Result<Dictionary, LoadError> {
    if snapshot_is_current(source, cache) {
        match load_from_disk(cache) {
            Ok(dictionary) => {
                tracing::info!(
                    cache = %cache.display(),
                    words = dictionary.len(),
                    "loaded dictionary snapshot"
                );
                return Ok(dictionary);
            }
            Err(e) => tracing::warn!(cache = %cache.display(), error = %e, "discarding dictionary snapshot"),
        }
    }

    let dictionary = Dictionary::load(source)?;
    match save_to_disk(&dictionary, cache) {
        Ok(()) => tracing::debug!(cache = %cache.display(), "wrote dictionary snapshot"),
        Err(e) => tracing::warn!(cache = %cache.display(), error = %e, "could not write dictionary snapshot"),
    }
    Ok(dictionary)
}

/// A snapshot is current when it exists and is not older than its source.
/// With the source gone, any snapshot is better than nothing.
fn snapshot_is_current(source: &Path, cache: &Path) -> bool {
    let cache_modified = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(time) => time,
        Err(_) => return false,
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_modified) => cache_modified >= source_modified,
        Err(_) => true,
    }
}
