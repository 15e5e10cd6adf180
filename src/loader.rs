//! File-facing entry point for parsing: read the whole file, then hand off
//! to [`crate::parse_from_slice`].

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::parser::{parse_from_slice, Parsed};

/// Reads `path` and parses it as a single YAML document.
pub fn parse_from_file(path: impl AsRef<Path>) -> Result<Parsed, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("loaded {} bytes from {}", text.len(), path.display());
    Ok(parse_from_slice(&text)?)
}
