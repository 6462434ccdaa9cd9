//! Stopword set loading.
//!
//! A stopword file is a sequence of UTF-8 words, one per line; an empty path signals no
//! stopword set at all rather than an error.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// Load a stopword set from `path`. An empty path yields the empty set.
pub fn load(path: &str) -> Result<HashSet<String>> {
    if path.is_empty() {
        return Ok(HashSet::new());
    }
    let contents = std::fs::read_to_string(Path::new(path))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect())
}
