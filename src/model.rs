//! Data model: the row types persisted in the three stores and passed between pipeline
//! stages. Splits a public, owned record type from the compact keyed rows actually
//! written to LMDB.

use serde::{Deserialize, Serialize};

/// A name as supplied by the caller at build time, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub entity_id: String,
    /// UUID-like alias id for this particular name; defaults to `entity_id` when empty.
    pub name_id_guid: String,
    pub name: String,
}

/// A name after deduplication, dense `name_id` assignment, and the caller's `clean`
/// function have all been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedName {
    pub name_id: u32,
    pub entity_id: String,
    pub name_id_guid: String,
    pub full_name: String,
    pub cleaned: String,
}

/// Whether an `IndexPayload` entry was reached via deletion-neighborhood expansion or via
/// phonetic (double metaphone) expansion; both are stored the same way but are reported
/// separately in `BuildReport` diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordKind {
    Neighborhood,
    Metaphone,
}

/// A single row of the NameIndex store's value: one occurrence of a deleted/phonetic key
/// pointing back to the word it was generated from, within a specific name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPayload {
    /// Dense id of the name (row) this word occurrence belongs to.
    pub name_id: u32,
    /// Index of the originating word within that name's word list.
    pub word_id: u32,
    /// Number of deletions (or 1 for a phonetic key) between the stored key and the
    /// original word.
    pub edit_distance: u32,
    pub kind: WordKind,
}

/// The value stored under a dense `name_id` key in the NameIDIndex store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdRecord {
    pub entity_id: String,
    pub word_count: u32,
}

/// One alias row stored under an `entity_id` key in the EntityIDIndex store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIdPayload {
    pub name_id: u32,
    pub name_id_guid: String,
    pub full_name: String,
}

/// A single match returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub entity_id: String,
    pub name_id: u32,
    pub name_id_guid: String,
    pub full_name: String,
    pub score: u32,
    pub is_match: bool,
}

/// Summary of a completed (or partially completed, on skip-and-count failures) build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub rows_in: usize,
    pub rows_deduped: usize,
    pub rows_indexed: usize,
    pub rows_skipped_invalid_name: usize,
    pub words_skipped_invalid: usize,
    pub words_skipped_stopword: usize,
    pub neighborhood_keys_written: usize,
    pub metaphone_keys_written: usize,
}
