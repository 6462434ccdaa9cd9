//! The build pipeline: raw rows to the three written stores.
//!
//! Accumulates everything needed for a single atomic commit, then opens one `RwTxn`,
//! rather than writing row by row, so a failure partway through never leaves a
//! half-written index visible to readers.

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::clean::{Cleaner, DistanceFn};
use crate::db;
use crate::error::{NameMatchError, Result};
use crate::metaphone::double_metaphone;
use crate::model::{
    BuildReport, CleanedName, EntityIdPayload, IndexPayload, NameIdRecord, RawRecord, WordKind,
};
use crate::neighborhood::neighborhood;
use crate::text::{hash64, is_valid_word, split_words};

/// Default LMDB map size: generous enough for corpora in the low millions of names
/// without needing to be resized mid-build.
pub const DEFAULT_MAP_SIZE: usize = 4 << 30;

/// Run the full build pipeline against an already-open `index`.
///
/// Returns an error without writing anything if the index already holds data and
/// `overwrite` is false. Otherwise all three stores are written in a single
/// transaction: either the whole build lands, or (on any infrastructure error) none of
/// it does.
pub fn build(
    raw: &[RawRecord],
    index: &db::Index,
    cleaner: &dyn Cleaner,
    dist: &dyn DistanceFn,
    stopword_path: &str,
    overwrite: bool,
) -> Result<BuildReport> {
    if index.is_populated()? {
        if !overwrite {
            return Err(NameMatchError::InvalidArgument(
                "index already populated; pass overwrite=true to replace it".into(),
            ));
        }
        index.clear_all()?;
    }

    let stopwords = crate::stopwords::load(stopword_path)?;

    let mut report = BuildReport {
        rows_in: raw.len(),
        ..Default::default()
    };

    // Step 1: dedupe on (entity_id, name_id_guid, name).
    let mut seen_rows: HashSet<(&str, &str, &str)> = HashSet::new();
    let mut deduped: Vec<&RawRecord> = Vec::new();
    for row in raw {
        if seen_rows.insert((&row.entity_id, &row.name_id_guid, &row.name)) {
            deduped.push(row);
        }
    }
    report.rows_deduped = deduped.len();

    // Step 2-3: filter invalid rows, assign dense name_id, clean.
    let mut cleaned_names: Vec<CleanedName> = Vec::new();
    let mut next_name_id: u32 = 1;
    for row in deduped {
        if row.entity_id.is_empty() || !is_valid_word(&row.name) {
            report.rows_skipped_invalid_name += 1;
            continue;
        }
        let name_id_guid = if row.name_id_guid.is_empty() {
            row.entity_id.clone()
        } else {
            row.name_id_guid.clone()
        };
        let cleaned = cleaner.clean(&row.name);
        cleaned_names.push(CleanedName {
            name_id: next_name_id,
            entity_id: row.entity_id.clone(),
            name_id_guid,
            full_name: row.name.clone(),
            cleaned,
        });
        next_name_id += 1;
    }
    report.rows_indexed = cleaned_names.len();

    // Step 4-6: tokenize, dedupe-within-name, stopword-filter, then expand.
    let mut name_index: BTreeMap<u64, Vec<IndexPayload>> = BTreeMap::new();
    let mut name_id_index: BTreeMap<u32, NameIdRecord> = BTreeMap::new();
    let mut entity_id_index: BTreeMap<String, Vec<EntityIdPayload>> = BTreeMap::new();

    for name in &cleaned_names {
        // word_id is the token's ordinal position in the whitespace split, assigned
        // before invalid tokens are dropped, so a dropped token (e.g. a leading-digit
        // word) leaves a gap rather than compacting later ids.
        let mut words: Vec<(u32, &str)> = Vec::new();
        let mut seen_words: HashSet<&str> = HashSet::new();
        for (split_idx, raw_token) in split_words(&name.cleaned).into_iter().enumerate() {
            if !is_valid_word(raw_token) {
                report.words_skipped_invalid += 1;
                continue;
            }
            if !seen_words.insert(raw_token) {
                continue;
            }
            words.push((split_idx as u32, raw_token));
        }

        let mut kept_words: Vec<(u32, &str)> = Vec::new();
        for (word_id, word) in words {
            if stopwords.contains(word) {
                report.words_skipped_stopword += 1;
                continue;
            }
            kept_words.push((word_id, word));
        }

        for &(word_id, word) in &kept_words {
            let depth = dist.dist(word);
            if depth > 4 {
                return Err(NameMatchError::InvalidArgument(format!(
                    "dist() returned {depth}, must be in 0..=4"
                )));
            }
            for (variant, _deletions) in neighborhood(word, depth) {
                let edit_distance = crate::levenshtein::levenshtein(word, &variant);
                name_index.entry(hash64(&variant)).or_default().push(IndexPayload {
                    name_id: name.name_id,
                    word_id,
                    edit_distance,
                    kind: WordKind::Neighborhood,
                });
                report.neighborhood_keys_written += 1;
            }

            let phonetic = double_metaphone(word);
            if !phonetic.is_empty() {
                name_index.entry(hash64(&phonetic)).or_default().push(IndexPayload {
                    name_id: name.name_id,
                    word_id,
                    edit_distance: 1,
                    kind: WordKind::Metaphone,
                });
                report.metaphone_keys_written += 1;
            }
        }

        name_id_index.insert(
            name.name_id,
            NameIdRecord {
                entity_id: name.entity_id.clone(),
                word_count: kept_words.len() as u32,
            },
        );

        entity_id_index
            .entry(name.entity_id.clone())
            .or_default()
            .push(EntityIdPayload {
                name_id: name.name_id,
                name_id_guid: name.name_id_guid.clone(),
                full_name: name.full_name.clone(),
            });
    }

    if report.rows_skipped_invalid_name > 0 {
        warn!(
            skipped = report.rows_skipped_invalid_name,
            "dropped rows with empty entity_id or invalid name"
        );
    }

    index.write(|dbs, tx| {
        for (hash, payloads) in &name_index {
            dbs.name_index.put(tx, hash, payloads).map_err(crate::error::internal)?;
        }
        for (name_id, rec) in &name_id_index {
            dbs.name_id_index.put(tx, name_id, rec).map_err(crate::error::internal)?;
        }
        for (entity_id, payloads) in &entity_id_index {
            dbs.entity_id_index
                .put(tx, entity_id, payloads)
                .map_err(crate::error::internal)?;
        }
        Ok(())
    })?;

    Ok(report)
}
