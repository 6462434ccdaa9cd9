//! Query-side pipeline: tokenize, expand, probe, aggregate, score, rank.

use std::collections::{HashMap, HashSet};

use crate::clean::{Cleaner, DistanceFn};
use crate::db::Index;
use crate::error::{NameMatchError, Result};
use crate::metaphone::double_metaphone;
use crate::model::MatchResult;
use crate::neighborhood::neighborhood;
use crate::text::{hash64, is_valid_word, split_words};

/// Default cap on result rows carried through the top-K selection.
pub const DEFAULT_MAX_DIRECT: usize = 2000;

/// Default cap on payloads returned by a single NameIndex key probe before the query is
/// treated as unreliable and aborted (see `NameMatchError::IndexFanoutLimit`).
pub const DEFAULT_FANOUT_CAP: usize = 10_000;

/// Cooperative cancellation checked between pipeline stages. `best_matches` aborts with
/// `NameMatchError::Cancelled` and no partial results the first time this returns true.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F: Fn() -> bool> Cancellation for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

fn check(cancel: &dyn Cancellation) -> Result<()> {
    if cancel.is_cancelled() {
        Err(NameMatchError::Cancelled)
    } else {
        Ok(())
    }
}

struct ReducedMatch {
    edit_distance: u32,
}

/// Run the full query pipeline and return ranked, unpaginated results (see
/// [`crate::query`] for the post-filter/pagination contract applied on top of this).
#[allow(clippy::too_many_arguments)]
pub fn best_matches(
    query: &str,
    index: &Index,
    cleaner: &dyn Cleaner,
    dist: &dyn DistanceFn,
    stopwords: &HashSet<String>,
    max_direct: usize,
    fanout_cap: usize,
    cancel: &dyn Cancellation,
) -> Result<Vec<MatchResult>> {
    check(cancel)?;

    // Stage 1: query tokenization.
    let cleaned = cleaner.clean(query);
    let mut q_tokens: Vec<String> = Vec::new();
    let mut seen_tokens: HashSet<&str> = HashSet::new();
    for token in split_words(&cleaned) {
        if is_valid_word(token) && !stopwords.contains(token) && seen_tokens.insert(token) {
            q_tokens.push(token.to_string());
        }
    }
    if q_tokens.is_empty() {
        return Ok(Vec::new());
    }

    check(cancel)?;

    // Stage 2: query expansion.
    let mut hashes: HashSet<u64> = HashSet::new();
    for token in &q_tokens {
        let depth = dist.dist(token);
        if depth > 4 {
            return Err(NameMatchError::InvalidArgument(format!(
                "dist() returned {depth}, must be in 0..=4"
            )));
        }
        for (variant, _depth) in neighborhood(token, depth) {
            if is_valid_word(&variant) {
                hashes.insert(hash64(&variant));
            }
        }
        let phonetic = double_metaphone(token);
        if !phonetic.is_empty() {
            hashes.insert(hash64(&phonetic));
        }
    }

    check(cancel)?;

    // Stage 3: probe NameIndex, building the candidate set.
    let mut candidates = Vec::new();
    index.read(|dbs, tx| {
        for hash in &hashes {
            if let Some(payloads) = dbs.name_index.get(tx, hash).map_err(crate::error::internal)? {
                if payloads.len() > fanout_cap {
                    return Err(NameMatchError::IndexFanoutLimit {
                        got: payloads.len(),
                        limit: fanout_cap,
                    });
                }
                candidates.extend(payloads);
            }
        }
        Ok(())
    })?;

    check(cancel)?;

    // Stage 4: per-(name_id, word_id) reduction, keeping the smallest edit distance.
    let mut reduced: HashMap<(u32, u32), ReducedMatch> = HashMap::new();
    for c in &candidates {
        reduced
            .entry((c.name_id, c.word_id))
            .and_modify(|m| {
                if c.edit_distance < m.edit_distance {
                    m.edit_distance = c.edit_distance;
                }
            })
            .or_insert(ReducedMatch {
                edit_distance: c.edit_distance,
            });
    }

    check(cancel)?;

    // Stage 5: per-name aggregation.
    struct NameAgg {
        matched: u32,
        ed_sum: u32,
    }
    let mut per_name: HashMap<u32, NameAgg> = HashMap::new();
    for ((name_id, _word_id), m) in &reduced {
        let agg = per_name.entry(*name_id).or_insert(NameAgg { matched: 0, ed_sum: 0 });
        agg.matched += 1;
        agg.ed_sum += m.edit_distance;
    }

    // Stage 6: max_matched.
    let max_matched = match per_name.values().map(|a| a.matched).max() {
        Some(m) if m > 0 => m,
        _ => return Ok(Vec::new()),
    };

    check(cancel)?;

    // Stage 7: resolve to entity and score.
    struct ScoredName {
        entity_id: String,
        score: u32,
    }
    let mut scored: Vec<ScoredName> = Vec::new();
    index.read(|dbs, tx| {
        for (name_id, agg) in &per_name {
            if let Some(rec) = dbs.name_id_index.get(tx, name_id).map_err(crate::error::internal)? {
                scored.push(ScoredName {
                    entity_id: rec.entity_id.clone(),
                    score: score(max_matched, agg.matched, agg.ed_sum, rec.word_count),
                });
            }
        }
        Ok(())
    })?;

    check(cancel)?;

    // Stage 8: per-entity collapse, keeping the maximum score.
    let mut entity_scores: HashMap<String, u32> = HashMap::new();
    for s in scored {
        entity_scores
            .entry(s.entity_id)
            .and_modify(|existing| *existing = (*existing).max(s.score))
            .or_insert(s.score);
    }

    // Stage 9: top-K selection by cumulative score-bucket count.
    let mut by_score: Vec<(u32, Vec<String>)> = {
        let mut buckets: HashMap<u32, Vec<String>> = HashMap::new();
        for (entity_id, score) in &entity_scores {
            buckets.entry(*score).or_default().push(entity_id.clone());
        }
        buckets.into_iter().collect()
    };
    by_score.sort_by(|a, b| b.0.cmp(&a.0));

    let mut kept_entities: HashSet<String> = HashSet::new();
    let mut cumulative = 0usize;
    for (_score, ids) in &by_score {
        if cumulative > 0 && cumulative + ids.len() > max_direct {
            break;
        }
        cumulative += ids.len();
        kept_entities.extend(ids.iter().cloned());
    }

    check(cancel)?;

    // Stage 10: expand to full records via EntityIDIndex.
    let matched_name_ids: HashSet<u32> = per_name.keys().copied().collect();
    let mut results = Vec::new();
    index.read(|dbs, tx| {
        for entity_id in &kept_entities {
            let score = *entity_scores.get(entity_id).expect("kept entity has a score");
            if let Some(payloads) = dbs
                .entity_id_index
                .get(tx, entity_id)
                .map_err(crate::error::internal)?
            {
                for p in payloads {
                    results.push(MatchResult {
                        entity_id: entity_id.clone(),
                        name_id: p.name_id,
                        name_id_guid: p.name_id_guid,
                        full_name: p.full_name,
                        score,
                        is_match: matched_name_ids.contains(&p.name_id),
                    });
                }
            }
        }
        Ok(())
    })?;

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
            .then_with(|| b.is_match.cmp(&a.is_match))
    });

    Ok(results)
}

/// The match-quality scoring formula, computed in floating point and truncated toward zero.
fn score(max_matched: u32, matched: u32, ed_sum: u32, word_count: u32) -> u32 {
    let max_matched = max_matched as f64;
    let matched_f = matched as f64;
    let word_count_f = word_count as f64;

    let query_word_count_ratio = (max_matched - matched_f) / max_matched;
    let matched_word_count_ratio = if word_count_f == 0.0 {
        0.0
    } else {
        (word_count_f - matched_f) / word_count_f
    };

    let matched_word_count_penalty = 10.0 * matched_word_count_ratio;
    let edit_distance_penalty = 10.0 * ed_sum as f64;
    let query_word_count_penalty = 10.0 * query_word_count_ratio;

    let raw = 100.0 - matched_word_count_penalty - edit_distance_penalty - query_word_count_penalty;
    raw.max(0.0).min(100.0).trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_match_scores_100() {
        // matched == max_matched == word_count, ed_sum == 0.
        assert_eq!(score(2, 2, 0, 2), 100);
    }

    #[test]
    fn edit_distance_reduces_score() {
        assert!(score(2, 2, 1, 2) < 100);
    }

    #[test]
    fn score_never_goes_negative() {
        assert_eq!(score(1, 1, 50, 1), 0);
    }

    #[test]
    fn fewer_matched_words_than_query_reduces_score() {
        let full = score(3, 3, 0, 3);
        let partial = score(3, 1, 0, 3);
        assert!(partial < full);
    }
}
