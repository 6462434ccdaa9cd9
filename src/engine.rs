//! The orchestrator: wires the builder and matcher together behind one open index and
//! enforces the invariants around it (non-empty paths, `dist` range, shared read-only
//! snapshot at query time).

use std::collections::HashSet;

use crate::builder::{self, DEFAULT_MAP_SIZE};
use crate::clean::{Cleaner, DistanceFn};
use crate::db::Index;
use crate::error::{NameMatchError, Result};
use crate::matcher::{self, Cancellation, DEFAULT_FANOUT_CAP, DEFAULT_MAX_DIRECT};
use crate::model::{BuildReport, MatchResult, RawRecord};
use crate::query::{filter_and_paginate, QueryParams};

/// A fuzzy name-matching engine bound to one on-disk index.
///
/// Holds the index open for the engine's lifetime so that `query` calls share a single
/// environment and never re-pay LMDB's open cost per call: opened once per process,
/// shared across concurrent queries.
pub struct NameMatchEngine {
    index: Index,
    stopwords: HashSet<String>,
}

impl NameMatchEngine {
    /// Open (or create) the index rooted at `index_path`.
    pub fn open(index_path: &str) -> Result<Self> {
        Self::open_with_map_size(index_path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(index_path: &str, map_size: usize) -> Result<Self> {
        if index_path.is_empty() {
            return Err(NameMatchError::InvalidArgument("index path must not be empty".into()));
        }
        Ok(NameMatchEngine {
            index: Index::open(index_path, map_size)?,
            stopwords: HashSet::new(),
        })
    }

    /// Run a build over `raw`, replacing any stopword set previously loaded for queries
    /// with the one at `stopword_path`.
    pub fn build(
        &mut self,
        raw: &[RawRecord],
        cleaner: &dyn Cleaner,
        dist: &dyn DistanceFn,
        stopword_path: &str,
        overwrite: bool,
    ) -> Result<BuildReport> {
        let report = builder::build(raw, &self.index, cleaner, dist, stopword_path, overwrite)?;
        self.stopwords = crate::stopwords::load(stopword_path)?;
        Ok(report)
    }

    /// Run `best_matches` against the open index and apply `params`' post-filter and
    /// pagination.
    pub fn query(
        &self,
        text: &str,
        cleaner: &dyn Cleaner,
        dist: &dyn DistanceFn,
        params: QueryParams,
    ) -> Result<Vec<MatchResult>> {
        self.query_with(text, cleaner, dist, params, DEFAULT_MAX_DIRECT, DEFAULT_FANOUT_CAP, &())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn query_with(
        &self,
        text: &str,
        cleaner: &dyn Cleaner,
        dist: &dyn DistanceFn,
        params: QueryParams,
        max_direct: usize,
        fanout_cap: usize,
        cancel: &dyn Cancellation,
    ) -> Result<Vec<MatchResult>> {
        let ranked = matcher::best_matches(
            text,
            &self.index,
            cleaner,
            dist,
            &self.stopwords,
            max_direct,
            fanout_cap,
            cancel,
        )?;
        Ok(filter_and_paginate(&ranked, params))
    }
}
