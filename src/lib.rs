//! # namematch
//!
//! A fuzzy entity-name matching engine: given a corpus of `(entity_id, name)` rows, it
//! builds an LMDB-backed index and answers "find entities whose name approximately
//! equals `Q`" queries with ranked, paginated results.
//!
//! Candidate generation combines the Symmetric Delete algorithm (precomputed
//! deletion-neighborhood hashes) with double-metaphone phonetic hashes, so a query
//! matches both typos and misspellings that sound alike. Scoring and ranking are
//! described in [`matcher`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use namematch::{NameMatchEngine, RawRecord, QueryParams};
//! use namematch::clean::{FixedDistance, UpperStripPunctuation};
//!
//! let mut engine = NameMatchEngine::open("/tmp/namematch.mdb").unwrap();
//!
//! let rows = vec![
//!     RawRecord { entity_id: "E1".into(), name_id_guid: String::new(), name: "ACME INC".into() },
//! ];
//! engine.build(&rows, &UpperStripPunctuation, &FixedDistance(1), "", false).unwrap();
//!
//! let results = engine
//!     .query("ACME INC", &UpperStripPunctuation, &FixedDistance(1), QueryParams::default())
//!     .unwrap();
//! assert_eq!(results[0].score, 100);
//! ```

pub mod builder;
pub mod clean;
pub mod codec;
pub mod db;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod metaphone;
pub mod model;
pub mod levenshtein;
pub mod neighborhood;
pub mod query;
pub mod stopwords;
pub mod text;

pub use engine::NameMatchEngine;
pub use error::{NameMatchError, Result};
pub use model::{BuildReport, EntityIdPayload, MatchResult, NameIdRecord, RawRecord};
pub use query::QueryParams;
