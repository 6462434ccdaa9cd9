//! LMDB-backed storage: three keyed stores behind one open environment.
//!
//! The environment and its databases live behind an owned handle rather than a process
//! global: `build`/`best_matches` is a library call, not a long-lived server process,
//! and a global singleton would make it impossible to hold two indexes open in the same
//! process (as tests routinely need to). Short-lived `RoTxn`s serve reads, one `RwTxn`
//! covers a whole build, and all three stores live as named sub-databases under a single
//! environment path.

use std::path::Path;

use heed::types::{Str, U32, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};

use crate::codec::Postcard;
use crate::error::{internal, Result};
use crate::model::{EntityIdPayload, IndexPayload, NameIdRecord};

/// `name_hash -> Vec<IndexPayload>`: every word occurrence (direct, deleted, or
/// phonetic) that hashes to this key.
pub type NameIndexDb = Database<U64<byteorder::BigEndian>, Postcard<Vec<IndexPayload>>>;

/// `name_id -> NameIdRecord`: dense row id to the entity and word count it belongs to.
pub type NameIdIndexDb = Database<U32<byteorder::BigEndian>, Postcard<NameIdRecord>>;

/// `entity_id -> Vec<EntityIdPayload>`: the caller-supplied id to its (possibly several,
/// one per alias name_id) stored rows.
pub type EntityIdIndexDb = Database<Str, Postcard<Vec<EntityIdPayload>>>;

pub struct Dbs {
    pub name_index: NameIndexDb,
    pub name_id_index: NameIdIndexDb,
    pub entity_id_index: EntityIdIndexDb,
}

/// An open index: one LMDB environment holding the three named sub-databases.
///
/// Cheap to share: `Env` is internally reference-counted by `heed`, and LMDB hands every
/// reader its own MVCC snapshot, so concurrent `read` calls never block each other or a
/// concurrent `write`.
pub struct Index {
    env: Env,
    dbs: Dbs,
}

impl Index {
    /// Open (creating if necessary) the stores rooted at `path`.
    pub fn open(path: &str, map_size: usize) -> Result<Self> {
        if path.is_empty() {
            return Err(crate::error::NameMatchError::InvalidArgument(
                "index path must not be empty".into(),
            ));
        }
        std::fs::create_dir_all(path)?;
        // SAFETY: the caller is responsible for not opening this path concurrently from
        // another process; concurrent access from multiple threads of this process is
        // fine via LMDB's own locking.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(3)
                .open(Path::new(path))
                .map_err(internal)?
        };
        let mut tx = env.write_txn().map_err(internal)?;
        let dbs = Dbs {
            name_index: env
                .create_database(&mut tx, Some("name_index"))
                .map_err(internal)?,
            name_id_index: env
                .create_database(&mut tx, Some("name_id_index"))
                .map_err(internal)?,
            entity_id_index: env
                .create_database(&mut tx, Some("entity_id_index"))
                .map_err(internal)?,
        };
        tx.commit().map_err(internal)?;
        Ok(Index { env, dbs })
    }

    /// Run a read-only operation against a fresh snapshot. Because LMDB hands every
    /// reader its own MVCC view, this never blocks a concurrent build and never observes
    /// a partially-written index.
    #[inline]
    pub fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        f(&self.dbs, &self.env.read_txn().map_err(internal)?)
    }

    /// Run a batch of writes as a single atomic transaction: either every row lands or,
    /// on an early return, none does.
    #[inline]
    pub fn write<T, F: FnOnce(&Dbs, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut tx = self.env.write_txn().map_err(internal)?;
        let r = f(&self.dbs, &mut tx)?;
        tx.commit().map_err(internal)?;
        Ok(r)
    }

    /// Drop all rows from all three stores, keeping the environment open. Used by the
    /// builder's overwrite path and by tests that rebuild an index in place.
    pub fn clear_all(&self) -> Result<()> {
        self.write(|dbs, tx| {
            dbs.name_index.clear(tx).map_err(internal)?;
            dbs.name_id_index.clear(tx).map_err(internal)?;
            dbs.entity_id_index.clear(tx).map_err(internal)
        })
    }

    /// Whether any of the three stores already holds data, used to enforce the
    /// exclusive-write-unless-overwrite build guard.
    pub fn is_populated(&self) -> Result<bool> {
        self.read(|dbs, tx| {
            Ok(dbs.name_index.len(tx).map_err(internal)? > 0
                || dbs.name_id_index.len(tx).map_err(internal)? > 0
                || dbs.entity_id_index.len(tx).map_err(internal)? > 0)
        })
    }
}
