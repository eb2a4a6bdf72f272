//! Storage contracts for players and the match ledger.
//!
//! The ladder logic never writes to a store directly: every operation runs
//! against a [`Txn`] that buffers its writes, and the buffered [`Changeset`]
//! is committed once at the end. A store only has to apply one batch of
//! player writes atomically.

mod memory;
mod txn;

pub use memory::MemoryStore;
pub use txn::{Changeset, Txn};

use crate::models::{MatchId, MatchRecord, Player, PlayerId};

/// Errors surfaced by store implementations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// Ladder state lock was poisoned by a panicking writer.
    LockPoisoned,
    /// CSV encoding failed.
    Csv(String),
    /// Backend-specific failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::LockPoisoned => write!(f, "ladder state lock was poisoned"),
            StoreError::Csv(msg) => write!(f, "CSV error: {}", msg),
            StoreError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One buffered change to a player row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlayerWrite {
    Put(Player),
    Delete(PlayerId),
}

/// Player rows keyed by id.
pub trait PlayerStore {
    /// Point lookup by primary key.
    fn player(&self, id: &str) -> StoreResult<Option<Player>>;

    /// Every player whose tier equals `tier`, ordered by `rank_in_tier` then id.
    fn players_in_tier(&self, tier: &str) -> StoreResult<Vec<Player>>;

    /// All players, in no particular order.
    fn players(&self) -> StoreResult<Vec<Player>>;

    /// Apply a batch of writes. Either all of them land or none do.
    fn apply(&mut self, writes: Vec<PlayerWrite>) -> StoreResult<()>;
}

/// Append-only record of submitted matches.
pub trait MatchLedger {
    fn append(&mut self, record: MatchRecord) -> StoreResult<()>;

    /// Most recent match between `a` and `b`, in either order.
    fn last_between(&self, a: &str, b: &str) -> StoreResult<Option<MatchRecord>>;

    /// Remove a record by id, returning it.
    fn remove(&mut self, id: MatchId) -> StoreResult<Option<MatchRecord>>;

    /// Put back a record taken out by [`MatchLedger::remove`], in its
    /// original place by `played_at`.
    fn reinsert(&mut self, record: MatchRecord) -> StoreResult<()>;

    /// Every match involving `player`, oldest first.
    fn matches_for(&self, player: &str) -> StoreResult<Vec<MatchRecord>>;
}

/// A backend that provides both halves of ladder storage.
pub trait LadderStore: PlayerStore + MatchLedger {}

impl<T: PlayerStore + MatchLedger> LadderStore for T {}
