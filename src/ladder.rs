//! The `Ladder` facade: one lock, one transaction per operation.

use std::sync::RwLock;

use crate::config::LadderConfig;
use crate::logic::{
    self, CascadeLog, FullTransitionLog, MatchOutcome, Matchup, ReversalLog, RosterEntry, TierBracket, TierView,
    TransitionLog,
};
use crate::models::{InitialStats, LadderError, MatchRecord, Player, RoundSnapshot, StatsUpdate};
use crate::store::{LadderStore, MemoryStore, StoreError, Txn};

/// Everything behind the lock: the injected store and the last snapshot.
struct LadderState<S> {
    store: S,
    snapshot: RoundSnapshot,
}

/// A ranking ladder over an injected store.
///
/// Player ids are trimmed on the way in, so `" a "` and `"a"` name the same player.
///
/// Every mutating operation holds the write lock from its first read to its
/// commit, so operations on the ladder never interleave. Writes are buffered
/// in a [`Txn`] and only committed when the whole operation succeeded.
pub struct Ladder<S = MemoryStore> {
    config: LadderConfig,
    state: RwLock<LadderState<S>>,
}

impl Ladder<MemoryStore> {
    /// Empty in-memory ladder.
    pub fn in_memory(config: LadderConfig) -> Self {
        Self::new(config, MemoryStore::new())
    }
}

impl<S: LadderStore> Ladder<S> {
    pub fn new(config: LadderConfig, store: S) -> Self {
        Self {
            config,
            state: RwLock::new(LadderState {
                store,
                snapshot: RoundSnapshot::default(),
            }),
        }
    }

    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    fn read<T>(&self, op: impl FnOnce(&Txn<'_, S>, &LadderConfig) -> Result<T, LadderError>) -> Result<T, LadderError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        let txn = Txn::new(&state.store);
        op(&txn, &self.config)
    }

    fn write<T>(&self, op: impl FnOnce(&mut Txn<'_, S>, &LadderConfig) -> Result<T, LadderError>) -> Result<T, LadderError> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let (value, changes) = {
            let mut txn = Txn::new(&state.store);
            let value = op(&mut txn, &self.config)?;
            (value, txn.into_changes())
        };
        if let Some(snapshot) = changes.commit(&mut state.store)? {
            state.snapshot = snapshot;
        }
        Ok(value)
    }

    pub fn add_player(&self, id: &str, tier: &str, stats: Option<InitialStats>) -> Result<Player, LadderError> {
        self.write(|txn, config| logic::add_player(txn, config, id, tier, stats))
    }

    /// Remove a player and refill the ladder from below.
    pub fn remove_player(&self, id: &str) -> Result<CascadeLog, LadderError> {
        self.write(|txn, config| logic::remove_player(txn, config, id.trim()))
    }

    pub fn submit_score(&self, id1: &str, score1: u32, id2: &str, score2: u32) -> Result<MatchOutcome, LadderError> {
        self.write(|txn, config| logic::submit_score(txn, config, id1.trim(), score1, id2.trim(), score2))
    }

    pub fn undo_last_match(&self, id1: &str, id2: &str) -> Result<ReversalLog, LadderError> {
        self.write(|txn, _| logic::undo_last_match(txn, id1.trim(), id2.trim()))
    }

    pub fn finalize_tier(&self, tier: &str) -> Result<TransitionLog, LadderError> {
        self.write(|txn, config| logic::finalize_tier(txn, config, tier))
    }

    pub fn finalize_ladder(&self) -> Result<FullTransitionLog, LadderError> {
        self.write(|txn, config| logic::finalize_ladder(txn, config))
    }

    pub fn set_stats(&self, id: &str, update: StatsUpdate) -> Result<Player, LadderError> {
        self.write(|txn, config| logic::set_stats(txn, config, id.trim(), update))
    }

    /// Add a whole roster; nothing is added if any entry fails.
    pub fn seed_roster(&self, entries: &[RosterEntry]) -> Result<Vec<Player>, LadderError> {
        self.write(|txn, config| logic::seed_roster(txn, config, entries))
    }

    pub fn get_tier(&self, tier: &str) -> Result<Vec<Player>, LadderError> {
        self.read(|txn, config| logic::roster::tier_players(txn, config, tier))
    }

    pub fn get_player(&self, id: &str) -> Result<Player, LadderError> {
        self.read(|txn, _| txn.require_player(id.trim()))
    }

    pub fn get_matchups(&self, tier: &str) -> Result<Vec<Matchup>, LadderError> {
        self.read(|txn, config| logic::tier_matchups(txn, config, tier))
    }

    pub fn bracket(&self, tier: &str) -> Result<TierBracket, LadderError> {
        self.read(|txn, config| logic::tier_bracket(txn, config, tier))
    }

    pub fn overview(&self) -> Result<Vec<TierView>, LadderError> {
        self.read(|txn, config| logic::overview(txn, config))
    }

    /// Ledger entries involving a player, oldest first.
    pub fn match_history(&self, id: &str) -> Result<Vec<MatchRecord>, LadderError> {
        self.read(|txn, _| txn.matches_for(id.trim()))
    }

    /// The ladder as it stood after the last `finalize_ladder`.
    pub fn get_snapshot(&self) -> Result<RoundSnapshot, LadderError> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.snapshot.clone())
    }
}
