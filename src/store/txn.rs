//! Write buffer for one logical ladder operation.

use std::collections::BTreeMap;

use log::warn;

use crate::models::{LadderError, MatchId, MatchRecord, Player, PlayerId, RoundSnapshot};
use crate::store::{LadderStore, PlayerWrite, StoreResult};

/// Read-through overlay over a store. Reads see the buffered writes; nothing
/// reaches the store until the resulting [`Changeset`] is committed.
pub struct Txn<'a, S: ?Sized> {
    store: &'a S,
    players: BTreeMap<PlayerId, Option<Player>>,
    appended: Vec<MatchRecord>,
    removed: Vec<MatchId>,
    snapshot: Option<RoundSnapshot>,
}

impl<'a, S: LadderStore + ?Sized> Txn<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            players: BTreeMap::new(),
            appended: Vec::new(),
            removed: Vec::new(),
            snapshot: None,
        }
    }

    pub fn player(&self, id: &str) -> Result<Option<Player>, LadderError> {
        match self.players.get(id) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.store.player(id)?),
        }
    }

    /// Like [`Txn::player`] but a missing player is `NotFound`.
    pub fn require_player(&self, id: &str) -> Result<Player, LadderError> {
        self.player(id)?
            .ok_or_else(|| LadderError::NotFound(id.to_string()))
    }

    /// Players of a tier ordered by `rank_in_tier`, then id.
    pub fn tier_players(&self, tier: &str) -> Result<Vec<Player>, LadderError> {
        let mut players: Vec<Player> = self
            .store
            .players_in_tier(tier)?
            .into_iter()
            .filter(|p| !self.players.contains_key(&p.id))
            .collect();
        players.extend(
            self.players
                .values()
                .flatten()
                .filter(|p| p.tier == tier)
                .cloned(),
        );
        players.sort_by(|a, b| a.rank_in_tier.cmp(&b.rank_in_tier).then_with(|| a.id.cmp(&b.id)));
        Ok(players)
    }

    pub fn all_players(&self) -> Result<Vec<Player>, LadderError> {
        let mut players: Vec<Player> = self
            .store
            .players()?
            .into_iter()
            .filter(|p| !self.players.contains_key(&p.id))
            .collect();
        players.extend(self.players.values().flatten().cloned());
        Ok(players)
    }

    pub fn put(&mut self, player: Player) {
        self.players.insert(player.id.clone(), Some(player));
    }

    pub fn delete(&mut self, id: &str) {
        self.players.insert(id.to_string(), None);
    }

    pub fn append_match(&mut self, record: MatchRecord) {
        self.appended.push(record);
    }

    pub fn remove_match(&mut self, id: MatchId) {
        if let Some(idx) = self.appended.iter().position(|m| m.id == id) {
            self.appended.remove(idx);
        } else {
            self.removed.push(id);
        }
    }

    /// Most recent match between `a` and `b` as seen by this transaction.
    pub fn last_match_between(&self, a: &str, b: &str) -> Result<Option<MatchRecord>, LadderError> {
        if let Some(staged) = self.appended.iter().rev().find(|m| m.is_between(a, b)) {
            return Ok(Some(staged.clone()));
        }
        if self.removed.is_empty() {
            return Ok(self.store.last_between(a, b)?);
        }
        Ok(self
            .store
            .matches_for(a)?
            .into_iter()
            .rev()
            .find(|m| m.is_between(a, b) && !self.removed.contains(&m.id)))
    }

    pub fn matches_for(&self, player: &str) -> Result<Vec<MatchRecord>, LadderError> {
        let mut matches: Vec<MatchRecord> = self
            .store
            .matches_for(player)?
            .into_iter()
            .filter(|m| !self.removed.contains(&m.id))
            .collect();
        matches.extend(self.appended.iter().filter(|m| m.involves(player)).cloned());
        Ok(matches)
    }

    pub fn set_snapshot(&mut self, snapshot: RoundSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Finish the transaction, releasing the borrow of the store.
    pub fn into_changes(self) -> Changeset {
        Changeset {
            players: self
                .players
                .into_iter()
                .map(|(id, player)| match player {
                    Some(p) => PlayerWrite::Put(p),
                    None => PlayerWrite::Delete(id),
                })
                .collect(),
            appended: self.appended,
            removed: self.removed,
            snapshot: self.snapshot,
        }
    }
}

/// Everything one operation wants to write.
#[derive(Debug, Default)]
pub struct Changeset {
    pub players: Vec<PlayerWrite>,
    pub appended: Vec<MatchRecord>,
    pub removed: Vec<MatchId>,
    pub snapshot: Option<RoundSnapshot>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
            && self.appended.is_empty()
            && self.removed.is_empty()
            && self.snapshot.is_none()
    }

    /// Write the ledger changes, then the player batch. If the player batch
    /// fails the ledger changes are rolled back, restoring removed records to
    /// their original place. Returns the new snapshot, if any.
    pub fn commit<S: LadderStore + ?Sized>(self, store: &mut S) -> StoreResult<Option<RoundSnapshot>> {
        let mut removed_records = Vec::new();
        for id in &self.removed {
            if let Some(record) = store.remove(*id)? {
                removed_records.push(record);
            }
        }
        let mut appended_ids = Vec::new();
        for record in self.appended {
            appended_ids.push(record.id);
            store.append(record)?;
        }
        if let Err(e) = store.apply(self.players) {
            warn!("player batch failed, rolling back ledger changes: {}", e);
            for id in appended_ids {
                if let Err(undo) = store.remove(id) {
                    warn!("could not drop match {} during rollback: {}", id, undo);
                }
            }
            for record in removed_records {
                let id = record.id;
                if let Err(undo) = store.reinsert(record) {
                    warn!("could not restore match {} during rollback: {}", id, undo);
                }
            }
            return Err(e);
        }
        Ok(self.snapshot)
    }
}
