//! In-memory store used by the web binary and the tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{MatchId, MatchRecord, Player, PlayerId};
use crate::store::{MatchLedger, PlayerStore, PlayerWrite, StoreResult};

/// Players keyed by id plus the ledger in submission order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    players: BTreeMap<PlayerId, Player>,
    matches: Vec<MatchRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

impl PlayerStore for MemoryStore {
    fn player(&self, id: &str) -> StoreResult<Option<Player>> {
        Ok(self.players.get(id).cloned())
    }

    fn players_in_tier(&self, tier: &str) -> StoreResult<Vec<Player>> {
        let mut players: Vec<Player> = self
            .players
            .values()
            .filter(|p| p.tier == tier)
            .cloned()
            .collect();
        players.sort_by(|a, b| a.rank_in_tier.cmp(&b.rank_in_tier).then_with(|| a.id.cmp(&b.id)));
        Ok(players)
    }

    fn players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.players.values().cloned().collect())
    }

    fn apply(&mut self, writes: Vec<PlayerWrite>) -> StoreResult<()> {
        for write in writes {
            match write {
                PlayerWrite::Put(player) => {
                    self.players.insert(player.id.clone(), player);
                }
                PlayerWrite::Delete(id) => {
                    self.players.remove(&id);
                }
            }
        }
        Ok(())
    }
}

impl MatchLedger for MemoryStore {
    fn append(&mut self, record: MatchRecord) -> StoreResult<()> {
        self.matches.push(record);
        Ok(())
    }

    fn last_between(&self, a: &str, b: &str) -> StoreResult<Option<MatchRecord>> {
        Ok(self.matches.iter().rev().find(|m| m.is_between(a, b)).cloned())
    }

    fn remove(&mut self, id: MatchId) -> StoreResult<Option<MatchRecord>> {
        Ok(self
            .matches
            .iter()
            .position(|m| m.id == id)
            .map(|idx| self.matches.remove(idx)))
    }

    fn reinsert(&mut self, record: MatchRecord) -> StoreResult<()> {
        let idx = self.matches.partition_point(|m| m.played_at <= record.played_at);
        self.matches.insert(idx, record);
        Ok(())
    }

    fn matches_for(&self, player: &str) -> StoreResult<Vec<MatchRecord>> {
        Ok(self.matches.iter().filter(|m| m.involves(player)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn tier_scan_orders_by_rank() {
        let mut store = MemoryStore::new();
        let mut a = Player::new("a", "Gold 1");
        a.rank_in_tier = 2;
        let mut b = Player::new("b", "Gold 1");
        b.rank_in_tier = 1;
        let c = Player::new("c", "Gold 2");
        store
            .apply(vec![PlayerWrite::Put(a), PlayerWrite::Put(b), PlayerWrite::Put(c)])
            .unwrap();
        let ids: Vec<_> = store
            .players_in_tier("Gold 1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn last_between_ignores_order_and_picks_latest() {
        let mut store = MemoryStore::new();
        let first = MatchRecord::new("a", 1, "b", 0);
        let second = MatchRecord::new("b", 2, "a", 1);
        store.append(first).unwrap();
        store.append(second.clone()).unwrap();
        assert_eq!(store.last_between("a", "b").unwrap(), Some(second.clone()));
        assert_eq!(store.remove(second.id).unwrap(), Some(second));
        assert_eq!(store.match_count(), 1);
        assert_eq!(store.matches_for("a").unwrap().len(), 1);
    }

    #[test]
    fn reinsert_restores_the_original_place() {
        let mut store = MemoryStore::new();
        let start = Utc::now();
        let records: Vec<MatchRecord> = (0..3)
            .map(|n| MatchRecord {
                played_at: start + Duration::seconds(n),
                ..MatchRecord::new("a", 1, "b", 0)
            })
            .collect();
        for record in &records {
            store.append(record.clone()).unwrap();
        }

        let removed = store.remove(records[0].id).unwrap().unwrap();
        store.reinsert(removed).unwrap();
        assert_eq!(store.matches_for("a").unwrap(), records);
    }
}
