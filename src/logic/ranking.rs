//! Rank calculator: ordering players inside a tier and keeping ranks contiguous.

use std::cmp::Ordering;

use crate::models::{LadderError, Player};
use crate::store::{LadderStore, Txn};

/// Compare two players by win ratio, higher first. Ratios are compared
/// exactly (`a.wins * b.total` vs `b.wins * a.total`); no games counts as 0.
pub fn compare_win_ratio(a: &Player, b: &Player) -> Ordering {
    let ratio = |p: &Player| match p.matches_played() {
        0 => (0u128, 1u128),
        total => (u128::from(p.wins), u128::from(total)),
    };
    let (a_num, a_den) = ratio(a);
    let (b_num, b_den) = ratio(b);
    (b_num * a_den).cmp(&(a_num * b_den))
}

/// Sort by win ratio, descending. Ties keep their current order; pending
/// players stay behind the active ones.
pub fn sort_by_ratio(players: &mut [Player]) {
    players.sort_by(|a, b| a.pending.cmp(&b.pending).then_with(|| compare_win_ratio(a, b)));
}

/// Re-rank a tier by win ratio and write `rank_in_tier = position + 1`.
/// Returns the tier in its new order.
pub fn recompute<S: LadderStore + ?Sized>(txn: &mut Txn<'_, S>, tier: &str) -> Result<Vec<Player>, LadderError> {
    let mut players = txn.tier_players(tier)?;
    sort_by_ratio(&mut players);
    Ok(renumber(txn, players))
}

/// Close rank gaps in a tier without re-sorting: active players keep their
/// relative order and come first, pending players follow.
pub fn compact<S: LadderStore + ?Sized>(txn: &mut Txn<'_, S>, tier: &str) -> Result<Vec<Player>, LadderError> {
    let mut players = txn.tier_players(tier)?;
    players.sort_by_key(|p| p.pending);
    Ok(renumber(txn, players))
}

/// Assign 1..N in the given order and stage every row.
pub(crate) fn renumber<S: LadderStore + ?Sized>(txn: &mut Txn<'_, S>, mut players: Vec<Player>) -> Vec<Player> {
    for (idx, player) in players.iter_mut().enumerate() {
        player.rank_in_tier = idx as u32 + 1;
        txn.put(player.clone());
    }
    players
}
