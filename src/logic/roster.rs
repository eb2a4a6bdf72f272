//! Roster management: adding players, manual stat edits, CSV seeding and tier listings.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::LadderConfig;
use crate::logic::ranking::{compact, recompute, renumber};
use crate::models::{InitialStats, LadderError, Player, StatsUpdate};
use crate::store::{LadderStore, Txn};

/// Number of active (non-pending) players in a tier.
fn active_count(players: &[Player]) -> usize {
    players.iter().filter(|p| !p.pending).count()
}

/// `TierFull` unless the tier has room for one more active player.
fn ensure_room<S: LadderStore + ?Sized>(
    txn: &Txn<'_, S>,
    config: &LadderConfig,
    tier: &str,
) -> Result<usize, LadderError> {
    let active = active_count(&txn.tier_players(tier)?);
    if active >= config.capacity {
        return Err(LadderError::TierFull {
            tier: tier.to_string(),
            capacity: config.capacity,
        });
    }
    Ok(active)
}

/// Put `player` at `rank` among the tier's active players; pending players stay last.
fn place_at_rank<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    tier: &str,
    player: Player,
    rank: u32,
) -> Result<(), LadderError> {
    let others: Vec<Player> = txn
        .tier_players(tier)?
        .into_iter()
        .filter(|p| p.id != player.id)
        .collect();
    let (mut ordered, pending): (Vec<Player>, Vec<Player>) = others.into_iter().partition(|p| !p.pending);
    let max = ordered.len() as u32 + 1;
    if rank == 0 || rank > max {
        return Err(LadderError::RankOutOfRange { rank, max });
    }
    ordered.insert(rank as usize - 1, player);
    ordered.extend(pending);
    renumber(txn, ordered);
    Ok(())
}

/// Add a new player to a tier, optionally with starting stats and a rank.
/// Without a rank the player goes directly below the current active players.
pub fn add_player<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    id: &str,
    tier: &str,
    stats: Option<InitialStats>,
) -> Result<Player, LadderError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(LadderError::InvalidPlayerId);
    }
    let tier = config.tiers.resolve(tier)?;
    if txn.player(id)?.is_some() {
        return Err(LadderError::AlreadyExists(id.to_string()));
    }
    let active = ensure_room(txn, config, tier)?;

    let stats = stats.unwrap_or_default();
    let rank = stats.rank.unwrap_or(active as u32 + 1);
    place_at_rank(txn, tier, Player::with_stats(id, tier, &stats), rank)?;
    info!("Added {} to {} as rank {}", id, tier, rank);
    txn.require_player(id)
}

/// Manually change a player's stats, tier or rank.
///
/// Moving to another tier checks capacity, gives the player a fresh round and
/// closes the gap left behind. An explicit rank places the player there;
/// otherwise the tier is re-ranked by win ratio.
pub fn set_stats<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    id: &str,
    update: StatsUpdate,
) -> Result<Player, LadderError> {
    if update.is_empty() {
        return Err(LadderError::NothingToUpdate);
    }
    let mut player = txn.require_player(id)?;
    let old_tier = player.tier.clone();
    let new_tier = match &update.tier {
        Some(t) => config.tiers.resolve(t)?.to_string(),
        None => old_tier.clone(),
    };

    if let Some(wins) = update.wins {
        player.wins = wins;
    }
    if let Some(losses) = update.losses {
        player.losses = losses;
    }
    if let Some(goals_for) = update.goals_for {
        player.goals_for = goals_for;
    }
    if let Some(goals_against) = update.goals_against {
        player.goals_against = goals_against;
    }

    if new_tier != old_tier {
        ensure_room(txn, config, &new_tier)?;
        player.tier = new_tier.clone();
        player.pending = false;
        player.reset_round();
    }

    match update.rank {
        Some(rank) => {
            // a ranked pending player joins the active players
            if player.pending {
                ensure_room(txn, config, &new_tier)?;
                player.pending = false;
            }
            place_at_rank(txn, &new_tier, player, rank)?;
        }
        None => {
            txn.put(player);
            recompute(txn, &new_tier)?;
        }
    }
    if new_tier != old_tier {
        compact(txn, &old_tier)?;
        info!("Moved {} from {} to {}", id, old_tier, new_tier);
    }
    txn.require_player(id)
}

/// Players of a tier ordered by rank.
pub fn tier_players<S: LadderStore + ?Sized>(
    txn: &Txn<'_, S>,
    config: &LadderConfig,
    tier: &str,
) -> Result<Vec<Player>, LadderError> {
    txn.tier_players(config.tiers.resolve(tier)?)
}

/// A non-empty tier with its ranked players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierView {
    pub tier: String,
    pub capacity: usize,
    pub players: Vec<Player>,
}

/// Every tier that has players, top of the ladder first.
pub fn overview<S: LadderStore + ?Sized>(txn: &Txn<'_, S>, config: &LadderConfig) -> Result<Vec<TierView>, LadderError> {
    let mut views = Vec::new();
    for tier in config.tiers.iter() {
        let players = txn.tier_players(tier)?;
        if !players.is_empty() {
            views.push(TierView {
                tier: tier.to_string(),
                capacity: config.capacity,
                players,
            });
        }
    }
    Ok(views)
}

/// One row of a roster CSV: `id,tier,wins,losses,goals_for,goals_against,rank`.
/// Everything after `tier` may be left empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub tier: String,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub goals_for: Option<u32>,
    #[serde(default)]
    pub goals_against: Option<u32>,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl RosterEntry {
    pub fn stats(&self) -> InitialStats {
        InitialStats {
            wins: self.wins.unwrap_or(0),
            losses: self.losses.unwrap_or(0),
            goals_for: self.goals_for.unwrap_or(0),
            goals_against: self.goals_against.unwrap_or(0),
            rank: self.rank,
        }
    }
}

/// Parse a roster CSV with a header row.
pub fn parse_roster<R: std::io::Read>(reader: R) -> Result<Vec<RosterEntry>, LadderError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let entries = reader
        .deserialize()
        .collect::<Result<Vec<RosterEntry>, _>>()
        .map_err(|e| LadderError::Roster(e.to_string()))?;
    Ok(entries)
}

/// Add every roster entry in order. Any failure fails the whole roster.
pub fn seed_roster<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    entries: &[RosterEntry],
) -> Result<Vec<Player>, LadderError> {
    entries
        .iter()
        .map(|entry| add_player(txn, config, &entry.id, &entry.tier, Some(entry.stats())))
        .collect()
}
