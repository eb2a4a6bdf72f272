//! Tier transitions: finalizing a tier's round and the full-ladder update.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{BottomDemotion, LadderConfig};
use crate::logic::ranking::{recompute, renumber};
use crate::models::{LadderError, Player, PlayerId, RoundRecord, RoundSnapshot, SnapshotEntry};
use crate::store::{LadderStore, Txn};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transition {
    Promoted { to: String },
    Demoted { to: String },
    /// Demoted past the lowest tier and removed from the ladder.
    Eliminated,
    /// Promotion threshold reached in the highest tier.
    HeldAtTop,
    /// Demotion threshold reached in the lowest tier under `BottomDemotion::Stay`.
    HeldAtBottom,
    /// No threshold reached; round reset.
    Unchanged,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub player_id: PlayerId,
    /// Round record the decision was based on.
    pub record: RoundRecord,
    #[serde(flatten)]
    pub transition: Transition,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    pub tier: String,
    pub entries: Vec<TransitionEntry>,
    /// Source tier first, then every destination tier.
    pub touched_tiers: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FullTransitionLog {
    pub tiers: Vec<TransitionLog>,
    pub snapshot: RoundSnapshot,
}

/// How a player leaves the round, from its record and position on the ladder.
fn decide(player: &Player, index: usize, config: &LadderConfig) -> Transition {
    let tiers = &config.tiers;
    if player.round_done && player.round_wins >= config.promotion_threshold {
        match tiers.above(index) {
            Some(to) => Transition::Promoted { to: to.to_string() },
            None => Transition::HeldAtTop,
        }
    } else if player.round_done && player.round_losses >= config.demotion_threshold {
        match (tiers.below(index), config.bottom_demotion) {
            (Some(to), _) => Transition::Demoted { to: to.to_string() },
            (None, BottomDemotion::Eliminate) => Transition::Eliminated,
            (None, BottomDemotion::Stay) => Transition::HeldAtBottom,
        }
    } else {
        Transition::Unchanged
    }
}

/// Close a tier's round.
///
/// Finished players move one tier up or down and are marked pending in the
/// destination; everyone's round state is reset. The source tier keeps its
/// remaining players in order, each destination appends the arrivals below
/// its residents, and both are renumbered 1..N.
pub fn finalize_tier<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    tier: &str,
) -> Result<TransitionLog, LadderError> {
    let tier = config.tiers.resolve(tier)?.to_string();
    let index = config
        .tiers
        .index_of(&tier)
        .ok_or_else(|| LadderError::TierInvalid(tier.clone()))?;
    let players = txn.tier_players(&tier)?;
    if players.is_empty() {
        return Err(LadderError::TierEmpty(tier));
    }

    let mut entries = Vec::new();
    let mut stayers = Vec::new();
    // Destination tier and its arrivals, in processing order.
    let mut arrivals: Vec<(String, Vec<Player>)> = Vec::new();

    for mut player in players {
        if player.pending {
            stayers.push(player);
            continue;
        }
        let record = player.round_record();
        let transition = decide(&player, index, config);
        player.reset_round();
        match &transition {
            Transition::Promoted { to } | Transition::Demoted { to } => {
                info!("{} {} from {} to {}", player.id, verb(&transition), tier, to);
                player.tier = to.clone();
                player.pending = true;
                match arrivals.iter_mut().find(|(dest, _)| dest == to) {
                    Some((_, group)) => group.push(player.clone()),
                    None => arrivals.push((to.clone(), vec![player.clone()])),
                }
            }
            Transition::Eliminated => {
                info!("{} eliminated from {} (bottom of the ladder)", player.id, tier);
                txn.delete(&player.id);
            }
            Transition::HeldAtTop | Transition::HeldAtBottom | Transition::Unchanged => {
                stayers.push(player.clone());
            }
        }
        entries.push(TransitionEntry {
            player_id: player.id,
            record,
            transition,
        });
    }

    stayers.sort_by_key(|p| p.pending);
    renumber(txn, stayers);

    let mut touched_tiers = vec![tier.clone()];
    for (dest, group) in arrivals {
        let mut ordered = txn.tier_players(&dest)?;
        ordered.sort_by_key(|p| p.pending);
        ordered.extend(group);
        renumber(txn, ordered);
        touched_tiers.push(dest);
    }

    Ok(TransitionLog {
        tier,
        entries,
        touched_tiers,
    })
}

fn verb(transition: &Transition) -> &'static str {
    match transition {
        Transition::Promoted { .. } => "promoted",
        Transition::Demoted { .. } => "demoted",
        _ => "moved",
    }
}

/// Finalize every non-empty tier (top to bottom), merge pending players into
/// their new tiers, re-rank everything and capture the snapshot.
pub fn finalize_ladder<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
) -> Result<FullTransitionLog, LadderError> {
    let mut logs = Vec::new();
    for tier in config.tiers.iter() {
        if txn.tier_players(tier)?.is_empty() {
            continue;
        }
        logs.push(finalize_tier(txn, config, tier)?);
    }

    for mut player in txn.all_players()? {
        if player.pending || player.round_done || player.round_wins > 0 || player.round_losses > 0 {
            player.pending = false;
            player.reset_round();
            txn.put(player);
        }
    }

    let mut entries = Vec::new();
    for tier in config.tiers.iter() {
        let ranked = recompute(txn, tier)?;
        if ranked.len() > config.capacity {
            warn!("{} holds {} players after the update (capacity {})", tier, ranked.len(), config.capacity);
        }
        for player in ranked {
            entries.push(SnapshotEntry {
                position: entries.len() as u32 + 1,
                player_id: player.id,
                tier: player.tier,
                rank_in_tier: player.rank_in_tier,
            });
        }
    }
    let snapshot = RoundSnapshot {
        taken_at: Some(chrono::Utc::now()),
        entries,
    };
    info!("Full ladder update: {} tiers finalized, {} players ranked", logs.len(), snapshot.entries.len());
    txn.set_snapshot(snapshot.clone());

    Ok(FullTransitionLog { tiers: logs, snapshot })
}
