//! Matchup selection and the per-tier bracket view.

use serde::{Deserialize, Serialize};

use crate::config::LadderConfig;
use crate::models::{LadderError, Player, PlayerId, RoundRecord};
use crate::store::{LadderStore, Txn};

/// Fixed opening pairs by position: rank 1 vs rank 3, rank 2 vs rank 4.
const BRACKET: [(usize, usize); 2] = [(0, 2), (1, 3)];

/// Two players who may play each other now, with the record they share.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub record: RoundRecord,
}

/// Pair up eligible players. `eligible` must be ordered by rank and hold only
/// active players.
///
/// 1. Bracket pairs by position (0 vs 2, 1 vs 3) when both share a record.
/// 2. Everyone left is grouped by record; each group of two or more pairs its
///    two highest-ranked members.
pub fn select_matchups(eligible: &[Player]) -> Vec<Matchup> {
    let mut matchups = Vec::new();
    if eligible.len() < 2 {
        return matchups;
    }
    let mut paired = vec![false; eligible.len()];
    let mut pair = |a: usize, b: usize, paired: &mut Vec<bool>| {
        paired[a] = true;
        paired[b] = true;
        matchups.push(Matchup {
            player1: eligible[a].id.clone(),
            player2: eligible[b].id.clone(),
            record: eligible[a].round_record(),
        });
    };

    for (a, b) in BRACKET {
        if b >= eligible.len() || paired[a] || paired[b] {
            continue;
        }
        if eligible[a].round_record() == eligible[b].round_record() {
            pair(a, b, &mut paired);
        }
    }

    // Groups in order of their highest-ranked member.
    let mut groups: Vec<(RoundRecord, Vec<usize>)> = Vec::new();
    for (idx, player) in eligible.iter().enumerate() {
        if paired[idx] {
            continue;
        }
        let record = player.round_record();
        match groups.iter_mut().find(|(r, _)| *r == record) {
            Some((_, members)) => members.push(idx),
            None => groups.push((record, vec![idx])),
        }
    }
    for (_, members) in groups {
        if let [first, second, ..] = members[..] {
            pair(first, second, &mut paired);
        }
    }
    matchups
}

/// Active players of a tier in rank order.
pub fn eligible_players<S: LadderStore + ?Sized>(txn: &Txn<'_, S>, tier: &str) -> Result<Vec<Player>, LadderError> {
    Ok(txn
        .tier_players(tier)?
        .into_iter()
        .filter(Player::is_active)
        .collect())
}

/// Current matchups for a tier (`TierInvalid` for unknown names).
pub fn tier_matchups<S: LadderStore + ?Sized>(
    txn: &Txn<'_, S>,
    config: &LadderConfig,
    tier: &str,
) -> Result<Vec<Matchup>, LadderError> {
    let tier = config.tiers.resolve(tier)?;
    Ok(select_matchups(&eligible_players(txn, tier)?))
}

/// Where a player stands in the current round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RoundStatus {
    Active { record: RoundRecord },
    /// Reached the promotion threshold.
    Promotion,
    /// Reached the demotion threshold.
    Demotion,
    /// Arrived from another tier; joins at the next full update.
    Pending,
}

/// Overall state of a tier's round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketState {
    /// At least one matchup is available.
    InProgress,
    /// Active players remain but none share a record.
    Waiting,
    /// Everybody is done; the tier can be finalized.
    Complete,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketEntry {
    pub player_id: PlayerId,
    pub rank_in_tier: u32,
    #[serde(flatten)]
    pub status: RoundStatus,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierBracket {
    pub tier: String,
    pub entries: Vec<BracketEntry>,
    pub matchups: Vec<Matchup>,
    pub state: BracketState,
}

pub fn round_status(player: &Player, config: &LadderConfig) -> RoundStatus {
    if player.pending {
        RoundStatus::Pending
    } else if player.round_done && player.round_wins >= config.promotion_threshold {
        RoundStatus::Promotion
    } else if player.round_done && player.round_losses >= config.demotion_threshold {
        RoundStatus::Demotion
    } else {
        RoundStatus::Active {
            record: player.round_record(),
        }
    }
}

/// Round view of a tier: every player's status, the open matchups and the round state.
pub fn tier_bracket<S: LadderStore + ?Sized>(
    txn: &Txn<'_, S>,
    config: &LadderConfig,
    tier: &str,
) -> Result<TierBracket, LadderError> {
    let tier = config.tiers.resolve(tier)?;
    let players = txn.tier_players(tier)?;
    let active: Vec<Player> = players.iter().filter(|p| p.is_active()).cloned().collect();
    let matchups = select_matchups(&active);
    let state = if !matchups.is_empty() {
        BracketState::InProgress
    } else if active.is_empty() {
        BracketState::Complete
    } else {
        BracketState::Waiting
    };
    Ok(TierBracket {
        tier: tier.to_string(),
        entries: players
            .iter()
            .map(|p| BracketEntry {
                player_id: p.id.clone(),
                rank_in_tier: p.rank_in_tier,
                status: round_status(p, config),
            })
            .collect(),
        matchups,
        state,
    })
}
