//! Round engine: applying and undoing match results.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::LadderConfig;
use crate::logic::ranking::recompute;
use crate::models::{LadderError, MatchId, MatchRecord, Player, PlayerId};
use crate::store::{LadderStore, Txn};

/// Result of an accepted score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub record: MatchRecord,
    pub winner: Player,
    pub loser: Player,
    /// Winner reached the promotion threshold with this match.
    pub promotion_ready: bool,
    /// Loser reached the demotion threshold with this match.
    pub demotion_ready: bool,
}

/// What an undo reverted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReversalLog {
    pub record: MatchRecord,
    /// Participants after the reversal (players removed since are skipped).
    pub players: Vec<Player>,
    /// Players whose finished round was reopened.
    pub reopened: Vec<PlayerId>,
}

/// Check that two players may play each other right now.
fn check_eligible(p1: &Player, p2: &Player) -> Result<(), LadderError> {
    // Finished first: a finished player's record always differs from an
    // unfinished opponent's, so the record check would hide this error.
    for p in [p1, p2] {
        if p.round_done {
            return Err(LadderError::PlayerAlreadyFinished(p.id.clone()));
        }
    }
    let ineligible = p1.id == p2.id
        || p1.tier != p2.tier
        || p1.pending
        || p2.pending
        || p1.round_record() != p2.round_record();
    if ineligible {
        return Err(LadderError::IneligibleMatchup(p1.id.clone(), p2.id.clone()));
    }
    Ok(())
}

/// Record a score between two players of the same tier with identical round records.
///
/// Rejected scores leave everything untouched. On success the winner and loser
/// stats move, a player reaching a threshold is marked done for the round, the
/// match lands in the ledger and the tier is re-ranked.
pub fn submit_score<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    id1: &str,
    score1: u32,
    id2: &str,
    score2: u32,
) -> Result<MatchOutcome, LadderError> {
    let p1 = txn.require_player(id1)?;
    let p2 = txn.require_player(id2)?;
    if score1 == score2 {
        return Err(LadderError::InvalidScore);
    }
    check_eligible(&p1, &p2)?;

    let record = MatchRecord::new(p1.id.clone(), score1, p2.id.clone(), score2);
    let (mut winner, mut loser) = if score1 > score2 { (p1, p2) } else { (p2, p1) };
    let (high, low) = (score1.max(score2), score1.min(score2));

    winner.add_win(high, low)?;
    loser.add_loss(low, high)?;
    let promotion_ready = winner.round_wins >= config.promotion_threshold;
    if promotion_ready {
        winner.finish_round(record.id);
    }
    let demotion_ready = loser.round_losses >= config.demotion_threshold;
    if demotion_ready {
        loser.finish_round(record.id);
    }
    debug!(
        "{} beat {} {}-{} in {} ({} / {})",
        winner.id,
        loser.id,
        high,
        low,
        winner.tier,
        winner.round_record(),
        loser.round_record()
    );
    if promotion_ready {
        info!("{} reached {} round wins: promotion pending in {}", winner.id, winner.round_wins, winner.tier);
    }
    if demotion_ready {
        info!("{} reached {} round losses: demotion pending in {}", loser.id, loser.round_losses, loser.tier);
    }

    let tier = winner.tier.clone();
    let (winner_id, loser_id) = (winner.id.clone(), loser.id.clone());
    txn.put(winner);
    txn.put(loser);
    txn.append_match(record.clone());
    recompute(txn, &tier)?;

    Ok(MatchOutcome {
        record,
        winner: txn.require_player(&winner_id)?,
        loser: txn.require_player(&loser_id)?,
        promotion_ready,
        demotion_ready,
    })
}

/// Revert one side of a match on a player, reopening the round only if this
/// exact match closed it. Returns whether the round was reopened.
fn revert(player: &mut Player, won: bool, goals_for: u32, goals_against: u32, id: MatchId) -> bool {
    if won {
        player.revert_win(goals_for, goals_against);
    } else {
        player.revert_loss(goals_for, goals_against);
    }
    if player.finished_by == Some(id) {
        player.round_done = false;
        player.finished_by = None;
        true
    } else {
        false
    }
}

/// Remove the most recent match between two players and reverse its stat changes.
pub fn undo_last_match<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    id1: &str,
    id2: &str,
) -> Result<ReversalLog, LadderError> {
    let record = txn
        .last_match_between(id1, id2)?
        .ok_or_else(|| LadderError::NoMatchFound(id1.to_string(), id2.to_string()))?;
    let (winner_id, high, loser_id, low) = record.result();

    let mut reopened = Vec::new();
    let mut tiers: Vec<String> = Vec::new();
    let mut ids = Vec::new();
    for (id, won, goals_for, goals_against) in [(winner_id, true, high, low), (loser_id, false, low, high)] {
        let Some(mut player) = txn.player(id)? else {
            debug!("undo: {} no longer on the ladder, skipping", id);
            continue;
        };
        if revert(&mut player, won, goals_for, goals_against, record.id) {
            reopened.push(player.id.clone());
        }
        if !tiers.contains(&player.tier) {
            tiers.push(player.tier.clone());
        }
        ids.push(player.id.clone());
        txn.put(player);
    }
    txn.remove_match(record.id);
    for tier in &tiers {
        recompute(txn, tier)?;
    }
    info!("Undid match {} ({} vs {})", record.id, record.player1, record.player2);

    let players = ids
        .iter()
        .map(|id| txn.require_player(id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReversalLog {
        record,
        players,
        reopened,
    })
}
