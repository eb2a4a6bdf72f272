//! Vacancy cascade: removing a player and pulling players up to refill tiers.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::LadderConfig;
use crate::logic::ranking::{compact, renumber};
use crate::models::{LadderError, Player, PlayerId};
use crate::store::{LadderStore, Txn};

/// One upward move made to fill a vacancy.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CascadeMove {
    pub player_id: PlayerId,
    pub from: String,
    pub to: String,
    pub rank_in_tier: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CascadeLog {
    /// The player as it was before removal.
    pub removed: Player,
    pub moves: Vec<CascadeMove>,
    /// Tier left below capacity when the cascade stopped, if any.
    pub open_slot: Option<String>,
}

/// Remove a player and refill downward from its tier.
///
/// Starting at the vacated tier: close the rank gap; if the tier is still
/// short, pull the top active player of the tier below into the first free
/// rank (with a fresh round), close that tier's gap and continue there. Stops
/// at a full tier, at the bottom of the ladder, or when the tier below has
/// nobody to give.
pub fn remove_player<S: LadderStore + ?Sized>(
    txn: &mut Txn<'_, S>,
    config: &LadderConfig,
    id: &str,
) -> Result<CascadeLog, LadderError> {
    let removed = txn.require_player(id)?;
    txn.delete(&removed.id);
    info!("Removed {} from {} (rank {})", removed.id, removed.tier, removed.rank_in_tier);

    let mut index = config
        .tiers
        .index_of(&removed.tier)
        .ok_or_else(|| LadderError::TierInvalid(removed.tier.clone()))?;
    let mut moves = Vec::new();
    let mut open_slot = None;

    loop {
        let Some(current) = config.tiers.name(index) else {
            break;
        };
        let occupants = compact(txn, current)?;
        let active = occupants.iter().filter(|p| !p.pending).count();
        if active >= config.capacity {
            break;
        }
        let Some(lower) = config.tiers.below(index) else {
            open_slot = Some(current.to_string());
            break;
        };
        let Some(mut promoted) = txn.tier_players(lower)?.into_iter().find(|p| !p.pending) else {
            warn!("{} is empty, no one to move up into {}", lower, current);
            open_slot = Some(current.to_string());
            break;
        };

        promoted.tier = current.to_string();
        promoted.reset_round();
        let (mut ordered, pending): (Vec<Player>, Vec<Player>) = occupants.into_iter().partition(|p| !p.pending);
        ordered.push(promoted.clone());
        ordered.extend(pending);
        renumber(txn, ordered);

        let rank_in_tier = active as u32 + 1;
        info!("{} moved up from {} to {} rank {}", promoted.id, lower, current, rank_in_tier);
        moves.push(CascadeMove {
            player_id: promoted.id,
            from: lower.to_string(),
            to: current.to_string(),
            rank_in_tier,
        });
        compact(txn, lower)?;
        index += 1;
    }

    if let Some(tier) = &open_slot {
        info!("A spot is open in {}", tier);
    }
    Ok(CascadeLog {
        removed,
        moves,
        open_slot,
    })
}
