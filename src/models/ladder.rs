//! LadderError and the round snapshot.

use crate::models::player::PlayerId;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur during ladder operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LadderError {
    /// Tier name is not part of the configured ladder.
    TierInvalid(String),
    /// Tier already holds `capacity` active (non-pending) players.
    TierFull { tier: String, capacity: usize },
    /// A player with this id already exists.
    AlreadyExists(PlayerId),
    /// Player not found.
    NotFound(PlayerId),
    /// Player ids must not be blank.
    InvalidPlayerId,
    /// Equal scores (draws are not allowed).
    InvalidScore,
    /// The two players cannot face each other this round.
    IneligibleMatchup(PlayerId, PlayerId),
    /// Player already reached the promotion or demotion threshold this round.
    PlayerAlreadyFinished(PlayerId),
    /// No stored match between these two players.
    NoMatchFound(PlayerId, PlayerId),
    /// Tier has no players to finalize.
    TierEmpty(String),
    /// Requested rank is outside `1..=max`.
    RankOutOfRange { rank: u32, max: u32 },
    /// A stats update with no fields set.
    NothingToUpdate,
    /// A win, loss or goal total would exceed `u32::MAX`.
    StatOverflow(PlayerId),
    /// Roster file could not be parsed.
    Roster(String),
    /// Backing store failure.
    Storage(StoreError),
}

impl std::fmt::Display for LadderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LadderError::TierInvalid(tier) => write!(f, "Invalid tier: {:?}", tier),
            LadderError::TierFull { tier, capacity } => {
                write!(f, "{} is full (max {} players)", tier, capacity)
            }
            LadderError::AlreadyExists(id) => write!(f, "Player {} already exists", id),
            LadderError::NotFound(id) => write!(f, "Player {} not found", id),
            LadderError::InvalidPlayerId => write!(f, "Player id must not be empty"),
            LadderError::InvalidScore => write!(f, "Draws are not allowed"),
            LadderError::IneligibleMatchup(a, b) => {
                write!(f, "{} and {} can't face each other this round", a, b)
            }
            LadderError::PlayerAlreadyFinished(id) => {
                write!(f, "{} is already done with this round", id)
            }
            LadderError::NoMatchFound(a, b) => write!(f, "No match found between {} and {}", a, b),
            LadderError::TierEmpty(tier) => write!(f, "No players found in {}", tier),
            LadderError::RankOutOfRange { rank, max } => {
                write!(f, "Rank {} must be between 1 and {}", rank, max)
            }
            LadderError::NothingToUpdate => write!(f, "Nothing to update"),
            LadderError::StatOverflow(id) => write!(f, "Score would overflow the totals of {}", id),
            LadderError::Roster(msg) => write!(f, "Invalid roster: {}", msg),
            LadderError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for LadderError {}

impl From<StoreError> for LadderError {
    fn from(e: StoreError) -> Self {
        LadderError::Storage(e)
    }
}

/// One row of the ladder as it stood after the last full update.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Global 1-based position, top tier first.
    pub position: u32,
    pub player_id: PlayerId,
    pub tier: String,
    pub rank_in_tier: u32,
}

/// Ranking captured by `finalize_ladder`. Empty until the first full update.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub taken_at: Option<DateTime<Utc>>,
    pub entries: Vec<SnapshotEntry>,
}

impl RoundSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as CSV with a header row.
    pub fn to_csv(&self) -> Result<String, LadderError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &self.entries {
            writer
                .serialize(entry)
                .map_err(|e| StoreError::Csv(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| StoreError::Csv(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_csv_has_header_and_rows() {
        let snapshot = RoundSnapshot {
            taken_at: Some(Utc::now()),
            entries: vec![SnapshotEntry {
                position: 1,
                player_id: "alice".into(),
                tier: "Gold 1".into(),
                rank_in_tier: 1,
            }],
        };
        let csv = snapshot.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("position,player_id,tier,rank_in_tier"));
        assert_eq!(lines.next(), Some("1,alice,Gold 1,1"));
    }
}
