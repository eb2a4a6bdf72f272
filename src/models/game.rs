//! Submitted match results.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single submitted 1v1 result. Draws never reach the ledger.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub score1: u32,
    pub score2: u32,
    pub played_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(player1: impl Into<PlayerId>, score1: u32, player2: impl Into<PlayerId>, score2: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1: player1.into(),
            player2: player2.into(),
            score1,
            score2,
            played_at: Utc::now(),
        }
    }

    /// Winner id and score, then loser id and score.
    pub fn result(&self) -> (&str, u32, &str, u32) {
        if self.score1 > self.score2 {
            (&self.player1, self.score1, &self.player2, self.score2)
        } else {
            (&self.player2, self.score2, &self.player1, self.score1)
        }
    }

    pub fn involves(&self, player: &str) -> bool {
        self.player1 == player || self.player2 == player
    }

    /// True when the match was between `a` and `b`, in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.player1 == a && self.player2 == b) || (self.player1 == b && self.player2 == a)
    }
}
