//! Player, RoundRecord and the stat inputs used when seeding or editing players.

use crate::models::game::MatchId;
use crate::models::ladder::LadderError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = String;

/// A player's win/loss pair inside the current round.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RoundRecord {
    pub wins: u32,
    pub losses: u32,
}

impl std::fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}W/{}L", self.wins, self.losses)
    }
}

/// Optional starting stats for a new player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct InitialStats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    /// Rank to insert at; appended after the current occupants when absent.
    #[serde(default)]
    pub rank: Option<u32>,
}

/// Manual edit of a player's stats. Only the fields that are set are changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatsUpdate {
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub goals_for: Option<u32>,
    #[serde(default)]
    pub goals_against: Option<u32>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl StatsUpdate {
    pub fn is_empty(&self) -> bool {
        self.wins.is_none()
            && self.losses.is_none()
            && self.goals_for.is_none()
            && self.goals_against.is_none()
            && self.tier.is_none()
            && self.rank.is_none()
    }
}

/// A player on the ladder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Canonical tier name.
    pub tier: String,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// 1-based position inside the tier.
    pub rank_in_tier: u32,
    pub round_wins: u32,
    pub round_losses: u32,
    /// Set once the player reached the promotion or demotion threshold.
    pub round_done: bool,
    /// Moved to a new tier but not merged into its round yet.
    pub pending: bool,
    /// Match that set `round_done`, so undoing a different match leaves the flag alone.
    #[serde(default)]
    pub finished_by: Option<MatchId>,
}

impl Player {
    /// Create a new player in the given tier. Stats start at zero and the rank is unassigned.
    pub fn new(id: impl Into<PlayerId>, tier: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tier: tier.into(),
            wins: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            rank_in_tier: 0,
            round_wins: 0,
            round_losses: 0,
            round_done: false,
            pending: false,
            finished_by: None,
        }
    }

    /// Create a player carrying the given starting stats (rank is placed by the caller).
    pub fn with_stats(id: impl Into<PlayerId>, tier: impl Into<String>, stats: &InitialStats) -> Self {
        Self {
            wins: stats.wins,
            losses: stats.losses,
            goals_for: stats.goals_for,
            goals_against: stats.goals_against,
            ..Self::new(id, tier)
        }
    }

    pub fn round_record(&self) -> RoundRecord {
        RoundRecord {
            wins: self.round_wins,
            losses: self.round_losses,
        }
    }

    pub fn matches_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }

    /// `wins / (wins + losses)`, 0 when no matches were played.
    pub fn win_ratio(&self) -> f64 {
        match self.matches_played() {
            0 => 0.0,
            total => f64::from(self.wins) / total as f64,
        }
    }

    /// Win rate rounded to a whole percentage (for display).
    pub fn win_rate_percent(&self) -> u32 {
        (self.win_ratio() * 100.0).round() as u32
    }

    /// Active players take part in the current round of their tier.
    pub fn is_active(&self) -> bool {
        !self.pending && !self.round_done
    }

    /// Record a win scored `goals_for` to `goals_against`. Nothing changes
    /// if any counter would overflow.
    pub fn add_win(&mut self, goals_for: u32, goals_against: u32) -> Result<(), LadderError> {
        let wins = self.wins.checked_add(1);
        let round_wins = self.round_wins.checked_add(1);
        let (Some(wins), Some(round_wins)) = (wins, round_wins) else {
            return Err(LadderError::StatOverflow(self.id.clone()));
        };
        self.add_goals(goals_for, goals_against)?;
        self.wins = wins;
        self.round_wins = round_wins;
        Ok(())
    }

    /// Record a loss scored `goals_for` to `goals_against`. Nothing changes
    /// if any counter would overflow.
    pub fn add_loss(&mut self, goals_for: u32, goals_against: u32) -> Result<(), LadderError> {
        let losses = self.losses.checked_add(1);
        let round_losses = self.round_losses.checked_add(1);
        let (Some(losses), Some(round_losses)) = (losses, round_losses) else {
            return Err(LadderError::StatOverflow(self.id.clone()));
        };
        self.add_goals(goals_for, goals_against)?;
        self.losses = losses;
        self.round_losses = round_losses;
        Ok(())
    }

    fn add_goals(&mut self, goals_for: u32, goals_against: u32) -> Result<(), LadderError> {
        match (
            self.goals_for.checked_add(goals_for),
            self.goals_against.checked_add(goals_against),
        ) {
            (Some(total_for), Some(total_against)) => {
                self.goals_for = total_for;
                self.goals_against = total_against;
                Ok(())
            }
            _ => Err(LadderError::StatOverflow(self.id.clone())),
        }
    }

    /// Reverse a win; every counter stops at zero.
    pub fn revert_win(&mut self, goals_for: u32, goals_against: u32) {
        self.wins = self.wins.saturating_sub(1);
        self.round_wins = self.round_wins.saturating_sub(1);
        self.goals_for = self.goals_for.saturating_sub(goals_for);
        self.goals_against = self.goals_against.saturating_sub(goals_against);
    }

    /// Reverse a loss; every counter stops at zero.
    pub fn revert_loss(&mut self, goals_for: u32, goals_against: u32) {
        self.losses = self.losses.saturating_sub(1);
        self.round_losses = self.round_losses.saturating_sub(1);
        self.goals_for = self.goals_for.saturating_sub(goals_for);
        self.goals_against = self.goals_against.saturating_sub(goals_against);
    }

    /// Mark the round as finished for this player, remembering which match did it.
    pub fn finish_round(&mut self, by: MatchId) {
        self.round_done = true;
        self.finished_by = Some(by);
    }

    /// Fresh round: counters and the done flag go back to zero.
    pub fn reset_round(&mut self) {
        self.round_wins = 0;
        self.round_losses = 0;
        self.round_done = false;
        self.finished_by = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ratio_is_zero_without_matches() {
        let p = Player::new("a", "Gold 1");
        assert_eq!(p.win_ratio(), 0.0);
        assert_eq!(p.win_rate_percent(), 0);
    }

    #[test]
    fn revert_clamps_at_zero() {
        let mut p = Player::new("a", "Gold 1");
        p.add_win(2, 1).unwrap();
        p.revert_win(5, 5);
        assert_eq!((p.wins, p.round_wins, p.goals_for, p.goals_against), (0, 0, 0, 0));
        p.revert_loss(1, 1);
        assert_eq!((p.losses, p.round_losses), (0, 0));
    }

    #[test]
    fn overflowing_goals_leave_the_player_untouched() {
        let mut p = Player::new("a", "Gold 1");
        p.add_win(u32::MAX, 0).unwrap();
        let before = p.clone();
        assert_eq!(p.add_loss(1, 3), Err(LadderError::StatOverflow("a".into())));
        assert_eq!(p, before);
    }

    #[test]
    fn ratio_survives_maxed_counters() {
        let mut p = Player::new("a", "Gold 1");
        p.wins = u32::MAX;
        p.losses = u32::MAX;
        assert_eq!(p.matches_played(), 2 * u64::from(u32::MAX));
        assert_eq!(p.win_rate_percent(), 50);
    }

    #[test]
    fn win_rate_rounds() {
        let mut p = Player::new("a", "Gold 1");
        p.wins = 2;
        p.losses = 1;
        assert_eq!(p.win_rate_percent(), 67);
    }
}
