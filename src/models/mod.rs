//! Data structures for the ladder: players, matches, tiers, snapshot and errors.

mod game;
mod ladder;
mod player;
mod tier;

pub use game::{MatchId, MatchRecord};
pub use ladder::{LadderError, RoundSnapshot, SnapshotEntry};
pub use player::{InitialStats, Player, PlayerId, RoundRecord, StatsUpdate};
pub use tier::{TierLadder, DEFAULT_TIERS};
