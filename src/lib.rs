//! Tiered ranking ladder: library with models, storage contracts and the ladder state machine.

pub mod config;
pub mod ladder;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{BottomDemotion, LadderConfig};
pub use ladder::Ladder;
pub use logic::{
    BracketState, CascadeLog, CascadeMove, FullTransitionLog, MatchOutcome, Matchup, ReversalLog, RosterEntry,
    RoundStatus, TierBracket, TierView, Transition, TransitionEntry, TransitionLog,
};
pub use models::{
    InitialStats, LadderError, MatchId, MatchRecord, Player, PlayerId, RoundRecord, RoundSnapshot, SnapshotEntry,
    StatsUpdate, TierLadder, DEFAULT_TIERS,
};
pub use store::{MemoryStore, StoreError};
