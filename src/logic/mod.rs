//! Ladder business logic: ranking, matchups, rounds, transitions and cascades.

pub mod cascade;
pub mod matchups;
pub mod ranking;
pub mod roster;
pub mod round;
pub mod transition;

pub use cascade::{remove_player, CascadeLog, CascadeMove};
pub use matchups::{
    select_matchups, tier_bracket, tier_matchups, BracketEntry, BracketState, Matchup, RoundStatus,
    TierBracket,
};
pub use ranking::{compact, compare_win_ratio, recompute};
pub use roster::{add_player, overview, parse_roster, seed_roster, set_stats, RosterEntry, TierView};
pub use round::{submit_score, undo_last_match, MatchOutcome, ReversalLog};
pub use transition::{
    finalize_ladder, finalize_tier, FullTransitionLog, Transition, TransitionEntry, TransitionLog,
};
