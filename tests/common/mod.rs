//! Shared helpers for the integration tests.
#![allow(dead_code)]

use tier_ladder::{Ladder, LadderConfig, Player};

/// Ladder with the given players added in order (rank follows insertion order per tier).
pub fn ladder_with(players: &[(&str, &str)]) -> Ladder {
    ladder_with_config(LadderConfig::default(), players)
}

pub fn ladder_with_config(config: LadderConfig, players: &[(&str, &str)]) -> Ladder {
    let ladder = Ladder::in_memory(config);
    for (id, tier) in players {
        ladder.add_player(id, tier, None).unwrap();
    }
    ladder
}

/// Player ids of a tier in rank order.
pub fn ids(ladder: &Ladder, tier: &str) -> Vec<String> {
    ladder.get_tier(tier).unwrap().into_iter().map(|p| p.id).collect()
}

pub fn player(ladder: &Ladder, id: &str) -> Player {
    ladder.get_player(id).unwrap()
}

/// Ranks of a tier are exactly 1..=count.
pub fn assert_contiguous(ladder: &Ladder, tier: &str) {
    let ranks: Vec<u32> = ladder
        .get_tier(tier)
        .unwrap()
        .iter()
        .map(|p| p.rank_in_tier)
        .collect();
    let expected: Vec<u32> = (1..=ranks.len() as u32).collect();
    assert_eq!(ranks, expected, "ranks in {tier} are not contiguous");
}

/// Full round in a 4-player tier ordered [r1, r2, r3, r4]:
/// r1 and r2 finish with two wins, r3 and r4 with two losses.
pub fn play_round(ladder: &Ladder, [r1, r2, r3, r4]: [&str; 4]) {
    ladder.submit_score(r1, 3, r3, 1).unwrap();
    ladder.submit_score(r2, 3, r4, 1).unwrap();
    ladder.submit_score(r1, 3, r2, 1).unwrap();
    ladder.submit_score(r4, 3, r3, 1).unwrap();
    ladder.submit_score(r2, 3, r4, 1).unwrap();
}

/// The stat fields that a match changes.
pub fn stats(p: &Player) -> (String, u32, u32, u32, u32, u32, u32, u32, bool) {
    (
        p.tier.clone(),
        p.wins,
        p.losses,
        p.goals_for,
        p.goals_against,
        p.rank_in_tier,
        p.round_wins,
        p.round_losses,
        p.round_done,
    )
}
