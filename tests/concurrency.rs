//! Integration tests for concurrent access to one ladder.

mod common;

use std::thread;

use common::{assert_contiguous, ladder_with, player};
use tier_ladder::LadderError;

#[test]
fn duplicate_submissions_apply_once() {
    let ladder = ladder_with(&[("a", "Gold 1"), ("b", "Gold 1"), ("c", "Gold 1"), ("d", "Gold 1")]);

    let shared = &ladder;
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || shared.submit_score("a", 3, "c", 1)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LadderError::IneligibleMatchup(..))));
    assert_eq!(ladder.match_history("a").unwrap().len(), 1);
    assert_eq!(player(&ladder, "a").wins, 1);
    assert_eq!(player(&ladder, "c").losses, 1);
}

#[test]
fn parallel_tiers_do_not_interfere() {
    let tiers = ["Gold 1", "Gold 2", "Gold 3", "Silver 1"];
    let players: Vec<(String, &str)> = tiers
        .iter()
        .flat_map(|tier| (0..4).map(move |n| (format!("{}-{}", tier, n), *tier)))
        .collect();
    let refs: Vec<(&str, &str)> = players.iter().map(|(id, tier)| (id.as_str(), *tier)).collect();
    let ladder = ladder_with(&refs);

    thread::scope(|s| {
        for tier in tiers {
            let ladder = &ladder;
            s.spawn(move || {
                let ids: Vec<String> = (0..4).map(|n| format!("{}-{}", tier, n)).collect();
                common::play_round(ladder, [ids[0].as_str(), ids[1].as_str(), ids[2].as_str(), ids[3].as_str()]);
            });
        }
    });

    for tier in tiers {
        assert_contiguous(&ladder, tier);
        let bracket = ladder.bracket(tier).unwrap();
        assert!(bracket.matchups.is_empty());
    }
    let full = ladder.finalize_ladder().unwrap();
    assert_eq!(full.snapshot.entries.len(), 16);
}
