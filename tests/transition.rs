//! Integration tests for finalizing tiers and the full-ladder update.

mod common;

use common::{assert_contiguous, ids, ladder_with, ladder_with_config, play_round, player};
use tier_ladder::{BottomDemotion, LadderConfig, LadderError, RoundRecord, Transition};

/// Ladder with four players in each listed tier, ranked in the given order.
fn ladder_of(groups: &[(&str, [&str; 4])]) -> tier_ladder::Ladder {
    let players: Vec<(&str, &str)> = groups
        .iter()
        .flat_map(|(tier, names)| names.iter().map(move |n| (*n, *tier)))
        .collect();
    ladder_with(&players)
}

#[test]
fn finished_players_move_and_wait_as_pending() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"]), ("Gold 2", ["x", "y", "z", "w"])]);
    play_round(&ladder, ["a", "b", "c", "d"]);
    assert_eq!(ids(&ladder, "Gold 1"), ["a", "b", "d", "c"]);

    let log = ladder.finalize_tier("Gold 1").unwrap();
    assert_eq!(log.tier, "Gold 1");
    assert_eq!(log.touched_tiers, ["Gold 1", "Elite 3", "Gold 2"]);
    let moves: Vec<_> = log
        .entries
        .iter()
        .map(|e| (e.player_id.as_str(), e.transition.clone()))
        .collect();
    let up = Transition::Promoted { to: "Elite 3".into() };
    let down = Transition::Demoted { to: "Gold 2".into() };
    assert_eq!(
        moves,
        [("a", up.clone()), ("b", up), ("d", down.clone()), ("c", down)]
    );
    assert_eq!(log.entries[0].record, RoundRecord { wins: 2, losses: 0 });

    assert!(ladder.get_tier("Gold 1").unwrap().is_empty());
    assert_eq!(ids(&ladder, "Elite 3"), ["a", "b"]);
    // arrivals go below the residents
    assert_eq!(ids(&ladder, "Gold 2"), ["x", "y", "z", "w", "d", "c"]);
    assert_contiguous(&ladder, "Gold 2");

    let a = player(&ladder, "a");
    assert!(a.pending);
    assert_eq!((a.round_wins, a.round_losses, a.round_done), (0, 0, false));
    assert_eq!((a.wins, a.losses), (2, 0));
}

#[test]
fn unfinished_players_stay_with_a_fresh_round() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"])]);
    ladder.submit_score("a", 3, "c", 1).unwrap();

    let log = ladder.finalize_tier("Gold 1").unwrap();
    assert!(log.entries.iter().all(|e| e.transition == Transition::Unchanged));
    assert_eq!(log.touched_tiers, ["Gold 1"]);
    assert_eq!(ids(&ladder, "Gold 1"), ["a", "b", "c", "d"]);
    let a = player(&ladder, "a");
    assert_eq!((a.round_wins, a.wins), (0, 1));
    assert_eq!(ladder.get_matchups("Gold 1").unwrap().len(), 2);
}

#[test]
fn top_tier_winners_hold_their_place() {
    let ladder = ladder_of(&[("Cosmic", ["a", "b", "c", "d"])]);
    play_round(&ladder, ["a", "b", "c", "d"]);

    let log = ladder.finalize_tier("cosmic").unwrap();
    assert_eq!(log.tier, "Cosmic");
    assert_eq!(log.entries[0].transition, Transition::HeldAtTop);
    assert_eq!(ids(&ladder, "Cosmic"), ["a", "b"]);
    assert_eq!(ids(&ladder, "Universal"), ["d", "c"]);
    assert!(!player(&ladder, "a").pending);
}

#[test]
fn bottom_tier_losers_are_eliminated_by_default() {
    let ladder = ladder_of(&[("Bronze", ["a", "b", "c", "d"])]);
    play_round(&ladder, ["a", "b", "c", "d"]);

    let log = ladder.finalize_tier("Bronze").unwrap();
    assert!(log
        .entries
        .iter()
        .filter(|e| e.player_id == "c" || e.player_id == "d")
        .all(|e| e.transition == Transition::Eliminated));
    assert_eq!(ladder.get_player("c"), Err(LadderError::NotFound("c".into())));
    assert_eq!(ladder.get_player("d"), Err(LadderError::NotFound("d".into())));
    assert!(ladder.get_tier("Bronze").unwrap().is_empty());
    assert_eq!(ids(&ladder, "Silver 3"), ["a", "b"]);
}

#[test]
fn bottom_tier_losers_can_stay() {
    let config = LadderConfig::default().with_bottom_demotion(BottomDemotion::Stay);
    let ladder = ladder_with_config(config, &[("a", "Bronze"), ("b", "Bronze"), ("c", "Bronze"), ("d", "Bronze")]);
    play_round(&ladder, ["a", "b", "c", "d"]);

    let log = ladder.finalize_tier("Bronze").unwrap();
    let held: Vec<_> = log
        .entries
        .iter()
        .filter(|e| e.transition == Transition::HeldAtBottom)
        .map(|e| e.player_id.as_str())
        .collect();
    assert_eq!(held, ["d", "c"]);
    assert_eq!(ids(&ladder, "Bronze"), ["d", "c"]);
    assert_contiguous(&ladder, "Bronze");
    assert!(!player(&ladder, "c").round_done);
}

#[test]
fn finalizing_needs_a_known_non_empty_tier() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"])]);
    assert_eq!(ladder.finalize_tier("Bronze"), Err(LadderError::TierEmpty("Bronze".into())));
    assert_eq!(
        ladder.finalize_tier("Mithril"),
        Err(LadderError::TierInvalid("Mithril".into()))
    );
}

#[test]
fn pending_arrivals_do_not_count_against_capacity() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"])]);
    ladder.add_player("e1", "Elite 3", None).unwrap();
    ladder.add_player("e2", "Elite 3", None).unwrap();
    ladder.add_player("e3", "Elite 3", None).unwrap();
    play_round(&ladder, ["a", "b", "c", "d"]);
    ladder.finalize_tier("Gold 1").unwrap();
    assert_eq!(ids(&ladder, "Elite 3"), ["e1", "e2", "e3", "a", "b"]);

    let added = ladder.add_player("e4", "Elite 3", None).unwrap();
    assert_eq!(added.rank_in_tier, 4);
    assert_eq!(ids(&ladder, "Elite 3"), ["e1", "e2", "e3", "e4", "a", "b"]);
    assert!(matches!(
        ladder.add_player("e5", "Elite 3", None),
        Err(LadderError::TierFull { capacity: 4, .. })
    ));
}

#[test]
fn snapshot_is_empty_before_the_first_update() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"])]);
    let snapshot = ladder.get_snapshot().unwrap();
    assert!(snapshot.taken_at.is_none());
    assert!(snapshot.entries.is_empty());
}

#[test]
fn full_update_swaps_neighbouring_tiers() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"]), ("Gold 2", ["e", "f", "g", "h"])]);
    play_round(&ladder, ["a", "b", "c", "d"]);
    play_round(&ladder, ["e", "f", "g", "h"]);

    let full = ladder.finalize_ladder().unwrap();
    assert_eq!(full.tiers[0].tier, "Gold 1");
    assert_eq!(full.tiers[1].tier, "Gold 2");
    // losers from Gold 1 were pending in Gold 2 and did not move twice
    assert!(full.tiers[1].entries.iter().all(|e| e.player_id != "c" && e.player_id != "d"));

    assert_eq!(ids(&ladder, "Elite 3"), ["a", "b"]);
    assert_eq!(ids(&ladder, "Gold 1"), ["e", "f"]);
    assert_eq!(ids(&ladder, "Gold 2"), ["d", "c"]);
    assert_eq!(ids(&ladder, "Gold 3"), ["h", "g"]);
    for tier in ["Elite 3", "Gold 1", "Gold 2", "Gold 3"] {
        assert_contiguous(&ladder, tier);
        for p in ladder.get_tier(tier).unwrap() {
            assert!(!p.pending);
            assert_eq!((p.round_wins, p.round_losses, p.round_done), (0, 0, false));
        }
    }

    let snapshot = ladder.get_snapshot().unwrap();
    assert_eq!(snapshot, full.snapshot);
    assert!(snapshot.taken_at.is_some());
    let order: Vec<_> = snapshot
        .entries
        .iter()
        .map(|e| (e.position, e.player_id.as_str(), e.tier.as_str(), e.rank_in_tier))
        .collect();
    assert_eq!(
        order,
        [
            (1, "a", "Elite 3", 1),
            (2, "b", "Elite 3", 2),
            (3, "e", "Gold 1", 1),
            (4, "f", "Gold 1", 2),
            (5, "d", "Gold 2", 1),
            (6, "c", "Gold 2", 2),
            (7, "h", "Gold 3", 1),
            (8, "g", "Gold 3", 2),
        ]
    );

    let csv = snapshot.to_csv().unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("position,player_id,tier,rank_in_tier"));
    assert_eq!(lines.next(), Some("1,a,Elite 3,1"));
}

#[test]
fn merged_players_start_the_next_round() {
    let ladder = ladder_of(&[("Gold 1", ["a", "b", "c", "d"]), ("Gold 2", ["e", "f", "g", "h"])]);
    play_round(&ladder, ["a", "b", "c", "d"]);
    play_round(&ladder, ["e", "f", "g", "h"]);
    ladder.finalize_ladder().unwrap();

    assert_eq!(ladder.get_matchups("Gold 2").unwrap().len(), 1);
    ladder.submit_score("d", 3, "c", 0).unwrap();
    assert_eq!(player(&ladder, "d").round_wins, 1);
}
