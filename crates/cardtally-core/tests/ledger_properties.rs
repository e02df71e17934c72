// Property tests for the game ledger.
//
// Each case drives a fresh ledger through a generated script of roster
// changes, score adjustments and commits, then checks the bookkeeping
// invariants against the resulting state.

use cardtally_core::{GameLedger, LedgerRules, PlayerId, ScoreFloor, ScoreGoal};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    // Small alphabet with mixed case so case-insensitive collisions are common.
    proptest::string::string_regex("[ aAbB]{0,4}").unwrap()
}

/// A round of adjustments: (player index, delta) pairs.
fn round_strategy() -> impl Strategy<Value = Vec<(usize, i64)>> {
    prop::collection::vec((0usize..4, -20i64..20), 0..6)
}

fn seeded_ledger(rules: LedgerRules) -> (GameLedger, Vec<PlayerId>) {
    let mut ledger = GameLedger::new(rules);
    let ids = ["North", "East", "South", "West"]
        .iter()
        .map(|n| ledger.add_player(n).unwrap().id)
        .collect();
    (ledger, ids)
}

fn play(ledger: &mut GameLedger, ids: &[PlayerId], rounds: &[Vec<(usize, i64)>]) {
    for round in rounds {
        for &(idx, delta) in round {
            ledger.adjust_pending_score(ids[idx], delta).unwrap();
        }
        ledger.commit_round().unwrap();
    }
}

proptest! {
    #[test]
    fn player_names_stay_unique(names in prop::collection::vec(name_strategy(), 0..12)) {
        let mut ledger = GameLedger::default();
        for name in &names {
            let _ = ledger.add_player(name);
        }
        let lowered: Vec<String> = ledger
            .players()
            .iter()
            .map(|p| p.name.to_lowercase())
            .collect();
        for (i, a) in lowered.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for b in &lowered[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn round_totals_and_numbers_are_consistent(
        rounds in prop::collection::vec(round_strategy(), 1..8)
    ) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        play(&mut ledger, &ids, &rounds);

        for (pos, round) in ledger.rounds().iter().enumerate() {
            prop_assert_eq!(round.number() as usize, pos + 1);
            prop_assert_eq!(round.total(), round.scores().values().sum::<i64>());
            for key in round.scores().keys() {
                prop_assert!(ids.contains(key));
            }
        }
    }

    #[test]
    fn standings_are_idempotent_and_sorted(
        rounds in prop::collection::vec(round_strategy(), 0..6)
    ) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        play(&mut ledger, &ids, &rounds);

        let first = ledger.standings();
        let second = ledger.standings();
        prop_assert_eq!(&first, &second);
        for pair in first.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
            if pair[0].total == pair[1].total {
                prop_assert!(pair[0].player.id < pair[1].player.id);
            }
        }
    }

    #[test]
    fn replay_after_reset_reproduces_totals(
        rounds in prop::collection::vec(round_strategy(), 0..6)
    ) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        play(&mut ledger, &ids, &rounds);
        let before: Vec<i64> = ids.iter().map(|&id| ledger.total_score(id)).collect();

        ledger.reset_rounds();
        play(&mut ledger, &ids, &rounds);
        let after: Vec<i64> = ids.iter().map(|&id| ledger.total_score(id)).collect();

        prop_assert_eq!(before, after);
    }

    #[test]
    fn no_winner_without_committed_rounds(round in round_strategy()) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        for (idx, delta) in round {
            ledger.adjust_pending_score(ids[idx], delta).unwrap();
        }
        prop_assert!(ledger.winner(ScoreGoal::HighestWins).is_none());
        prop_assert!(ledger.winner(ScoreGoal::LowestWins).is_none());
    }

    #[test]
    fn zero_floor_never_shows_negative_scores(
        rounds in prop::collection::vec(round_strategy(), 0..6),
        open in round_strategy(),
    ) {
        let rules = LedgerRules {
            score_floor: ScoreFloor::Zero,
            ..LedgerRules::default()
        };
        let (mut ledger, ids) = seeded_ledger(rules);
        play(&mut ledger, &ids, &rounds);
        for (idx, delta) in open {
            ledger.adjust_pending_score(ids[idx], delta).unwrap();
            prop_assert!(ledger.display_score(ids[idx]) >= 0);
        }
        for &id in &ids {
            prop_assert!(ledger.total_score(id) >= 0);
        }
    }

    #[test]
    fn winner_holds_the_extreme_total(
        rounds in prop::collection::vec(round_strategy(), 1..6)
    ) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        play(&mut ledger, &ids, &rounds);

        let totals: Vec<i64> = ids.iter().map(|&id| ledger.total_score(id)).collect();
        let max = *totals.iter().max().unwrap();
        let min = *totals.iter().min().unwrap();
        let first_max = ids[totals.iter().position(|&t| t == max).unwrap()];
        let first_min = ids[totals.iter().position(|&t| t == min).unwrap()];

        prop_assert_eq!(ledger.winner(ScoreGoal::HighestWins).unwrap().id, first_max);
        prop_assert_eq!(ledger.winner(ScoreGoal::LowestWins).unwrap().id, first_min);
    }

    #[test]
    fn extreme_deltas_are_rejected_without_side_effects(
        rounds in prop::collection::vec(
            prop::collection::vec(
                (0usize..4, prop_oneof![Just(i64::MAX), Just(i64::MIN), any::<i64>(), -20i64..20]),
                0..6,
            ),
            0..4,
        ),
    ) {
        let (mut ledger, ids) = seeded_ledger(LedgerRules::default());
        for round in rounds {
            for (idx, delta) in round {
                let before = ledger.pending().clone();
                if ledger.adjust_pending_score(ids[idx], delta).is_err() {
                    prop_assert_eq!(ledger.pending(), &before);
                }
            }
            let total = ledger.commit_round().unwrap().total();
            let exact = ledger.rounds().last().unwrap().scores().values()
                .try_fold(0i64, |acc, &d| acc.checked_add(d));
            prop_assert_eq!(Some(total), exact);
        }
    }
}
