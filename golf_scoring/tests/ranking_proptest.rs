/// Property-based tests for ranking and standings aggregation using proptest
///
/// These tests check the shared-position rules over randomly generated
/// fields and result sets.
use golf_scoring::results::{competition_positions, rank};
use golf_scoring::standings::aggregate;
use golf_scoring::{CompetitionResult, FinalizedScore, ScoringType};
use proptest::prelude::*;

// Strategy for one computed score; ids are assigned afterwards
fn score_strategy() -> impl Strategy<Value = (bool, i32, Option<i32>)> {
    (any::<bool>(), -10i32..=20, prop::option::of(0i32..=36))
}

fn field_strategy() -> impl Strategy<Value = Vec<FinalizedScore>> {
    prop::collection::vec(score_strategy(), 0..=24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (finished, relative, strokes))| FinalizedScore {
                participant_id: idx as i64 + 1,
                entity_id: idx as i64 + 1,
                entity_name: format!("P{:02}", idx % 7),
                finished,
                gross_score: 72 + relative,
                net_score: strokes.map(|s| 72 + relative - s),
                relative_to_par: relative,
                strokes_received: strokes,
            })
            .collect()
    })
}

// (competition, entity, points) triples, at most one row per pair
fn rows_strategy() -> impl Strategy<Value = Vec<CompetitionResult>> {
    prop::collection::btree_map((1i64..=5, 1i64..=8), 0i64..=12, 0..=30).prop_map(|rows| {
        rows.into_iter()
            .map(|((competition_id, entity_id), points)| CompetitionResult {
                competition_id,
                participant_id: competition_id * 100 + entity_id,
                entity_id,
                entity_name: format!("Entity {entity_id}"),
                position: 1,
                points,
                gross_score: 72,
                net_score: None,
                relative_to_par: 0,
                scoring_type: ScoringType::Gross,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_positions_count_entries_strictly_ahead(keys in prop::collection::vec(-5i32..5, 0..40)) {
        let mut keys = keys;
        keys.sort_unstable();
        let positions = competition_positions(&keys);

        prop_assert_eq!(positions.len(), keys.len());
        for (idx, &position) in positions.iter().enumerate() {
            let ahead = keys.iter().filter(|&&k| k < keys[idx]).count();
            prop_assert_eq!(position as usize, ahead + 1);
        }
    }

    #[test]
    fn test_rank_keeps_every_participant(field in field_strategy(), net in any::<bool>()) {
        let scoring_type = if net { ScoringType::Net } else { ScoringType::Gross };
        let ranked = rank(&field, scoring_type);

        prop_assert_eq!(ranked.len(), field.len());
        let mut ids: Vec<i64> = ranked.iter().map(|r| r.score.participant_id).collect();
        ids.sort_unstable();
        let expected: Vec<i64> = (1..=field.len() as i64).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn test_rank_positions_follow_keys(field in field_strategy(), net in any::<bool>()) {
        let scoring_type = if net { ScoringType::Net } else { ScoringType::Gross };
        let ranked = rank(&field, scoring_type);
        let finishers = field.iter().filter(|s| s.finished).count();

        for (idx, entry) in ranked.iter().enumerate() {
            if idx < finishers {
                prop_assert!(entry.score.finished);
                let key = entry.score.ranking_key(scoring_type);
                let ahead = ranked[..finishers]
                    .iter()
                    .filter(|r| r.score.ranking_key(scoring_type) < key)
                    .count();
                prop_assert_eq!(entry.position as usize, ahead + 1);
            } else {
                prop_assert!(!entry.score.finished);
                prop_assert_eq!(entry.position, 0);
            }
        }
        if finishers > 0 {
            prop_assert_eq!(ranked[0].position, 1);
        }
    }

    #[test]
    fn test_standings_conserve_points(rows in rows_strategy()) {
        let entries = aggregate(&rows);

        let total: i64 = rows.iter().map(|r| r.points).sum();
        prop_assert_eq!(entries.iter().map(|e| e.total_points).sum::<i64>(), total);

        let played: usize = entries.iter().map(|e| e.competitions_played).sum();
        prop_assert_eq!(played, rows.len());
    }

    #[test]
    fn test_standings_positions_are_monotonic(rows in rows_strategy()) {
        let entries = aggregate(&rows);

        for pair in entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.position <= b.position);
            let same = a.total_points == b.total_points
                && a.competitions_played == b.competitions_played;
            prop_assert_eq!(same, a.position == b.position);
        }
    }
}
