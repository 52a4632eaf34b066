//! Integration tests for score recording and competition finalization.
//!
//! Drives `ScoreRecorder` and `ResultsManager` against the in-memory store,
//! sharing one lock registry the way a server would.

use chrono::{DateTime, Duration, TimeZone, Utc};
use golf_scoring::{
    Competition, CompetitionLocks, CompetitionResult, FinalizeError, MemoryScoringStore,
    Participant, ResultsManager, ScoreError, ScoreRecorder, ScoringMode, ScoringType,
    db::{CompetitionRepository, ParticipantRepository},
    scorecard::ManualScoreUpdate,
};
use std::sync::Arc;

const TOUR: i64 = 7;

fn tee_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 6, 8, 0, 0).unwrap()
}

fn evening() -> DateTime<Utc> {
    tee_time() + Duration::hours(10)
}

struct Harness {
    store: Arc<MemoryScoringStore>,
    recorder: ScoreRecorder,
    results: ResultsManager,
}

/// Three-hole par-12 competition with Ann (10), Bo (11) and Cy (12)
async fn setup(competition: Competition) -> Harness {
    let store = Arc::new(MemoryScoringStore::new());
    let locks = CompetitionLocks::new();
    let hole_count = competition.hole_count();
    let competition_id = competition.id;
    store.insert_competition(competition).await;

    for (id, name) in [(10, "Ann"), (11, "Bo"), (12, "Cy")] {
        let participant =
            Participant::new(id, competition_id, id - 9, name, hole_count).with_player(id + 90);
        store.insert_participant(participant).await;
    }

    Harness {
        recorder: ScoreRecorder::new(store.clone(), locks.clone()),
        results: ResultsManager::new(store.clone(), locks),
        store,
    }
}

fn club_cup() -> Competition {
    Competition::scheduled(1, "Club Cup", vec![4, 4, 4], tee_time()).with_tour(TOUR)
}

async fn play(harness: &Harness, participant_id: i64, shots: &[i32]) {
    for (idx, &s) in shots.iter().enumerate() {
        harness
            .recorder
            .record_hole_score_at(participant_id, idx + 1, s, tee_time())
            .await
            .expect("Failed to record score");
    }
}

async fn play_and_lock(harness: &Harness, participant_id: i64, shots: &[i32]) {
    play(harness, participant_id, shots).await;
    harness
        .recorder
        .lock_at(participant_id, evening())
        .await
        .expect("Failed to lock card");
}

fn row<'a>(
    rows: &'a [CompetitionResult],
    name: &str,
    scoring_type: ScoringType,
) -> &'a CompetitionResult {
    rows.iter()
        .find(|r| r.entity_name == name && r.scoring_type == scoring_type)
        .expect("Missing result row")
}

#[tokio::test]
async fn test_finalize_ranks_field_and_allocates_points() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    play_and_lock(&h, 11, &[3, 4, 4]).await;
    play_and_lock(&h, 12, &[5, 4, 4]).await;

    let summary = h.results.finalize_at(1, evening()).await.unwrap();
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.finished, 3);
    assert_eq!(summary.field_size, 3);

    let rows = h.results.results(1).await.unwrap();
    let bo = row(&rows, "Bo", ScoringType::Gross);
    assert_eq!((bo.position, bo.points, bo.gross_score, bo.relative_to_par), (1, 5, 11, -1));
    let ann = row(&rows, "Ann", ScoringType::Gross);
    assert_eq!((ann.position, ann.points), (2, 3));
    let cy = row(&rows, "Cy", ScoringType::Gross);
    assert_eq!((cy.position, cy.points), (3, 1));

    let competition = h.store.get_competition(1).await.unwrap().unwrap();
    assert!(competition.results_finalized);
}

#[tokio::test]
async fn test_finalize_is_idempotent() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    play_and_lock(&h, 11, &[4, 4, 4]).await;
    play(&h, 12, &[4, 4]).await;

    h.results.finalize_at(1, evening()).await.unwrap();
    let first = h.results.results(1).await.unwrap();
    h.results.finalize_at(1, evening()).await.unwrap();
    let second = h.results.results(1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_ties_share_position_and_points() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    play_and_lock(&h, 11, &[3, 5, 4]).await;
    play_and_lock(&h, 12, &[5, 4, 4]).await;

    h.results.finalize_at(1, evening()).await.unwrap();
    let rows = h.results.results(1).await.unwrap();

    let view: Vec<(&str, u32, i64)> = rows
        .iter()
        .map(|r| (r.entity_name.as_str(), r.position, r.points))
        .collect();
    assert_eq!(view, vec![("Ann", 1, 5), ("Bo", 1, 5), ("Cy", 3, 1)]);
}

#[tokio::test]
async fn test_locked_card_rejects_scores_until_unlocked() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;

    let err = h
        .recorder
        .record_hole_score_at(10, 2, 6, evening())
        .await
        .unwrap_err();
    assert!(matches!(err, ScoreError::Locked(10)));

    let err = h
        .recorder
        .record_manual_score(10, ManualScoreUpdate::total(Some(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoreError::Locked(10)));

    h.recorder.unlock(10).await.unwrap();
    let card = h
        .recorder
        .record_hole_score_at(10, 2, 6, evening())
        .await
        .unwrap();
    assert_eq!(card.stroke_total(), 14);
    assert!(!card.locked);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_any_write() {
    let h = setup(club_cup()).await;

    let err = h.recorder.record_hole_score(10, 0, 4).await.unwrap_err();
    assert!(matches!(err, ScoreError::InvalidHole { hole: 0, hole_count: 3 }));

    let err = h.recorder.record_hole_score(10, 4, -5).await.unwrap_err();
    assert!(matches!(err, ScoreError::InvalidHole { hole: 4, .. }));

    let err = h.recorder.record_hole_score(10, 1, -2).await.unwrap_err();
    assert!(matches!(err, ScoreError::InvalidShots(-2)));
    assert!(err.is_validation());

    let err = h.recorder.record_hole_score(99, 1, 4).await.unwrap_err();
    assert!(matches!(err, ScoreError::ParticipantNotFound(99)));

    let card = h.store.get_participant(10).await.unwrap().unwrap().scorecard;
    assert!(!card.has_recorded_hole());
}

#[tokio::test]
async fn test_clearing_a_hole_leaves_card_unfinished() {
    let h = setup(club_cup()).await;
    play(&h, 10, &[4, 4, 4]).await;
    h.recorder.record_hole_score(10, 3, 0).await.unwrap();
    h.recorder.lock_at(10, evening()).await.unwrap();

    h.results.finalize_at(1, evening()).await.unwrap();
    let rows = h.results.results(1).await.unwrap();
    let ann = row(&rows, "Ann", ScoringType::Gross);
    assert_eq!((ann.position, ann.points, ann.gross_score), (0, 0, 8));
}

#[tokio::test]
async fn test_give_up_scores_zero_and_ranks_last() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    play_and_lock(&h, 11, &[5, 5, 5]).await;
    play_and_lock(&h, 12, &[3, -1, 4]).await;

    let summary = h.results.finalize_at(1, evening()).await.unwrap();
    assert_eq!(summary.finished, 2);
    assert_eq!(summary.field_size, 2);

    let rows = h.results.results(1).await.unwrap();
    let cy = rows.last().unwrap();
    assert_eq!(cy.entity_name, "Cy");
    assert_eq!((cy.position, cy.points, cy.gross_score, cy.relative_to_par), (0, 0, 0, 0));
    assert!(!cy.is_finished());
    assert_eq!(row(&rows, "Ann", ScoringType::Gross).points, 4);
}

#[tokio::test]
async fn test_disqualified_participant_never_finishes() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[3, 3, 3]).await;
    play_and_lock(&h, 11, &[4, 4, 4]).await;
    h.recorder.set_disqualified(10, true).await.unwrap();

    h.results.finalize_at(1, evening()).await.unwrap();
    let rows = h.results.results(1).await.unwrap();
    assert_eq!(row(&rows, "Bo", ScoringType::Gross).position, 1);
    let ann = row(&rows, "Ann", ScoringType::Gross);
    assert_eq!((ann.position, ann.points), (0, 0));
}

#[tokio::test]
async fn test_manual_total_finishes_without_hole_data() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    h.recorder
        .record_manual_score(11, ManualScoreUpdate::total(Some(10)).with_out(Some(10)))
        .await
        .unwrap();

    let err = h
        .recorder
        .record_manual_score(12, ManualScoreUpdate::total(Some(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoreError::InvalidManualField { field: "total", value: -1 }));

    h.results.finalize_at(1, evening()).await.unwrap();
    let rows = h.results.results(1).await.unwrap();
    let bo = row(&rows, "Bo", ScoringType::Gross);
    assert_eq!((bo.position, bo.gross_score, bo.relative_to_par), (1, 10, -2));
}

#[tokio::test]
async fn test_handicap_snapshot_is_not_retroactive() {
    let h = setup(club_cup()).await;
    h.store.set_base_handicap(100, 12.0).await;
    h.store.set_tour_handicap(TOUR, 100, 8.6).await;

    h.recorder.record_hole_score_at(10, 1, 5, tee_time()).await.unwrap();
    h.store.set_tour_handicap(TOUR, 100, 20.0).await;
    let card = h.recorder.record_hole_score_at(10, 2, 5, evening()).await.unwrap();

    let snapshot = card.handicap_snapshot.expect("Snapshot not captured");
    assert_eq!(snapshot.value, 8.6);
    assert_eq!(snapshot.captured_at, tee_time());
    assert_eq!(snapshot.strokes_received(), 9);
}

#[tokio::test]
async fn test_give_up_does_not_capture_handicap() {
    let h = setup(club_cup()).await;
    h.store.set_base_handicap(100, 12.0).await;

    let card = h.recorder.record_hole_score(10, 1, -1).await.unwrap();
    assert!(card.handicap_snapshot.is_none());
}

#[tokio::test]
async fn test_both_mode_writes_gross_and_net_sets() {
    let h = setup(club_cup().with_scoring_mode(ScoringMode::Both)).await;
    h.store.set_base_handicap(100, 4.4).await;
    play_and_lock(&h, 10, &[5, 5, 5]).await;
    play_and_lock(&h, 11, &[4, 4, 4]).await;

    let summary = h.results.finalize_at(1, evening()).await.unwrap();
    assert_eq!(summary.rows_written, 6);

    let rows = h.results.results(1).await.unwrap();
    assert_eq!(row(&rows, "Bo", ScoringType::Gross).position, 1);

    let ann = row(&rows, "Ann", ScoringType::Net);
    assert_eq!((ann.position, ann.net_score), (1, Some(11)));
    let bo = row(&rows, "Bo", ScoringType::Net);
    assert_eq!((bo.position, bo.net_score), (2, None));
}

#[tokio::test]
async fn test_active_enrollments_set_field_size() {
    let h = setup(club_cup()).await;
    h.store.set_active_enrollments(TOUR, 10).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;

    let summary = h.results.finalize_at(1, evening()).await.unwrap();
    assert_eq!(summary.field_size, 10);
    let rows = h.results.results(1).await.unwrap();
    assert_eq!(row(&rows, "Ann", ScoringType::Gross).points, 12);
}

#[tokio::test]
async fn test_open_competition_finishes_when_window_closes() {
    let competition = Competition::open(
        2,
        "Open Week",
        vec![4, 4, 4],
        tee_time(),
        Some(tee_time() + Duration::days(7)),
    );
    let h = setup(competition).await;
    play(&h, 10, &[4, 4, 4]).await;

    h.results.finalize_at(2, evening()).await.unwrap();
    let rows = h.results.results(2).await.unwrap();
    assert_eq!(row(&rows, "Ann", ScoringType::Gross).position, 0);

    h.results
        .finalize_at(2, tee_time() + Duration::days(8))
        .await
        .unwrap();
    let rows = h.results.results(2).await.unwrap();
    assert_eq!(row(&rows, "Ann", ScoringType::Gross).position, 1);
}

#[tokio::test]
async fn test_failed_finalize_keeps_previous_results() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;
    h.results.finalize_at(1, evening()).await.unwrap();
    let before = h.results.results(1).await.unwrap();

    assert!(h.store.set_pars(1, vec![4; 9]).await);
    let err = h.results.finalize_at(1, evening()).await.unwrap_err();
    assert!(matches!(
        err,
        FinalizeError::HoleCountMismatch { expected: 9, actual: 3, .. }
    ));
    assert!(err.is_input_error());

    assert!(h.store.set_pars(1, vec![]).await);
    let err = h.results.finalize_at(1, evening()).await.unwrap_err();
    assert!(matches!(err, FinalizeError::MissingPars(1)));

    assert_eq!(h.results.results(1).await.unwrap(), before);
}

#[tokio::test]
async fn test_finalize_unknown_competition() {
    let h = setup(club_cup()).await;
    let err = h.results.finalize(404).await.unwrap_err();
    assert!(matches!(err, FinalizeError::CompetitionNotFound(404)));
}

#[tokio::test]
async fn test_concurrent_scoring_and_finalize_lose_no_updates() {
    let h = setup(club_cup()).await;

    let mut scoring = Vec::new();
    let mut finalizing = Vec::new();
    for participant_id in [10, 11, 12] {
        for hole in 1..=3 {
            let recorder = h.recorder.clone();
            scoring.push(tokio::spawn(async move {
                recorder
                    .record_hole_score(participant_id, hole, hole as i32 + 2)
                    .await
            }));
        }
        let results = h.results.clone();
        finalizing.push(tokio::spawn(async move { results.finalize(1).await }));
    }
    for task in scoring {
        task.await.unwrap().unwrap();
    }
    for task in finalizing {
        task.await.unwrap().unwrap();
    }

    for participant_id in [10, 11, 12] {
        let card = h
            .store
            .get_participant(participant_id)
            .await
            .unwrap()
            .unwrap()
            .scorecard;
        assert_eq!(card.holes_played(), 3);
        assert_eq!(card.stroke_total(), 12);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_recorders_with_separate_lock_registries_lose_no_holes() {
    let competition = Competition::scheduled(2, "Long Course", vec![4; 18], tee_time());
    let h = setup(competition).await;
    let first = ScoreRecorder::new(h.store.clone(), CompetitionLocks::new());
    let second = ScoreRecorder::new(h.store.clone(), CompetitionLocks::new());

    let mut tasks = Vec::new();
    for hole in 1..=18_usize {
        let recorder = if hole % 2 == 0 {
            first.clone()
        } else {
            second.clone()
        };
        tasks.push(tokio::spawn(async move {
            recorder.record_hole_score(10, hole, 4).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let card = h.store.get_participant(10).await.unwrap().unwrap().scorecard;
    assert_eq!(card.holes_played(), 18);
    assert_eq!(card.stroke_total(), 72);
}

#[tokio::test]
async fn test_rejected_edit_leaves_stored_card_untouched() {
    let h = setup(club_cup()).await;
    play_and_lock(&h, 10, &[4, 4, 4]).await;

    let err = h
        .recorder
        .record_manual_score(10, ManualScoreUpdate::total(Some(70)))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoreError::Locked(10)));

    let card = h.store.get_participant(10).await.unwrap().unwrap().scorecard;
    assert_eq!(card.manual_total(), None);
    assert!(card.locked);
}
