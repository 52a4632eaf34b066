use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use golf_scoring::{
    Competition, CompetitionResult, FinalizedScore, Participant, ScoringMode, ScoringType,
    results::{build_results, rank},
    scorecard::{HoleScore, ScoreCard},
    standings::aggregate,
};

/// Field of `n` computed scores with plenty of ties
fn setup_field(n: usize) -> Vec<FinalizedScore> {
    (0..n)
        .map(|i| FinalizedScore {
            participant_id: i as i64,
            entity_id: i as i64,
            entity_name: format!("player{}", i),
            finished: i % 11 != 0,
            gross_score: 70 + (i % 9) as i32,
            net_score: None,
            relative_to_par: (i % 9) as i32 - 2,
            strokes_received: Some((i % 5) as i32),
        })
        .collect()
}

/// Locked 18-hole participants for a full finalize pass
fn setup_participants(n: usize) -> Vec<Participant> {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 18, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let holes = (0..18)
                .map(|h| HoleScore::try_from(3 + ((i + h) % 3) as i32).unwrap())
                .collect();
            let mut card = ScoreCard::from_holes(holes);
            card.lock(now);
            let mut participant =
                Participant::new(i as i64, 1, i as i64, format!("player{}", i), 18);
            participant.scorecard = card;
            participant
        })
        .collect()
}

/// Result rows for `entities` players over `competitions` rounds
fn setup_rows(competitions: i64, entities: i64) -> Vec<CompetitionResult> {
    (1..=competitions)
        .flat_map(|c| {
            (1..=entities).map(move |e| CompetitionResult {
                competition_id: c,
                participant_id: c * 1000 + e,
                entity_id: e,
                entity_name: format!("player{}", e),
                position: ((e + c) % entities + 1) as u32,
                points: (e * c) % 13,
                gross_score: 72,
                net_score: None,
                relative_to_par: 0,
                scoring_type: ScoringType::Gross,
            })
        })
        .collect()
}

/// Benchmark ranking a field under both scoring types
fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for n_players in [10, 100, 1000].iter() {
        let field = setup_field(*n_players);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            &field,
            |b, field| {
                b.iter(|| {
                    (
                        rank(field, ScoringType::Gross),
                        rank(field, ScoringType::Net),
                    )
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a complete finalize computation without storage
fn bench_build_results(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 8, 1, 19, 0, 0).unwrap();
    let competition = Competition::scheduled(1, "Club Championship", vec![4; 18], now)
        .with_scoring_mode(ScoringMode::Both);
    let participants = setup_participants(150);

    c.bench_function("build_results_150_players", |b| {
        b.iter(|| build_results(&competition, &participants, None, now));
    });
}

/// Benchmark standings aggregation across a season
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for competitions in [5, 20, 50].iter() {
        let rows = setup_rows(*competitions, 200);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_competitions", competitions)),
            &rows,
            |b, rows| {
                b.iter(|| aggregate(rows));
            },
        );
    }

    group.finish();
}

criterion_group!(ranking, bench_rank, bench_build_results);

criterion_group!(standings, bench_aggregate);

criterion_main!(ranking, standings);
