//! Aggregation of finalized result rows into standings.

use super::models::{CompetitionBreakdown, ParticipationStatus, StandingEntry};
use crate::competition::{Competition, CompetitionId, CompetitionResult, EntityId};
use crate::results::competition_positions;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

struct Tally {
    entity_name: String,
    name_from: CompetitionId,
    total_points: i64,
    competitions: BTreeSet<CompetitionId>,
}

/// Sum result rows per entity and rank the totals.
///
/// Entities are ordered by total points, then competitions played, both
/// descending. Equal pairs share a position; the next pair skips ahead by
/// the size of the tie. Name only orders ties for display.
pub fn aggregate(results: &[CompetitionResult]) -> Vec<StandingEntry> {
    let mut tallies: HashMap<EntityId, Tally> = HashMap::new();
    for row in results {
        let tally = tallies.entry(row.entity_id).or_insert_with(|| Tally {
            entity_name: row.entity_name.clone(),
            name_from: row.competition_id,
            total_points: 0,
            competitions: BTreeSet::new(),
        });
        // latest competition wins if an entity was renamed
        if row.competition_id > tally.name_from {
            tally.entity_name = row.entity_name.clone();
            tally.name_from = row.competition_id;
        }
        tally.total_points += row.points;
        tally.competitions.insert(row.competition_id);
    }

    let mut entries: Vec<StandingEntry> = tallies
        .into_iter()
        .map(|(entity_id, tally)| StandingEntry {
            entity_id,
            entity_name: tally.entity_name,
            total_points: tally.total_points,
            competitions_played: tally.competitions.len(),
            position: 0,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.competitions_played.cmp(&a.competitions_played))
            .then_with(|| a.entity_name.cmp(&b.entity_name))
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });

    let keys: Vec<(i64, usize)> = entries
        .iter()
        .map(|e| (e.total_points, e.competitions_played))
        .collect();
    for (entry, position) in entries.iter_mut().zip(competition_positions(&keys)) {
        entry.position = position;
    }
    entries
}

/// Per-competition view of one entity across its scope, by start time.
///
/// Markers for competitions without a row never feed into totals.
pub fn breakdown(
    entity_id: EntityId,
    competitions: &[Competition],
    results: &[CompetitionResult],
    now: DateTime<Utc>,
) -> Vec<CompetitionBreakdown> {
    let mut ordered: Vec<&Competition> = competitions.iter().collect();
    ordered.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));

    ordered
        .into_iter()
        .map(|competition| {
            let row = results
                .iter()
                .find(|r| r.entity_id == entity_id && r.competition_id == competition.id);
            let status = match row {
                Some(row) => ParticipationStatus::Played {
                    position: row.position,
                    points: row.points,
                },
                None if competition.starts_at > now => ParticipationStatus::Future,
                None => ParticipationStatus::NotParticipated,
            };
            CompetitionBreakdown {
                competition_id: competition.id,
                competition_name: competition.name.clone(),
                starts_at: competition.starts_at,
                status,
            }
        })
        .collect()
}
