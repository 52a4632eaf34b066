//! Ranking with shared positions for ties.
//!
//! Positions follow competition ranking ("1224"): entries with equal keys
//! share a position equal to the number of entries strictly ahead of them
//! plus one, so the group after a tie skips ahead by the tie's size.
//! The same two steps rank competition fields and standings tables.

use super::finalizer::FinalizedScore;
use crate::competition::ScoringType;
use std::ops::Range;

/// Split keys (already sorted best-first) into runs of equal keys
pub fn tie_groups<K: PartialEq>(sorted_keys: &[K]) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    for idx in 1..=sorted_keys.len() {
        if idx == sorted_keys.len() || sorted_keys[idx] != sorted_keys[start] {
            groups.push(start..idx);
            start = idx;
        }
    }
    groups
}

/// Position for every key (already sorted best-first)
pub fn competition_positions<K: PartialEq>(sorted_keys: &[K]) -> Vec<u32> {
    tie_groups(sorted_keys)
        .into_iter()
        .flat_map(|group| {
            let position = group.start as u32 + 1;
            group.map(move |_| position)
        })
        .collect()
}

/// A computed score with its position; 0 for non-finishers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedScore {
    pub score: FinalizedScore,
    pub position: u32,
}

/// Rank a field under one scoring type.
///
/// Finishers come first ordered by ranking key, then name for display.
/// Non-finishers follow with position 0, ordered by name.
pub fn rank(scores: &[FinalizedScore], scoring_type: ScoringType) -> Vec<RankedScore> {
    let (mut finished, mut unfinished): (Vec<_>, Vec<_>) =
        scores.iter().cloned().partition(|s| s.finished);

    finished.sort_by(|a, b| {
        a.ranking_key(scoring_type)
            .cmp(&b.ranking_key(scoring_type))
            .then_with(|| a.entity_name.cmp(&b.entity_name))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });
    unfinished.sort_by(|a, b| {
        a.entity_name
            .cmp(&b.entity_name)
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    let keys: Vec<i32> = finished
        .iter()
        .map(|s| s.ranking_key(scoring_type))
        .collect();
    let positions = competition_positions(&keys);

    finished
        .into_iter()
        .zip(positions)
        .map(|(score, position)| RankedScore { score, position })
        .chain(
            unfinished
                .into_iter()
                .map(|score| RankedScore { score, position: 0 }),
        )
        .collect()
}
