//! Standings data models.

use crate::competition::{CompetitionId, EntityId, ScoringType, StandingsScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated standing of one team or player within a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub total_points: i64,
    pub competitions_played: usize,
    pub position: u32,
}

/// Standings table for a series or tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub scope: StandingsScope,
    pub scoring_type: ScoringType,
    /// Ranked entries, ties listed by name
    pub entries: Vec<StandingEntry>,
    /// Competitions in the scope, participated in or not
    pub total_competitions: usize,
}

impl Standings {
    /// Entry for an entity, if it has results in scope
    pub fn entry(&self, entity_id: EntityId) -> Option<&StandingEntry> {
        self.entries.iter().find(|e| e.entity_id == entity_id)
    }
}

/// How an entity relates to one competition of its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParticipationStatus {
    /// Entity has a finalized result row
    Played { position: u32, points: i64 },
    /// Competition has not taken place yet
    Future,
    /// Competition took place without the entity
    NotParticipated,
}

/// One line of an entity's per-competition breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionBreakdown {
    pub competition_id: CompetitionId,
    pub competition_name: String,
    pub starts_at: DateTime<Utc>,
    pub status: ParticipationStatus,
}
