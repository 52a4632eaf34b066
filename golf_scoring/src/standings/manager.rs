//! Standings manager reading finalized results for a series or tour.

use super::{
    aggregator::{aggregate, breakdown},
    models::{CompetitionBreakdown, Standings},
};
use crate::competition::{EntityId, ScoringType, StandingsScope};
use crate::db::{ScoringStore, StoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Standings errors. Missing or empty data is never an error.
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub type StandingsResult<T> = Result<T, StandingsError>;

/// Standings manager
#[derive(Clone)]
pub struct StandingsManager {
    store: Arc<dyn ScoringStore>,
}

impl StandingsManager {
    /// Create a new standings manager
    pub fn new(store: Arc<dyn ScoringStore>) -> Self {
        Self { store }
    }

    /// Ranked standings for a series (teams) or tour (players)
    ///
    /// Only competitions whose results have been finalized contribute.
    pub async fn compute_standings(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
    ) -> StandingsResult<Standings> {
        let competitions = self.store.competitions_in_scope(scope).await?;
        let results = self.store.scope_results(scope, scoring_type).await?;
        let entries = aggregate(&results);

        log::debug!(
            "Standings for {} ({}): {} entries over {} competitions",
            scope,
            scoring_type,
            entries.len(),
            competitions.len()
        );

        Ok(Standings {
            scope,
            scoring_type,
            entries,
            total_competitions: competitions.len(),
        })
    }

    /// Per-competition breakdown of one entity for detail views
    pub async fn entity_breakdown(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
        entity_id: EntityId,
    ) -> StandingsResult<Vec<CompetitionBreakdown>> {
        self.entity_breakdown_at(scope, scoring_type, entity_id, Utc::now())
            .await
    }

    /// [`entity_breakdown`](Self::entity_breakdown) with an explicit clock
    pub async fn entity_breakdown_at(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
        entity_id: EntityId,
        now: DateTime<Utc>,
    ) -> StandingsResult<Vec<CompetitionBreakdown>> {
        let competitions = self.store.competitions_in_scope(scope).await?;
        let results = self.store.scope_results(scope, scoring_type).await?;
        Ok(breakdown(entity_id, &competitions, &results, now))
    }
}
