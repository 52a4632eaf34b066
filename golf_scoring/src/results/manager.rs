//! Results manager running the finalize pipeline for a competition.

use super::{
    errors::{FinalizeError, FinalizeResult},
    finalizer::finalize_field,
    points::{compute_points, field_size},
    ranking::rank,
};
use crate::competition::{Competition, CompetitionId, CompetitionResult, Participant};
use crate::db::{FinalizeInputs, ScoringStore};
use crate::locks::CompetitionLocks;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a finalize call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeSummary {
    pub competition_id: CompetitionId,
    /// Result rows stored (one per participant and scoring type)
    pub rows_written: usize,
    /// Participants who finished
    pub finished: usize,
    /// Field size used for points allocation
    pub field_size: usize,
}

/// Results manager
#[derive(Clone)]
pub struct ResultsManager {
    store: Arc<dyn ScoringStore>,
    locks: CompetitionLocks,
}

impl ResultsManager {
    /// Create a new results manager
    ///
    /// # Arguments
    ///
    /// * `store` - Scoring store
    /// * `locks` - Lock registry shared with the score recorder
    pub fn new(store: Arc<dyn ScoringStore>, locks: CompetitionLocks) -> Self {
        Self { store, locks }
    }

    /// Compute and atomically store the result set of a competition
    ///
    /// Idempotent: unchanged inputs produce an identical stored set.
    ///
    /// # Errors
    ///
    /// * `FinalizeError::CompetitionNotFound` - Unknown competition
    /// * `FinalizeError::MissingPars` - Course has no par data
    /// * `FinalizeError::HoleCountMismatch` - A scorecard does not fit the course
    pub async fn finalize(&self, competition_id: CompetitionId) -> FinalizeResult<FinalizeSummary> {
        self.finalize_at(competition_id, Utc::now()).await
    }

    /// [`finalize`](Self::finalize) with an explicit clock
    pub async fn finalize_at(
        &self,
        competition_id: CompetitionId,
        now: DateTime<Utc>,
    ) -> FinalizeResult<FinalizeSummary> {
        let _guard = self.locks.acquire(competition_id).await;

        let mut outcome = None;
        let found = self
            .store
            .rebuild_results(
                competition_id,
                Box::new(|inputs: &FinalizeInputs| {
                    let built = build_results(
                        &inputs.competition,
                        &inputs.participants,
                        inputs.active_enrollments,
                        now,
                    );
                    match built {
                        Ok((results, summary)) => {
                            outcome = Some(Ok(summary));
                            Some(results)
                        }
                        Err(e) => {
                            outcome = Some(Err(e));
                            None
                        }
                    }
                }),
            )
            .await?;
        if !found {
            return Err(FinalizeError::CompetitionNotFound(competition_id));
        }

        let summary = outcome
            .ok_or(FinalizeError::CompetitionNotFound(competition_id))?
            .inspect_err(|e| {
                log::warn!("Finalize of competition {} aborted: {}", competition_id, e);
            })?;

        log::info!(
            "Finalized competition {}: {} rows, {} finished, field size {}",
            competition_id,
            summary.rows_written,
            summary.finished,
            summary.field_size
        );
        Ok(summary)
    }

    /// Stored result rows of a competition
    pub async fn results(
        &self,
        competition_id: CompetitionId,
    ) -> FinalizeResult<Vec<CompetitionResult>> {
        Ok(self.store.competition_results(competition_id).await?)
    }
}

/// Build the complete result set for a competition without touching storage
///
/// # Arguments
///
/// * `competition` - Competition with course pars and points settings
/// * `participants` - Every participant with their scorecard
/// * `active_enrollments` - Enrollment count for field size, when known
/// * `now` - Clock used for open-window checks
pub fn build_results(
    competition: &Competition,
    participants: &[Participant],
    active_enrollments: Option<usize>,
    now: DateTime<Utc>,
) -> FinalizeResult<(Vec<CompetitionResult>, FinalizeSummary)> {
    let scores = finalize_field(competition, participants, now)?;
    let finished = scores.iter().filter(|s| s.finished).count();
    let field = field_size(active_enrollments, finished);

    let scoring_types = competition.scoring_mode.scoring_types();
    let mut results = Vec::with_capacity(scores.len() * scoring_types.len());
    for &scoring_type in scoring_types {
        for ranked in rank(&scores, scoring_type) {
            let points = compute_points(
                ranked.position,
                field,
                competition.points_template.as_ref(),
                competition.points_multiplier,
            );
            let score = ranked.score;
            results.push(CompetitionResult {
                competition_id: competition.id,
                participant_id: score.participant_id,
                entity_id: score.entity_id,
                entity_name: score.entity_name,
                position: ranked.position,
                points,
                gross_score: score.gross_score,
                net_score: score.net_score,
                relative_to_par: score.relative_to_par,
                scoring_type,
            });
        }
    }

    let summary = FinalizeSummary {
        competition_id: competition.id,
        rows_written: results.len(),
        finished,
        field_size: field,
    };
    Ok((results, summary))
}
