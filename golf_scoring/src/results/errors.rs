//! Finalize error types.

use crate::competition::{CompetitionId, ParticipantId};
use crate::db::StoreError;
use thiserror::Error;

/// Finalize errors. Any of these aborts the whole finalize and leaves the
/// previously stored result set untouched.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Competition not found: {0}")]
    CompetitionNotFound(CompetitionId),

    #[error("Competition {0} has no course par data")]
    MissingPars(CompetitionId),

    #[error("Scorecard of participant {participant_id} has {actual} holes, course has {expected}")]
    HoleCountMismatch {
        participant_id: ParticipantId,
        expected: usize,
        actual: usize,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl FinalizeError {
    /// Whether the failure comes from missing or inconsistent input data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FinalizeError::MissingPars(_) | FinalizeError::HoleCountMismatch { .. }
        )
    }
}

pub type FinalizeResult<T> = Result<T, FinalizeError>;
