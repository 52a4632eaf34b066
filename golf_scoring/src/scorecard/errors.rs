//! Scorecard error types.

use crate::competition::ParticipantId;
use crate::db::StoreError;
use thiserror::Error;

/// Score recording errors
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Hole number outside `1..=hole_count`
    #[error("Invalid hole {hole}: course has {hole_count} holes")]
    InvalidHole { hole: usize, hole_count: usize },

    /// Shots value that is neither strokes, 0 nor -1
    #[error("Invalid shots value: {0}")]
    InvalidShots(i32),

    /// Negative manual score field
    #[error("Invalid manual score {field}: {value}")]
    InvalidManualField { field: &'static str, value: i32 },

    /// Participant not found
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Scorecard is locked
    #[error("Scorecard for participant {0} is locked")]
    Locked(ParticipantId),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ScoreError {
    /// Whether the caller can correct the input and retry
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScoreError::InvalidHole { .. }
                | ScoreError::InvalidShots(_)
                | ScoreError::InvalidManualField { .. }
        )
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            ScoreError::Store(_) => "Internal server error".to_string(),
            ScoreError::ParticipantNotFound(_) => "Participant not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for score recording operations
pub type ScoreResult<T> = Result<T, ScoreError>;
