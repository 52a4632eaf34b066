//! Repository trait definitions for testability and dependency injection.
//!
//! The engine reads competitions, participants and handicaps through these
//! traits and writes scorecards and finalized result sets back. Both
//! [`PgScoringStore`](super::PgScoringStore) and
//! [`MemoryScoringStore`](super::MemoryScoringStore) implement all of them.
//!
//! [`ParticipantRepository::edit_scorecard`] and
//! [`ResultRepository::rebuild_results`] run their whole read-modify-write
//! while the store holds the competition exclusively. For PostgreSQL that is
//! a row lock on the competition, so separate processes serialize too.

use async_trait::async_trait;

use super::errors::StoreResult;
use crate::competition::{
    Competition, CompetitionId, CompetitionResult, Participant, ParticipantId, ScoringType,
    StandingsScope,
};
use crate::scorecard::{PlayerHandicap, ScoreCard};

/// Change applied to a freshly loaded participant. Returning `false`
/// discards it and leaves the stored card untouched.
pub type ScorecardEdit<'a> = Box<dyn FnOnce(&mut Participant) -> bool + Send + 'a>;

/// Everything a result set is computed from
#[derive(Debug, Clone)]
pub struct FinalizeInputs {
    pub competition: Competition,
    pub participants: Vec<Participant>,
    /// Active enrollments counting towards field size, when known
    pub active_enrollments: Option<usize>,
}

/// Computes a result set from [`FinalizeInputs`]. `None` aborts the rebuild
/// and keeps the stored set.
pub type ResultBuild<'a> =
    Box<dyn FnOnce(&FinalizeInputs) -> Option<Vec<CompetitionResult>> + Send + 'a>;

/// Trait for competition lookups
#[async_trait]
pub trait CompetitionRepository: Send + Sync {
    /// Find competition by ID
    async fn get_competition(&self, id: CompetitionId) -> StoreResult<Option<Competition>>;

    /// All competitions in a series or tour, ordered by start time
    async fn competitions_in_scope(&self, scope: StandingsScope) -> StoreResult<Vec<Competition>>;
}

/// Trait for participant and scorecard operations
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find participant by ID
    async fn get_participant(&self, id: ParticipantId) -> StoreResult<Option<Participant>>;

    /// All participants of a competition
    async fn list_participants(&self, competition_id: CompetitionId)
    -> StoreResult<Vec<Participant>>;

    /// Persist a participant's scorecard
    async fn save_scorecard(&self, participant_id: ParticipantId, card: &ScoreCard)
    -> StoreResult<()>;

    /// Load a participant, apply `edit` and save the card while its
    /// competition is held exclusively.
    ///
    /// Returns the participant as stored afterwards, or `None` when it does
    /// not exist.
    async fn edit_scorecard(
        &self,
        participant_id: ParticipantId,
        edit: ScorecardEdit<'_>,
    ) -> StoreResult<Option<Participant>>;
}

/// Trait for finalized result storage
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Atomically replace every result row of a competition and mark it
    /// finalized. Readers observe either the previous set or the new one.
    async fn replace_results(
        &self,
        competition_id: CompetitionId,
        results: Vec<CompetitionResult>,
    ) -> StoreResult<()>;

    /// Read a competition's inputs, build its result set and replace the
    /// stored one, all while the competition is held exclusively.
    ///
    /// Returns false when the competition does not exist.
    async fn rebuild_results(
        &self,
        competition_id: CompetitionId,
        build: ResultBuild<'_>,
    ) -> StoreResult<bool>;

    /// Result rows of one competition
    async fn competition_results(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<CompetitionResult>>;

    /// Result rows of every finalized competition in scope
    async fn scope_results(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
    ) -> StoreResult<Vec<CompetitionResult>>;
}

/// Trait for registration data owned by the enrollment system
#[async_trait]
pub trait EnrollmentDirectory: Send + Sync {
    /// Current handicaps of the player behind a participant
    async fn player_handicap(&self, participant: &Participant) -> StoreResult<PlayerHandicap>;

    /// Active enrollments counting towards a competition's field size
    async fn active_enrollment_count(&self, competition: &Competition)
    -> StoreResult<Option<usize>>;
}

/// Everything the scoring engine needs from storage
pub trait ScoringStore:
    CompetitionRepository + ParticipantRepository + ResultRepository + EnrollmentDirectory
{
}

impl<T> ScoringStore for T where
    T: CompetitionRepository + ParticipantRepository + ResultRepository + EnrollmentDirectory
{
}
