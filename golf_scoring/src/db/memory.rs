//! In-process scoring store.
//!
//! Holds every table in memory behind one async `RwLock`. Result sets are
//! stored as shared slices and swapped whole, so a reader sees either the
//! previous set or the new one.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::repository::{
    CompetitionRepository, EnrollmentDirectory, FinalizeInputs, ParticipantRepository,
    ResultBuild, ResultRepository, ScorecardEdit,
};
use crate::competition::{
    Competition, CompetitionId, CompetitionResult, Participant, ParticipantId, PlayerId,
    ScoringType, StandingsScope, TourId,
};
use crate::scorecard::{PlayerHandicap, ScoreCard};

#[derive(Default)]
struct State {
    competitions: BTreeMap<CompetitionId, Competition>,
    participants: BTreeMap<ParticipantId, Participant>,
    results: HashMap<CompetitionId, Arc<[CompetitionResult]>>,
    base_handicaps: HashMap<PlayerId, f64>,
    tour_handicaps: HashMap<(TourId, PlayerId), f64>,
    tour_enrollments: HashMap<TourId, usize>,
}

impl State {
    fn store_results(
        &mut self,
        competition_id: CompetitionId,
        results: Vec<CompetitionResult>,
    ) -> StoreResult<()> {
        if let Some(row) = results.iter().find(|r| r.competition_id != competition_id) {
            return Err(StoreError::Corrupt(format!(
                "result row for competition {} in set for {}",
                row.competition_id, competition_id
            )));
        }

        let competition = self.competitions.get_mut(&competition_id).ok_or_else(|| {
            StoreError::Corrupt(format!("competition {} does not exist", competition_id))
        })?;
        competition.results_finalized = true;
        self.results.insert(competition_id, results.into());
        Ok(())
    }
}

/// Scoring store kept entirely in memory
#[derive(Clone, Default)]
pub struct MemoryScoringStore {
    state: Arc<RwLock<State>>,
}

impl MemoryScoringStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a competition
    pub async fn insert_competition(&self, competition: Competition) {
        let mut state = self.state.write().await;
        state.competitions.insert(competition.id, competition);
    }

    /// Insert or replace a participant
    pub async fn insert_participant(&self, participant: Participant) {
        let mut state = self.state.write().await;
        state.participants.insert(participant.id, participant);
    }

    /// Change a competition's course pars, returning false for unknown IDs
    pub async fn set_pars(&self, competition_id: CompetitionId, pars: Vec<u8>) -> bool {
        let mut state = self.state.write().await;
        match state.competitions.get_mut(&competition_id) {
            Some(competition) => {
                competition.pars = pars;
                true
            }
            None => false,
        }
    }

    /// Set a player's base handicap index
    pub async fn set_base_handicap(&self, player_id: PlayerId, handicap: f64) {
        let mut state = self.state.write().await;
        state.base_handicaps.insert(player_id, handicap);
    }

    /// Set a player's playing handicap on a tour
    pub async fn set_tour_handicap(&self, tour_id: TourId, player_id: PlayerId, handicap: f64) {
        let mut state = self.state.write().await;
        state.tour_handicaps.insert((tour_id, player_id), handicap);
    }

    /// Set the number of active enrollments on a tour
    pub async fn set_active_enrollments(&self, tour_id: TourId, count: usize) {
        let mut state = self.state.write().await;
        state.tour_enrollments.insert(tour_id, count);
    }
}

#[async_trait]
impl CompetitionRepository for MemoryScoringStore {
    async fn get_competition(&self, id: CompetitionId) -> StoreResult<Option<Competition>> {
        Ok(self.state.read().await.competitions.get(&id).cloned())
    }

    async fn competitions_in_scope(&self, scope: StandingsScope) -> StoreResult<Vec<Competition>> {
        let state = self.state.read().await;
        let mut competitions: Vec<Competition> = state
            .competitions
            .values()
            .filter(|c| c.in_scope(scope))
            .cloned()
            .collect();
        competitions.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
        Ok(competitions)
    }
}

#[async_trait]
impl ParticipantRepository for MemoryScoringStore {
    async fn get_participant(&self, id: ParticipantId) -> StoreResult<Option<Participant>> {
        Ok(self.state.read().await.participants.get(&id).cloned())
    }

    async fn list_participants(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<Participant>> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .values()
            .filter(|p| p.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn save_scorecard(
        &self,
        participant_id: ParticipantId,
        card: &ScoreCard,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let participant = state.participants.get_mut(&participant_id).ok_or_else(|| {
            StoreError::Corrupt(format!("participant {} does not exist", participant_id))
        })?;
        participant.scorecard = card.clone();
        Ok(())
    }

    async fn edit_scorecard(
        &self,
        participant_id: ParticipantId,
        edit: ScorecardEdit<'_>,
    ) -> StoreResult<Option<Participant>> {
        let mut state = self.state.write().await;
        let Some(stored) = state.participants.get_mut(&participant_id) else {
            return Ok(None);
        };

        let mut participant = stored.clone();
        if edit(&mut participant) {
            stored.scorecard = participant.scorecard;
        }
        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl ResultRepository for MemoryScoringStore {
    async fn replace_results(
        &self,
        competition_id: CompetitionId,
        results: Vec<CompetitionResult>,
    ) -> StoreResult<()> {
        self.state
            .write()
            .await
            .store_results(competition_id, results)
    }

    async fn rebuild_results(
        &self,
        competition_id: CompetitionId,
        build: ResultBuild<'_>,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let Some(competition) = state.competitions.get(&competition_id).cloned() else {
            return Ok(false);
        };

        let inputs = FinalizeInputs {
            participants: state
                .participants
                .values()
                .filter(|p| p.competition_id == competition_id)
                .cloned()
                .collect(),
            active_enrollments: competition
                .tour_id
                .and_then(|tour_id| state.tour_enrollments.get(&tour_id))
                .copied(),
            competition,
        };

        if let Some(results) = build(&inputs) {
            state.store_results(competition_id, results)?;
        }
        Ok(true)
    }

    async fn competition_results(
        &self,
        competition_id: CompetitionId,
    ) -> StoreResult<Vec<CompetitionResult>> {
        let state = self.state.read().await;
        Ok(state
            .results
            .get(&competition_id)
            .map(|rows| rows.to_vec())
            .unwrap_or_default())
    }

    async fn scope_results(
        &self,
        scope: StandingsScope,
        scoring_type: ScoringType,
    ) -> StoreResult<Vec<CompetitionResult>> {
        let state = self.state.read().await;
        let rows = state
            .competitions
            .values()
            .filter(|c| c.in_scope(scope) && c.results_finalized)
            .filter_map(|c| state.results.get(&c.id))
            .flat_map(|rows| rows.iter())
            .filter(|row| row.scoring_type == scoring_type)
            .cloned()
            .collect();
        Ok(rows)
    }
}

#[async_trait]
impl EnrollmentDirectory for MemoryScoringStore {
    async fn player_handicap(&self, participant: &Participant) -> StoreResult<PlayerHandicap> {
        let Some(player_id) = participant.player_id else {
            return Ok(PlayerHandicap::default());
        };

        let state = self.state.read().await;
        let tour_id = state
            .competitions
            .get(&participant.competition_id)
            .and_then(|c| c.tour_id);
        Ok(PlayerHandicap {
            base: state.base_handicaps.get(&player_id).copied(),
            tour_playing: tour_id
                .and_then(|tour_id| state.tour_handicaps.get(&(tour_id, player_id)))
                .copied(),
        })
    }

    async fn active_enrollment_count(
        &self,
        competition: &Competition,
    ) -> StoreResult<Option<usize>> {
        let state = self.state.read().await;
        Ok(competition
            .tour_id
            .and_then(|tour_id| state.tour_enrollments.get(&tour_id))
            .copied())
    }
}
