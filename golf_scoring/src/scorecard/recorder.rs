//! Score recorder owning hole-by-hole and manual score mutations.

use super::{
    errors::{ScoreError, ScoreResult},
    models::{HoleScore, ManualScoreUpdate, ScoreCard},
};
use crate::competition::{Participant, ParticipantId};
use crate::db::ScoringStore;
use crate::locks::CompetitionLocks;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Score recorder
#[derive(Clone)]
pub struct ScoreRecorder {
    store: Arc<dyn ScoringStore>,
    locks: CompetitionLocks,
}

impl ScoreRecorder {
    /// Create a new score recorder
    ///
    /// # Arguments
    ///
    /// * `store` - Scoring store
    /// * `locks` - Lock registry shared with the results manager
    pub fn new(store: Arc<dyn ScoringStore>, locks: CompetitionLocks) -> Self {
        Self { store, locks }
    }

    /// Record the shots taken on one hole
    ///
    /// # Arguments
    ///
    /// * `participant_id` - Participant ID
    /// * `hole` - 1-based hole number
    /// * `shots` - Strokes (`> 0`), `0` to clear the hole, `-1` to give up
    ///
    /// # Returns
    ///
    /// * `ScoreResult<ScoreCard>` - Updated scorecard or error
    ///
    /// # Errors
    ///
    /// * `ScoreError::InvalidHole` - Hole outside the course
    /// * `ScoreError::InvalidShots` - Shots below -1
    /// * `ScoreError::Locked` - Scorecard is locked
    pub async fn record_hole_score(
        &self,
        participant_id: ParticipantId,
        hole: usize,
        shots: i32,
    ) -> ScoreResult<ScoreCard> {
        self.record_hole_score_at(participant_id, hole, shots, Utc::now())
            .await
    }

    /// [`record_hole_score`](Self::record_hole_score) with an explicit clock
    pub async fn record_hole_score_at(
        &self,
        participant_id: ParticipantId,
        hole: usize,
        shots: i32,
        now: DateTime<Utc>,
    ) -> ScoreResult<ScoreCard> {
        let score = HoleScore::try_from(shots).map_err(|_| ScoreError::InvalidShots(shots));

        // Fetched ahead of the critical section; a snapshot, once taken, is never removed
        let current = self.participant(participant_id).await?;
        let handicap = match score {
            Ok(HoleScore::Strokes(_)) if current.scorecard.handicap_snapshot.is_none() => {
                self.store.player_handicap(&current).await?.preferred()
            }
            _ => None,
        };

        let card = self
            .edit_card(current, move |participant| {
                let card = &mut participant.scorecard;
                if !card.is_valid_hole(hole) {
                    return Err(ScoreError::InvalidHole {
                        hole,
                        hole_count: card.hole_count(),
                    });
                }
                let score = score?;
                if card.locked {
                    return Err(ScoreError::Locked(participant_id));
                }

                if card.needs_handicap_snapshot(score)
                    && let Some(value) = handicap
                {
                    card.capture_handicap(value, now);
                    log::debug!(
                        "Captured handicap {} for participant {}",
                        value,
                        participant_id
                    );
                }

                card.set_hole(hole, score);
                Ok(())
            })
            .await?;

        log::debug!(
            "Participant {} hole {} recorded as {}",
            participant_id,
            hole,
            shots
        );
        Ok(card)
    }

    /// Record manual totals overriding hole-by-hole data
    ///
    /// `total` is always written; `out` and `in_` only when provided.
    ///
    /// # Errors
    ///
    /// * `ScoreError::InvalidManualField` - A negative value was supplied
    /// * `ScoreError::Locked` - Scorecard is locked
    pub async fn record_manual_score(
        &self,
        participant_id: ParticipantId,
        update: ManualScoreUpdate,
    ) -> ScoreResult<ScoreCard> {
        let out = update
            .out
            .map(|value| validate_manual("out", value))
            .transpose()?;
        let in_ = update
            .in_
            .map(|value| validate_manual("in", value))
            .transpose()?;
        let total = validate_manual("total", update.total)?;

        let current = self.participant(participant_id).await?;
        let card = self
            .edit_card(current, move |participant| {
                if participant.scorecard.locked {
                    return Err(ScoreError::Locked(participant_id));
                }

                let manual = &mut participant.scorecard.manual;
                if let Some(out) = out {
                    manual.out = out;
                }
                if let Some(in_) = in_ {
                    manual.in_ = in_;
                }
                manual.total = total;
                Ok(())
            })
            .await?;

        log::debug!(
            "Participant {} manual score set to {:?}",
            participant_id,
            card.manual
        );
        Ok(card)
    }

    /// Lock a scorecard against further score changes
    pub async fn lock(&self, participant_id: ParticipantId) -> ScoreResult<ScoreCard> {
        self.lock_at(participant_id, Utc::now()).await
    }

    /// [`lock`](Self::lock) with an explicit clock
    pub async fn lock_at(
        &self,
        participant_id: ParticipantId,
        now: DateTime<Utc>,
    ) -> ScoreResult<ScoreCard> {
        self.update_card(participant_id, move |card| card.lock(now))
            .await
    }

    /// Unlock a scorecard
    pub async fn unlock(&self, participant_id: ParticipantId) -> ScoreResult<ScoreCard> {
        self.update_card(participant_id, ScoreCard::unlock).await
    }

    /// Set or clear disqualification. Stored scores are left as they are.
    pub async fn set_disqualified(
        &self,
        participant_id: ParticipantId,
        disqualified: bool,
    ) -> ScoreResult<ScoreCard> {
        self.update_card(participant_id, move |card| card.disqualified = disqualified)
            .await
    }

    async fn update_card<F>(
        &self,
        participant_id: ParticipantId,
        apply: F,
    ) -> ScoreResult<ScoreCard>
    where
        F: FnOnce(&mut ScoreCard) + Send,
    {
        let current = self.participant(participant_id).await?;
        self.edit_card(current, move |participant| {
            apply(&mut participant.scorecard);
            Ok(())
        })
        .await
    }

    async fn participant(&self, participant_id: ParticipantId) -> ScoreResult<Participant> {
        self.store
            .get_participant(participant_id)
            .await?
            .ok_or(ScoreError::ParticipantNotFound(participant_id))
    }

    /// Apply `apply` to a fresh copy of the participant inside the
    /// competition's critical section and store the result.
    ///
    /// The in-process guard orders callers sharing `locks`; the store's
    /// `edit_scorecard` serializes against every other client.
    async fn edit_card<F>(&self, current: Participant, apply: F) -> ScoreResult<ScoreCard>
    where
        F: FnOnce(&mut Participant) -> ScoreResult<()> + Send,
    {
        let participant_id = current.id;
        let _guard = self.locks.acquire(current.competition_id).await;

        let mut outcome = Ok(());
        let edited = self
            .store
            .edit_scorecard(
                participant_id,
                Box::new(|participant: &mut Participant| {
                    outcome = apply(participant);
                    outcome.is_ok()
                }),
            )
            .await?;
        outcome?;

        edited
            .map(|participant| participant.scorecard)
            .ok_or(ScoreError::ParticipantNotFound(participant_id))
    }
}

fn validate_manual(field: &'static str, value: Option<i32>) -> ScoreResult<Option<u32>> {
    value
        .map(|v| u32::try_from(v).map_err(|_| ScoreError::InvalidManualField { field, value: v }))
        .transpose()
}
