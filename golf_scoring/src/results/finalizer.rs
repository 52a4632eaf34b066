//! Per-participant result computation.
//!
//! Everything here is recomputed from scorecards and course pars on every
//! finalize; previously stored result rows are never consulted.

use super::errors::{FinalizeError, FinalizeResult};
use crate::competition::{Competition, EntityId, Participant, ParticipantId, ScoringType, StartMode};
use crate::scorecard::ScoreCard;
use chrono::{DateTime, Utc};

/// Computed score of one participant, before ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedScore {
    pub participant_id: ParticipantId,
    pub entity_id: EntityId,
    pub entity_name: String,
    pub finished: bool,
    pub gross_score: i32,
    pub net_score: Option<i32>,
    pub relative_to_par: i32,
    /// Rounded handicap snapshot, when one was captured
    pub strokes_received: Option<i32>,
}

impl FinalizedScore {
    /// Sort key for ranking under the given scoring type; lower is better.
    ///
    /// Net ranking subtracts the rounded handicap snapshot from the gross
    /// relative-to-par, treating a missing snapshot as scratch.
    pub fn ranking_key(&self, scoring_type: ScoringType) -> i32 {
        match scoring_type {
            ScoringType::Gross => self.relative_to_par,
            ScoringType::Net => self.relative_to_par - self.strokes_received.unwrap_or(0),
        }
    }
}

/// Whether a scorecard counts as a finished round at `now`
pub fn is_finished(card: &ScoreCard, competition: &Competition, now: DateTime<Utc>) -> bool {
    if card.disqualified {
        return false;
    }
    if card.manual_total().is_some() {
        return true;
    }

    let complete = card.holes_played() == competition.hole_count() && !card.gave_up();
    let closed = match competition.start_mode {
        StartMode::Open => competition.is_open_window_closed(now),
        StartMode::Scheduled => card.locked,
    };
    complete && closed
}

/// Compute gross, net and relative-to-par for one participant
pub fn finalize_participant(
    competition: &Competition,
    participant: &Participant,
    now: DateTime<Utc>,
) -> FinalizeResult<FinalizedScore> {
    let card = &participant.scorecard;
    if card.hole_count() != competition.hole_count() {
        return Err(FinalizeError::HoleCountMismatch {
            participant_id: participant.id,
            expected: competition.hole_count(),
            actual: card.hole_count(),
        });
    }

    let (gross_score, relative_to_par) = match card.manual_total() {
        Some(total) => {
            let gross = total as i32;
            (gross, gross - competition.total_par())
        }
        None if card.gave_up() => (0, 0),
        None => {
            let gross = card.stroke_total() as i32;
            (gross, gross - card.par_of_scored_holes(&competition.pars))
        }
    };

    let finished = is_finished(card, competition, now);
    let strokes_received = card.handicap_snapshot.map(|s| s.strokes_received());
    let net_score = if finished {
        strokes_received.map(|strokes| gross_score - strokes)
    } else {
        None
    };

    Ok(FinalizedScore {
        participant_id: participant.id,
        entity_id: participant.entity_id,
        entity_name: participant.entity_name.clone(),
        finished,
        gross_score,
        net_score,
        relative_to_par,
        strokes_received,
    })
}

/// Compute scores for a competition's whole field
///
/// # Errors
///
/// * `FinalizeError::MissingPars` - Course has no par data
/// * `FinalizeError::HoleCountMismatch` - A scorecard does not fit the course
pub fn finalize_field(
    competition: &Competition,
    participants: &[Participant],
    now: DateTime<Utc>,
) -> FinalizeResult<Vec<FinalizedScore>> {
    if competition.pars.is_empty() {
        return Err(FinalizeError::MissingPars(competition.id));
    }

    participants
        .iter()
        .map(|p| finalize_participant(competition, p, now))
        .collect()
}
