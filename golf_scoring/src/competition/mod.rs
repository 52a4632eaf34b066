//! Competition configuration, participants and finalized result rows.

pub mod models;

pub use models::{
    Competition, CompetitionId, CompetitionResult, EntityId, Participant, ParticipantId,
    PlayerId, PointsTemplate, ScoringMode, ScoringType, SeriesId, StandingsScope, StartMode,
    TourId,
};
