//! Multi-competition standings for series (teams) and tours (players).
//!
//! Standings are derived on demand from finalized result rows and never
//! stored.

pub mod aggregator;
pub mod manager;
pub mod models;

pub use aggregator::{aggregate, breakdown};
pub use manager::{StandingsError, StandingsManager, StandingsResult};
pub use models::{CompetitionBreakdown, ParticipationStatus, StandingEntry, Standings};
