//! Scorecards and the score recorder.
//!
//! This module provides:
//! - A tagged hole score type replacing the `0` / `-1` stored sentinels
//! - Manual totals overriding hole-by-hole data
//! - Lock and disqualification state
//! - Handicap snapshots frozen on the first recorded stroke
//!
//! ## Example
//!
//! ```no_run
//! use golf_scoring::db::{Database, PgScoringStore};
//! use golf_scoring::locks::CompetitionLocks;
//! use golf_scoring::scorecard::ScoreRecorder;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let store = Arc::new(PgScoringStore::new(db.pool().clone()));
//!     let recorder = ScoreRecorder::new(store, CompetitionLocks::new());
//!
//!     // Participant 7 took four shots on the first hole
//!     let card = recorder.record_hole_score(7, 1, 4).await?;
//!     println!("Holes played: {}", card.holes_played());
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod recorder;

pub use errors::{ScoreError, ScoreResult};
pub use models::{
    HandicapSnapshot, HoleOutcome, HoleScore, InvalidHoleValue, ManualScore, ManualScoreUpdate,
    PlayerHandicap, ScoreCard,
};
pub use recorder::ScoreRecorder;
