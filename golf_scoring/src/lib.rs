//! # Golf Scoring
//!
//! Scoring and standings engine for golf competitions.
//!
//! Participants (players or teams) record hole-by-hole strokes on a
//! scorecard. When a competition is finalized every participant is ranked
//! by score relative to par, points are allocated from the ranking, and the
//! full result set replaces the previous one in a single atomic write.
//! Standings for a series (teams) or tour (players) are summed on demand
//! from finalized results.
//!
//! ## Core Modules
//!
//! - [`scorecard`]: Hole scores, manual totals, locking and handicap capture
//! - [`competition`]: Competitions, participants, result rows and scopes
//! - [`results`]: Finalization, ranking and points allocation
//! - [`standings`]: Series and tour standings with per-competition breakdowns
//! - [`db`]: Repository traits with PostgreSQL and in-memory stores
//!
//! ## Example
//!
//! ```
//! use golf_scoring::results::rank;
//! use golf_scoring::{FinalizedScore, ScoringType};
//!
//! let score = |id, name: &str, relative| FinalizedScore {
//!     participant_id: id,
//!     entity_id: id,
//!     entity_name: name.to_string(),
//!     finished: true,
//!     gross_score: 72 + relative,
//!     net_score: None,
//!     relative_to_par: relative,
//!     strokes_received: None,
//! };
//!
//! let ranked = rank(
//!     &[score(1, "Ann", 2), score(2, "Bo", -1), score(3, "Cy", 2)],
//!     ScoringType::Gross,
//! );
//! let positions: Vec<u32> = ranked.iter().map(|r| r.position).collect();
//! assert_eq!(positions, vec![1, 2, 2]);
//! ```

/// Competition, participant and result data models.
pub mod competition;
pub use competition::{
    Competition, CompetitionId, CompetitionResult, EntityId, Participant, ParticipantId,
    PointsTemplate, ScoringMode, ScoringType, StandingsScope, StartMode,
};

/// Storage traits and implementations.
pub mod db;
pub use db::{Database, DatabaseConfig, MemoryScoringStore, PgScoringStore, ScoringStore};

/// Per-competition serialization of finalize and score mutations.
pub mod locks;
pub use locks::CompetitionLocks;

/// Competition finalization.
pub mod results;
pub use results::{FinalizeError, FinalizeSummary, FinalizedScore, ResultsManager};

/// Scorecards and score recording.
pub mod scorecard;
pub use scorecard::{HoleScore, ScoreCard, ScoreError, ScoreRecorder};

/// Series and tour standings.
pub mod standings;
pub use standings::{StandingEntry, Standings, StandingsError, StandingsManager};
