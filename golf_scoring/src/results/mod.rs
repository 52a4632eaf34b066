//! Finalizing competitions: scores, ranking and points.
//!
//! Finalize runs as a pipeline over freshly loaded scorecards:
//! - [`finalizer`] computes gross, net, relative-to-par and finish eligibility
//! - [`ranking`] orders finishers and assigns tie-sharing positions
//! - [`points`] converts positions into points
//! - [`manager`] serializes finalize per competition and stores the full
//!   result set in one atomic replace
//!
//! ## Example
//!
//! ```no_run
//! use golf_scoring::db::{Database, PgScoringStore};
//! use golf_scoring::locks::CompetitionLocks;
//! use golf_scoring::results::ResultsManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let store = Arc::new(PgScoringStore::new(db.pool().clone()));
//!     let results = ResultsManager::new(store, CompetitionLocks::new());
//!
//!     let summary = results.finalize(3).await?;
//!     println!("{} finishers", summary.finished);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod finalizer;
pub mod manager;
pub mod points;
pub mod ranking;

pub use errors::{FinalizeError, FinalizeResult};
pub use finalizer::{FinalizedScore, finalize_field, finalize_participant, is_finished};
pub use manager::{FinalizeSummary, ResultsManager, build_results};
pub use points::{DEFAULT_POINTS_MULTIPLIER, base_points, compute_points, field_size};
pub use ranking::{RankedScore, competition_positions, rank, tie_groups};
