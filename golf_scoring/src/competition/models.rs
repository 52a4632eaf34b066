//! Competition, participant and result data models.

use crate::scorecard::ScoreCard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Competition ID type
pub type CompetitionId = i64;

/// Participant ID type (one player or team entry within one competition)
pub type ParticipantId = i64;

/// Entity ID type (the team or player a participant represents)
pub type EntityId = i64;

/// Series ID type (team aggregation scope)
pub type SeriesId = i64;

/// Tour ID type (player aggregation scope)
pub type TourId = i64;

/// Player ID type
pub type PlayerId = i64;

/// How players start a competition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Tee times are scheduled; a round counts once its card is locked
    Scheduled,
    /// Players start any time inside an open window
    Open,
}

impl std::fmt::Display for StartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartMode::Scheduled => write!(f, "scheduled"),
            StartMode::Open => write!(f, "open"),
        }
    }
}

impl FromStr for StartMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(StartMode::Scheduled),
            "open" => Ok(StartMode::Open),
            other => Err(format!("unknown start mode '{other}'")),
        }
    }
}

/// Kind of score a result row is ranked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    Gross,
    Net,
}

impl std::fmt::Display for ScoringType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringType::Gross => write!(f, "gross"),
            ScoringType::Net => write!(f, "net"),
        }
    }
}

impl FromStr for ScoringType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gross" => Ok(ScoringType::Gross),
            "net" => Ok(ScoringType::Net),
            other => Err(format!("unknown scoring type '{other}'")),
        }
    }
}

/// Which result sets a competition produces when finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Gross,
    Net,
    Both,
}

impl ScoringMode {
    /// Scoring types finalized for this mode, gross first
    pub fn scoring_types(self) -> &'static [ScoringType] {
        match self {
            ScoringMode::Gross => &[ScoringType::Gross],
            ScoringMode::Net => &[ScoringType::Net],
            ScoringMode::Both => &[ScoringType::Gross, ScoringType::Net],
        }
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::Gross => write!(f, "gross"),
            ScoringMode::Net => write!(f, "net"),
            ScoringMode::Both => write!(f, "both"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gross" => Ok(ScoringMode::Gross),
            "net" => Ok(ScoringMode::Net),
            "both" => Ok(ScoringMode::Both),
            other => Err(format!("unknown scoring mode '{other}'")),
        }
    }
}

/// Position-to-points configuration overriding the built-in formula.
///
/// Keys are 1-based positions rendered as strings, matching how templates
/// are authored and stored. The engine only ever reads a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsTemplate {
    /// Template name
    pub name: String,
    /// Points keyed by position ("1", "2", ...)
    pub points: BTreeMap<String, i64>,
    /// Fallback for positions not listed
    pub default: Option<i64>,
}

impl PointsTemplate {
    /// Create a template from `(position, points)` pairs
    pub fn new(name: impl Into<String>, points: &[(u32, i64)], default: Option<i64>) -> Self {
        Self {
            name: name.into(),
            points: points
                .iter()
                .map(|(position, pts)| (position.to_string(), *pts))
                .collect(),
            default,
        }
    }

    /// Points for a 1-based position, falling back to `default`, then 0
    pub fn points_for(&self, position: u32) -> i64 {
        self.points
            .get(&position.to_string())
            .copied()
            .or(self.default)
            .unwrap_or(0)
    }
}

/// Competition configuration and course data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    /// Competition ID
    pub id: CompetitionId,
    /// Display name
    pub name: String,
    /// Series this competition counts towards (team standings)
    pub series_id: Option<SeriesId>,
    /// Tour this competition counts towards (player standings)
    pub tour_id: Option<TourId>,
    /// Scheduled start / competition date
    pub starts_at: DateTime<Utc>,
    /// Start mode
    pub start_mode: StartMode,
    /// End of the open window (open start mode only)
    pub open_until: Option<DateTime<Utc>>,
    /// Per-hole par, in hole order
    pub pars: Vec<u8>,
    /// Multiplier applied to allocated points
    pub points_multiplier: f64,
    /// Optional points template
    pub points_template: Option<PointsTemplate>,
    /// Result sets produced on finalize
    pub scoring_mode: ScoringMode,
    /// Whether results have been finalized at least once
    pub results_finalized: bool,
}

impl Competition {
    /// Create a scheduled gross competition with default points settings
    pub fn scheduled(
        id: CompetitionId,
        name: impl Into<String>,
        pars: Vec<u8>,
        starts_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            series_id: None,
            tour_id: None,
            starts_at,
            start_mode: StartMode::Scheduled,
            open_until: None,
            pars,
            points_multiplier: 1.0,
            points_template: None,
            scoring_mode: ScoringMode::Gross,
            results_finalized: false,
        }
    }

    /// Create an open-start competition whose window closes at `open_until`
    pub fn open(
        id: CompetitionId,
        name: impl Into<String>,
        pars: Vec<u8>,
        starts_at: DateTime<Utc>,
        open_until: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            start_mode: StartMode::Open,
            open_until,
            ..Self::scheduled(id, name, pars, starts_at)
        }
    }

    /// Attach the competition to a series
    pub fn with_series(mut self, series_id: SeriesId) -> Self {
        self.series_id = Some(series_id);
        self
    }

    /// Attach the competition to a tour
    pub fn with_tour(mut self, tour_id: TourId) -> Self {
        self.tour_id = Some(tour_id);
        self
    }

    /// Use a points template instead of the built-in formula
    pub fn with_points_template(mut self, template: PointsTemplate) -> Self {
        self.points_template = Some(template);
        self
    }

    /// Set the points multiplier
    pub fn with_points_multiplier(mut self, multiplier: f64) -> Self {
        self.points_multiplier = multiplier;
        self
    }

    /// Set the scoring mode
    pub fn with_scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.scoring_mode = mode;
        self
    }

    /// Number of holes on the course
    pub fn hole_count(&self) -> usize {
        self.pars.len()
    }

    /// Par for the whole course
    pub fn total_par(&self) -> i32 {
        self.pars.iter().map(|&par| i32::from(par)).sum()
    }

    /// Whether an open window has ended at `now`.
    ///
    /// A window without an end time stays open indefinitely.
    pub fn is_open_window_closed(&self, now: DateTime<Utc>) -> bool {
        self.start_mode == StartMode::Open && self.open_until.is_some_and(|end| now >= end)
    }

    /// Whether the competition belongs to the given aggregation scope
    pub fn in_scope(&self, scope: StandingsScope) -> bool {
        match scope {
            StandingsScope::Series(id) => self.series_id == Some(id),
            StandingsScope::Tour(id) => self.tour_id == Some(id),
        }
    }
}

/// A player or team entry within one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Competition the entry belongs to
    pub competition_id: CompetitionId,
    /// Team or player the entry represents
    pub entity_id: EntityId,
    /// Team or player name
    pub entity_name: String,
    /// Player behind the entry, used for handicap lookup (None for teams)
    pub player_id: Option<PlayerId>,
    /// The entry's scorecard
    pub scorecard: ScoreCard,
}

impl Participant {
    /// Create a participant with an empty scorecard of `hole_count` holes
    pub fn new(
        id: ParticipantId,
        competition_id: CompetitionId,
        entity_id: EntityId,
        entity_name: impl Into<String>,
        hole_count: usize,
    ) -> Self {
        Self {
            id,
            competition_id,
            entity_id,
            entity_name: entity_name.into(),
            player_id: None,
            scorecard: ScoreCard::new(hole_count),
        }
    }

    /// Link the entry to a player for handicap capture
    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }
}

/// One finalized result row per (competition, participant, scoring type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub competition_id: CompetitionId,
    pub participant_id: ParticipantId,
    pub entity_id: EntityId,
    pub entity_name: String,
    /// Finishing position; 0 means the participant did not finish
    pub position: u32,
    pub points: i64,
    pub gross_score: i32,
    pub net_score: Option<i32>,
    pub relative_to_par: i32,
    pub scoring_type: ScoringType,
}

impl CompetitionResult {
    /// Whether the row belongs to a finisher
    pub fn is_finished(&self) -> bool {
        self.position > 0
    }
}

/// Aggregation scope for standings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum StandingsScope {
    /// Team standings across a series
    Series(SeriesId),
    /// Player standings across a tour
    Tour(TourId),
}

impl std::fmt::Display for StandingsScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandingsScope::Series(id) => write!(f, "series {id}"),
            StandingsScope::Tour(id) => write!(f, "tour {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_total_par_and_hole_count() {
        let comp = Competition::scheduled(1, "Spring Open", vec![4, 3, 5], start());
        assert_eq!(comp.hole_count(), 3);
        assert_eq!(comp.total_par(), 12);
    }

    #[test]
    fn test_open_window_closed_only_after_end() {
        let end = start() + Duration::hours(6);
        let comp = Competition::open(1, "Open Day", vec![4; 9], start(), Some(end));

        assert!(!comp.is_open_window_closed(end - Duration::seconds(1)));
        assert!(comp.is_open_window_closed(end));
        assert!(comp.is_open_window_closed(end + Duration::hours(1)));
    }

    #[test]
    fn test_open_window_without_end_never_closes() {
        let comp = Competition::open(1, "Open Day", vec![4; 9], start(), None);
        assert!(!comp.is_open_window_closed(start() + Duration::days(365)));
    }

    #[test]
    fn test_scheduled_competition_has_no_open_window() {
        let mut comp = Competition::scheduled(1, "Cup", vec![4; 9], start());
        comp.open_until = Some(start());
        assert!(!comp.is_open_window_closed(start() + Duration::days(1)));
    }

    #[test]
    fn test_points_template_lookup_and_default() {
        let template = PointsTemplate::new("Major", &[(1, 100), (2, 60), (3, 40)], Some(5));
        assert_eq!(template.points_for(1), 100);
        assert_eq!(template.points_for(3), 40);
        assert_eq!(template.points_for(17), 5);

        let no_default = PointsTemplate::new("Minor", &[(1, 10)], None);
        assert_eq!(no_default.points_for(2), 0);
    }

    #[test]
    fn test_points_template_deserializes_string_keys() {
        let json = r#"{"name":"T","points":{"1":25,"2":18},"default":1}"#;
        let template: PointsTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.points_for(2), 18);
        assert_eq!(template.points_for(9), 1);
    }

    #[test]
    fn test_scoring_mode_types() {
        assert_eq!(ScoringMode::Gross.scoring_types(), &[ScoringType::Gross]);
        assert_eq!(
            ScoringMode::Both.scoring_types(),
            &[ScoringType::Gross, ScoringType::Net]
        );
    }

    #[test]
    fn test_scope_membership() {
        let comp = Competition::scheduled(1, "Cup", vec![4; 9], start())
            .with_series(10)
            .with_tour(20);
        assert!(comp.in_scope(StandingsScope::Series(10)));
        assert!(comp.in_scope(StandingsScope::Tour(20)));
        assert!(!comp.in_scope(StandingsScope::Series(20)));
    }

    #[test]
    fn test_enum_string_round_trip() {
        assert_eq!("open".parse::<StartMode>(), Ok(StartMode::Open));
        assert_eq!("NET".parse::<ScoringType>(), Ok(ScoringType::Net));
        assert_eq!(ScoringMode::Both.to_string(), "both");
        assert!("stableford".parse::<ScoringMode>().is_err());
    }
}
