//! Scorecard data models.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU16;
use thiserror::Error;

/// Raw hole value that is not a valid hole score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid hole value: {0}")]
pub struct InvalidHoleValue(pub i32);

/// Score recorded for a single hole.
///
/// Stored as a plain integer: `0` unplayed, `n > 0` strokes, `-1` gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum HoleScore {
    #[default]
    Unplayed,
    Strokes(NonZeroU16),
    GaveUp,
}

impl HoleScore {
    /// Whether the hole holds a played value (strokes or gave up)
    pub fn is_recorded(self) -> bool {
        !matches!(self, HoleScore::Unplayed)
    }

    /// Completed hole with `n` strokes; None for zero
    pub fn from_strokes(n: u16) -> Option<Self> {
        NonZeroU16::new(n).map(HoleScore::Strokes)
    }

    /// Strokes taken, if the hole was completed
    pub fn strokes(self) -> Option<u16> {
        match self {
            HoleScore::Strokes(n) => Some(n.get()),
            _ => None,
        }
    }
}

impl TryFrom<i32> for HoleScore {
    type Error = InvalidHoleValue;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(HoleScore::GaveUp),
            0 => Ok(HoleScore::Unplayed),
            n if n > 0 => u16::try_from(n)
                .ok()
                .and_then(HoleScore::from_strokes)
                .ok_or(InvalidHoleValue(value)),
            _ => Err(InvalidHoleValue(value)),
        }
    }
}

impl From<HoleScore> for i32 {
    fn from(score: HoleScore) -> Self {
        match score {
            HoleScore::Unplayed => 0,
            HoleScore::Strokes(n) => i32::from(n.get()),
            HoleScore::GaveUp => -1,
        }
    }
}

/// How a completed hole compares to its par
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleOutcome {
    AlbatrossOrBetter,
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    TripleBogeyOrWorse,
}

impl HoleOutcome {
    /// Classify a stroke count against the hole's par
    pub fn classify(strokes: u16, par: u8) -> Self {
        match i32::from(strokes) - i32::from(par) {
            i32::MIN..=-3 => HoleOutcome::AlbatrossOrBetter,
            -2 => HoleOutcome::Eagle,
            -1 => HoleOutcome::Birdie,
            0 => HoleOutcome::Par,
            1 => HoleOutcome::Bogey,
            2 => HoleOutcome::DoubleBogey,
            _ => HoleOutcome::TripleBogeyOrWorse,
        }
    }
}

/// Manually entered totals that override hole-by-hole data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManualScore {
    /// Front nine total
    pub out: Option<u32>,
    /// Back nine total
    #[serde(rename = "in")]
    pub in_: Option<u32>,
    /// Round total; a manual score is present when this is set
    pub total: Option<u32>,
}

/// Requested change to a manual score.
///
/// `total` is always written (`None` clears it). `out` and `in_` are only
/// touched when provided: `Some(None)` clears, `Some(Some(n))` sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManualScoreUpdate {
    pub out: Option<Option<i32>>,
    pub in_: Option<Option<i32>>,
    pub total: Option<i32>,
}

impl ManualScoreUpdate {
    /// Update that writes only the total
    pub fn total(total: Option<i32>) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Also write the front nine total
    pub fn with_out(mut self, out: Option<i32>) -> Self {
        self.out = Some(out);
        self
    }

    /// Also write the back nine total
    pub fn with_in(mut self, in_: Option<i32>) -> Self {
        self.in_ = Some(in_);
        self
    }
}

/// Handicap frozen when the first real score of a round is recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandicapSnapshot {
    pub value: f64,
    pub captured_at: DateTime<Utc>,
}

impl HandicapSnapshot {
    /// Strokes received, rounded to the nearest integer (ties away from zero)
    pub fn strokes_received(&self) -> i32 {
        self.value.round() as i32
    }
}

/// Handicaps known for a player at capture time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerHandicap {
    /// The player's base handicap
    pub base: Option<f64>,
    /// Playing handicap specific to the competition's tour
    pub tour_playing: Option<f64>,
}

impl PlayerHandicap {
    /// Tour playing handicap when set, otherwise the base handicap
    pub fn preferred(&self) -> Option<f64> {
        self.tour_playing.or(self.base)
    }
}

/// A participant's scorecard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    holes: Vec<HoleScore>,
    /// Whether the card rejects further score changes
    pub locked: bool,
    /// When the card was last locked
    pub locked_at: Option<DateTime<Utc>>,
    /// Disqualified participants never finish
    pub disqualified: bool,
    /// Manual totals overriding hole-by-hole data
    pub manual: ManualScore,
    /// Handicap captured with the first recorded score
    pub handicap_snapshot: Option<HandicapSnapshot>,
}

impl ScoreCard {
    /// Create an empty card for a course of `hole_count` holes
    pub fn new(hole_count: usize) -> Self {
        Self::from_holes(vec![HoleScore::Unplayed; hole_count])
    }

    /// Create an unlocked card from stored hole values
    pub fn from_holes(holes: Vec<HoleScore>) -> Self {
        Self {
            holes,
            locked: false,
            locked_at: None,
            disqualified: false,
            manual: ManualScore::default(),
            handicap_snapshot: None,
        }
    }

    /// Number of holes on the card
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// All hole values in order
    pub fn holes(&self) -> &[HoleScore] {
        &self.holes
    }

    /// Value for a 1-based hole number
    pub fn hole(&self, hole: usize) -> Option<HoleScore> {
        hole.checked_sub(1).and_then(|idx| self.holes.get(idx)).copied()
    }

    /// Whether `hole` is a valid 1-based hole number for this card
    pub fn is_valid_hole(&self, hole: usize) -> bool {
        (1..=self.holes.len()).contains(&hole)
    }

    /// Store a value for a 1-based hole number. Returns false when out of range.
    pub(crate) fn set_hole(&mut self, hole: usize, score: HoleScore) -> bool {
        match hole.checked_sub(1).and_then(|idx| self.holes.get_mut(idx)) {
            Some(slot) => {
                *slot = score;
                true
            }
            None => false,
        }
    }

    /// Whether any hole holds strokes or a give-up
    pub fn has_recorded_hole(&self) -> bool {
        self.holes.iter().any(|h| h.is_recorded())
    }

    /// Holes holding strokes or a give-up
    pub fn holes_played(&self) -> usize {
        self.holes.iter().filter(|h| h.is_recorded()).count()
    }

    /// Whether the player gave up on any hole
    pub fn gave_up(&self) -> bool {
        self.holes.contains(&HoleScore::GaveUp)
    }

    /// Sum of strokes over completed holes
    pub fn stroke_total(&self) -> u32 {
        self.holes
            .iter()
            .filter_map(|h| h.strokes())
            .map(u32::from)
            .sum()
    }

    /// Sum of par over holes holding strokes
    pub fn par_of_scored_holes(&self, pars: &[u8]) -> i32 {
        self.holes
            .iter()
            .zip(pars)
            .filter(|(hole, _)| hole.strokes().is_some())
            .map(|(_, &par)| i32::from(par))
            .sum()
    }

    /// Stroke totals for the front and back nine of an 18-hole card
    pub fn nine_totals(&self) -> Option<(u32, u32)> {
        if self.holes.len() != 18 {
            return None;
        }
        let total = |holes: &[HoleScore]| -> u32 {
            holes.iter().filter_map(|h| h.strokes()).map(u32::from).sum()
        };
        Some((total(&self.holes[..9]), total(&self.holes[9..])))
    }

    /// Outcome per hole against `pars`; None for holes without strokes
    pub fn outcomes(&self, pars: &[u8]) -> Vec<Option<HoleOutcome>> {
        self.holes
            .iter()
            .zip(pars)
            .map(|(hole, &par)| hole.strokes().map(|s| HoleOutcome::classify(s, par)))
            .collect()
    }

    /// Manual round total, when a manual score is present
    pub fn manual_total(&self) -> Option<u32> {
        self.manual.total
    }

    /// Whether recording `score` now should freeze the player's handicap
    pub fn needs_handicap_snapshot(&self, score: HoleScore) -> bool {
        matches!(score, HoleScore::Strokes(_))
            && self.handicap_snapshot.is_none()
            && !self.has_recorded_hole()
    }

    /// Freeze a handicap value. An existing snapshot is never replaced.
    pub fn capture_handicap(&mut self, value: f64, now: DateTime<Utc>) -> bool {
        if self.handicap_snapshot.is_some() {
            return false;
        }
        self.handicap_snapshot = Some(HandicapSnapshot {
            value,
            captured_at: stored_precision(now),
        });
        true
    }

    /// Lock the card and stamp the lock time
    pub fn lock(&mut self, now: DateTime<Utc>) {
        self.locked = true;
        self.locked_at = Some(stored_precision(now));
    }

    /// Unlock the card
    pub fn unlock(&mut self) {
        self.locked = false;
        self.locked_at = None;
    }
}

/// Timestamps on a card keep microseconds, the resolution of `TIMESTAMPTZ`
fn stored_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}
