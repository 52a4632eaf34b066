//! Points allocation from finishing position.

use crate::competition::PointsTemplate;

/// Multiplier applied when a competition does not set one
pub const DEFAULT_POINTS_MULTIPLIER: f64 = 1.0;

/// Points before the competition multiplier.
///
/// Without a template, a field of `N` pays `N + 2` to the winner, `N` to
/// second place and `N - (position - 1)` (never below zero) from third on.
pub fn base_points(position: u32, field_size: usize, template: Option<&PointsTemplate>) -> i64 {
    if position == 0 {
        return 0;
    }
    if let Some(template) = template {
        return template.points_for(position);
    }

    let n = field_size as i64;
    match position {
        1 => n + 2,
        2 => n,
        p => (n - (i64::from(p) - 1)).max(0),
    }
}

/// Points for a position after applying the multiplier.
///
/// Rounds to the nearest integer, ties away from zero.
pub fn compute_points(
    position: u32,
    field_size: usize,
    template: Option<&PointsTemplate>,
    multiplier: f64,
) -> i64 {
    let base = base_points(position, field_size, template);
    (base as f64 * multiplier).round() as i64
}

/// Participants eligible for points: active enrollments when known,
/// otherwise the number of finishers
pub fn field_size(active_enrollments: Option<usize>, finished: usize) -> usize {
    match active_enrollments {
        Some(count) if count > 0 => count,
        _ => finished,
    }
}
