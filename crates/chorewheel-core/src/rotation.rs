//! Deterministic rotation resolution.
//!
//! Whose turn it is for a weekly-rotation template is pure arithmetic over
//! an ISO (Monday-start) week index and the template's ordered child list.
//! No "current turn" counter is ever stored, so the answer is always
//! recomputable from the facts alone and cannot desync from assignment
//! history.

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::RotationType;

/// Monday 2001-01-01, the fixed anchor all week indices are counted from.
fn rotation_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 1, 1).expect("epoch date is valid")
}

/// ISO week index of `date` relative to the fixed epoch.
///
/// Weeks run Monday through Sunday. Because the index is a plain day-count
/// division rather than a year/week-number pair, it never jitters across
/// year boundaries. Dates before the epoch yield negative indices.
pub fn week_index(date: NaiveDate) -> i64 {
    (date - rotation_epoch()).num_days().div_euclid(7)
}

/// The Monday and Sunday bounding the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Resolves which child is on duty for a rotation on the week containing
/// `date`.
///
/// `alternating` cycles through the full ordered list, one child per week.
/// `odd_even_week` selects `assigned_children[0]` on even week indices and
/// `assigned_children[1]` on odd ones; children beyond the first two are
/// unreachable in that mode (documented behavior).
pub fn on_duty_child(
    rotation_type: RotationType,
    assigned_children: &[Uuid],
    date: NaiveDate,
) -> Result<Uuid, CoreError> {
    if assigned_children.len() < 2 {
        return Err(CoreError::InvalidRuleConfig(format!(
            "weekly rotation needs at least 2 children, got {}",
            assigned_children.len()
        )));
    }

    let index = match rotation_type {
        RotationType::Alternating => {
            week_index(date).rem_euclid(assigned_children.len() as i64) as usize
        }
        RotationType::OddEvenWeek => week_index(date).rem_euclid(2) as usize,
    };

    Ok(assigned_children[index])
}
