//! Rule evaluation: decides whether a template applies on a date and which
//! children are candidates for it. Pure functions over in-memory snapshots;
//! all I/O happens in the repository layer.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{Child, RecurrenceRule, TaskTemplate};
use crate::rotation;

/// Whether `template` produces assignments on `date`.
///
/// Daily and weekly-rotation rules apply on every date (rotation output is
/// deduplicated per ISO week by the generator, not here); repeating rules
/// apply only on their listed weekdays. Malformed configs are refused.
pub fn applies_on(template: &TaskTemplate, date: NaiveDate) -> Result<bool, CoreError> {
    template.rule.validate()?;
    let applies = match &template.rule {
        RecurrenceRule::Daily { .. } => true,
        RecurrenceRule::Repeating { repeat_days, .. } => {
            let weekday = date.weekday().num_days_from_monday() as u8;
            repeat_days.contains(&weekday)
        }
        RecurrenceRule::WeeklyRotation { .. } => true,
    };
    Ok(applies)
}

/// Ordered child candidates for `template` on `date`.
///
/// Daily templates default to every household child unless they carry an
/// explicit list; repeating templates use their list verbatim; rotation
/// templates resolve to exactly one on-duty child. Listed children that are
/// not (or no longer) in the household are dropped, except a rotation
/// resolving to an unknown child, which is a configuration error.
pub fn candidate_children(
    template: &TaskTemplate,
    date: NaiveDate,
    children: &[Child],
) -> Result<Vec<Uuid>, CoreError> {
    template.rule.validate()?;

    let known = |id: &Uuid| children.iter().any(|c| c.id == *id);

    match &template.rule {
        RecurrenceRule::Daily { assigned_children } => {
            if assigned_children.is_empty() {
                Ok(children.iter().map(|c| c.id).collect())
            } else {
                Ok(assigned_children
                    .iter()
                    .copied()
                    .filter(|id| known(id))
                    .collect())
            }
        }
        RecurrenceRule::Repeating {
            assigned_children, ..
        } => Ok(assigned_children
            .iter()
            .copied()
            .filter(|id| known(id))
            .collect()),
        RecurrenceRule::WeeklyRotation {
            rotation_type,
            assigned_children,
        } => {
            let on_duty = rotation::on_duty_child(*rotation_type, assigned_children, date)?;
            if !known(&on_duty) {
                return Err(CoreError::InvalidRuleConfig(format!(
                    "rotation for '{}' resolved to a child not in the household",
                    template.name
                )));
            }
            Ok(vec![on_duty])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RotationType;
    use chrono::Utc;
    use rstest::rstest;

    fn child(household_id: Uuid, position: i64) -> Child {
        Child {
            id: Uuid::now_v7(),
            household_id,
            name: format!("child-{}", position),
            position,
            created_at: Utc::now(),
        }
    }

    fn template(household_id: Uuid, rule: RecurrenceRule) -> TaskTemplate {
        TaskTemplate {
            id: Uuid::now_v7(),
            household_id,
            name: "Test chore".to_string(),
            description: None,
            points: 5,
            rule,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_applies_every_date() {
        let t = template(
            Uuid::now_v7(),
            RecurrenceRule::Daily {
                assigned_children: vec![],
            },
        );
        assert!(applies_on(&t, date(2025, 6, 2)).unwrap());
        assert!(applies_on(&t, date(2025, 6, 8)).unwrap());
    }

    // 2025-06-02 is a Monday.
    #[rstest]
    #[case(date(2025, 6, 2), true)] // Monday
    #[case(date(2025, 6, 3), false)] // Tuesday
    #[case(date(2025, 6, 4), true)] // Wednesday
    #[case(date(2025, 6, 6), true)] // Friday
    #[case(date(2025, 6, 7), false)] // Saturday
    fn repeating_applies_only_on_listed_weekdays(#[case] day: NaiveDate, #[case] expected: bool) {
        let t = template(
            Uuid::now_v7(),
            RecurrenceRule::Repeating {
                repeat_days: vec![0, 2, 4], // Mon, Wed, Fri
                assigned_children: vec![Uuid::now_v7()],
            },
        );
        assert_eq!(applies_on(&t, day).unwrap(), expected);
    }

    #[test]
    fn malformed_repeating_rule_is_refused() {
        let t = template(
            Uuid::now_v7(),
            RecurrenceRule::Repeating {
                repeat_days: vec![],
                assigned_children: vec![Uuid::now_v7()],
            },
        );
        assert!(matches!(
            applies_on(&t, date(2025, 6, 2)),
            Err(CoreError::InvalidRuleConfig(_))
        ));
    }

    #[test]
    fn daily_candidates_default_to_all_household_children() {
        let hh = Uuid::now_v7();
        let children = vec![child(hh, 0), child(hh, 1)];
        let t = template(
            hh,
            RecurrenceRule::Daily {
                assigned_children: vec![],
            },
        );
        let candidates = candidate_children(&t, date(2025, 6, 2), &children).unwrap();
        assert_eq!(candidates, vec![children[0].id, children[1].id]);
    }

    #[test]
    fn explicit_daily_list_restricts_and_drops_unknown_children() {
        let hh = Uuid::now_v7();
        let children = vec![child(hh, 0), child(hh, 1)];
        let gone = Uuid::now_v7();
        let t = template(
            hh,
            RecurrenceRule::Daily {
                assigned_children: vec![children[1].id, gone],
            },
        );
        let candidates = candidate_children(&t, date(2025, 6, 2), &children).unwrap();
        assert_eq!(candidates, vec![children[1].id]);
    }

    #[test]
    fn rotation_resolves_exactly_one_candidate() {
        let hh = Uuid::now_v7();
        let children = vec![child(hh, 0), child(hh, 1)];
        let t = template(
            hh,
            RecurrenceRule::WeeklyRotation {
                rotation_type: RotationType::Alternating,
                assigned_children: vec![children[0].id, children[1].id],
            },
        );
        let candidates = candidate_children(&t, date(2025, 6, 2), &children).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(children.iter().any(|c| c.id == candidates[0]));
    }

    #[test]
    fn rotation_to_unknown_child_is_a_config_error() {
        let hh = Uuid::now_v7();
        let children = vec![child(hh, 0)];
        let t = template(
            hh,
            RecurrenceRule::WeeklyRotation {
                rotation_type: RotationType::Alternating,
                assigned_children: vec![Uuid::now_v7(), Uuid::now_v7()],
            },
        );
        assert!(matches!(
            candidate_children(&t, date(2025, 6, 2), &children),
            Err(CoreError::InvalidRuleConfig(_))
        ));
    }
}
