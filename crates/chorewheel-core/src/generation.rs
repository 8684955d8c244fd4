//! Assignment generation planning.
//!
//! `plan_for_date` computes which assignments must exist for a household on
//! a date and emits only the missing creates. It is pure given its inputs,
//! so generation is deterministic and unit-testable without a database. The
//! repository layer persists the plan in one household-scoped transaction;
//! the `UNIQUE (task_id, child_id, date)` constraint there backstops this
//! in-memory diff against concurrent generation.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    Assignment, Child, NewAssignmentData, RecurrenceRule, TaskTemplate, TemplateIssue,
};
use crate::rotation;
use crate::rules;

/// Output of the planner: creates to persist plus per-template failures.
#[derive(Debug, Default)]
pub struct GenerationPlan {
    pub creates: Vec<NewAssignmentData>,
    pub issues: Vec<TemplateIssue>,
}

/// Computes the missing assignments for `household_id` on `date`.
///
/// `existing` must cover at least the ISO week containing `date` so that
/// weekly-rotation deduplication (one assignment per template per week, not
/// per day) can see assignments generated earlier in the week.
///
/// A malformed template is recorded as an issue without blocking the
/// household's other templates. A household with no eligible children
/// produces no creates for the affected template; an assignment referencing
/// a nonexistent child would be worse than none.
pub fn plan_for_date(
    household_id: Uuid,
    date: NaiveDate,
    templates: &[TaskTemplate],
    children: &[Child],
    existing: &[Assignment],
) -> GenerationPlan {
    let existing_keys: HashSet<(Uuid, Uuid, NaiveDate)> = existing
        .iter()
        .map(|a| (a.task_id, a.child_id, a.date))
        .collect();

    let mut plan = GenerationPlan::default();

    for template in templates {
        if !template.active || template.household_id != household_id {
            continue;
        }
        match plan_template(template, date, children, existing, &existing_keys) {
            Ok(creates) => plan.creates.extend(creates),
            Err(e) => plan.issues.push(TemplateIssue {
                template_id: template.id,
                template_name: template.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    plan
}

fn plan_template(
    template: &TaskTemplate,
    date: NaiveDate,
    children: &[Child],
    existing: &[Assignment],
    existing_keys: &HashSet<(Uuid, Uuid, NaiveDate)>,
) -> Result<Vec<NewAssignmentData>, CoreError> {
    if !rules::applies_on(template, date)? {
        return Ok(Vec::new());
    }

    // One rotation assignment per template per ISO week: an assignment
    // anywhere in the week covers it, regardless of which child holds it.
    if matches!(template.rule, RecurrenceRule::WeeklyRotation { .. }) {
        let (week_start, week_end) = rotation::week_bounds(date);
        let covered = existing
            .iter()
            .any(|a| a.task_id == template.id && a.date >= week_start && a.date <= week_end);
        if covered {
            return Ok(Vec::new());
        }
    }

    let candidates = rules::candidate_children(template, date, children)?;

    let creates = candidates
        .into_iter()
        .filter(|child_id| !existing_keys.contains(&(template.id, *child_id, date)))
        .map(|child_id| NewAssignmentData {
            household_id: template.household_id,
            task_id: template.id,
            child_id,
            date,
            points: template.points,
        })
        .collect();

    Ok(creates)
}
