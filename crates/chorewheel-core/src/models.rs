use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A child in a household. `position` is a stable creation-order index
/// assigned on insert; rotation ordering and child listings rely on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Pending,
    Completed,
    Overdue,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::Completed => write!(f, "completed"),
            AssignmentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid assignment status: {0}")]
pub struct ParseAssignmentStatusError(String);

impl FromStr for AssignmentStatus {
    type Err = ParseAssignmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AssignmentStatus::Pending),
            "completed" => Ok(AssignmentStatus::Completed),
            "overdue" => Ok(AssignmentStatus::Overdue),
            _ => Err(ParseAssignmentStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RotationType {
    /// Even ISO weeks select the first listed child, odd weeks the second.
    /// Children beyond the first two are never selected in this mode.
    OddEvenWeek,
    /// Cycles through the full ordered child list, one child per ISO week.
    Alternating,
}

impl std::fmt::Display for RotationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationType::OddEvenWeek => write!(f, "odd_even_week"),
            RotationType::Alternating => write!(f, "alternating"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid rotation type: {0}")]
pub struct ParseRotationTypeError(String);

impl FromStr for RotationType {
    type Err = ParseRotationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "odd_even_week" | "odd-even-week" | "odd_even" => Ok(RotationType::OddEvenWeek),
            "alternating" => Ok(RotationType::Alternating),
            _ => Err(ParseRotationTypeError(s.to_string())),
        }
    }
}

/// Recurrence rule for a task template, stored as tagged JSON in the
/// `rule_config` column. Weekday numbers are Monday-based (0 = Monday,
/// 6 = Sunday), matching the ISO week used by the rotation resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Applies every date. An empty child list means every child in the
    /// household; a non-empty list restricts generation to those children.
    Daily {
        #[serde(default)]
        assigned_children: Vec<Uuid>,
    },
    /// Applies on the listed weekdays; every listed child receives an
    /// independent assignment row.
    Repeating {
        repeat_days: Vec<u8>,
        assigned_children: Vec<Uuid>,
    },
    /// Exactly one child is on duty per ISO week, resolved deterministically
    /// from the week index and the ordered child list.
    WeeklyRotation {
        rotation_type: RotationType,
        assigned_children: Vec<Uuid>,
    },
}

impl RecurrenceRule {
    pub fn rule_type(&self) -> &'static str {
        match self {
            RecurrenceRule::Daily { .. } => "daily",
            RecurrenceRule::Repeating { .. } => "repeating",
            RecurrenceRule::WeeklyRotation { .. } => "weekly_rotation",
        }
    }

    /// Rejects malformed configurations rather than guessing. Template
    /// creation validates up front, but the evaluator re-checks because
    /// stored configs may predate a rule change.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            RecurrenceRule::Daily { .. } => Ok(()),
            RecurrenceRule::Repeating { repeat_days, .. } => {
                if repeat_days.is_empty() {
                    return Err(CoreError::InvalidRuleConfig(
                        "repeating rule has no repeat_days".to_string(),
                    ));
                }
                if let Some(day) = repeat_days.iter().find(|d| **d > 6) {
                    return Err(CoreError::InvalidRuleConfig(format!(
                        "weekday {} is out of range 0-6",
                        day
                    )));
                }
                Ok(())
            }
            RecurrenceRule::WeeklyRotation {
                assigned_children, ..
            } => {
                if assigned_children.len() < 2 {
                    return Err(CoreError::InvalidRuleConfig(format!(
                        "weekly rotation needs at least 2 children, got {}",
                        assigned_children.len()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A recurring chore definition owned by a household. Soft-deleted by
/// setting `active = false`; rule edits affect only future generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points: i64,
    pub rule: RecurrenceRule,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One dated instance of a task owed by a specific child.
///
/// `points` is captured from the template at generation time; the completion
/// path credits this value, never the template's current one, so later
/// template edits cannot rewrite history. At most one row exists per
/// (task_id, child_id, date), enforced by the storage layer. Rows are
/// created by the generator, mutated only through the lifecycle operations,
/// and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub household_id: Uuid,
    pub task_id: Uuid,
    pub child_id: Uuid,
    pub date: NaiveDate,
    pub status: AssignmentStatus,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Append-only record created exactly once when an assignment reaches
/// `completed`, capturing the points awarded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Completion {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub points_earned: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTemplateData {
    pub household_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points: i64,
    pub rule: RecurrenceRule,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateData {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub points: Option<i64>,
    pub rule: Option<RecurrenceRule>,
}

/// A pending create emitted by the generation planner; persisted by the
/// repository inside the per-date transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignmentData {
    pub household_id: Uuid,
    pub task_id: Uuid,
    pub child_id: Uuid,
    pub date: NaiveDate,
    pub points: i64,
}

/// A per-template failure recorded during generation. One malformed template
/// must not block generation for the household's other templates, so the
/// planner annotates instead of failing the batch.
#[derive(Debug, Clone)]
pub struct TemplateIssue {
    pub template_id: Uuid,
    pub template_name: String,
    pub reason: String,
}

/// Result of a generation run: the rows actually created plus any
/// per-template issues.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated_count: usize,
    pub assignments: Vec<Assignment>,
    pub issues: Vec<TemplateIssue>,
}

/// Filters for listing assignments. All fields are optional and combine
/// with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub household_id: Option<Uuid>,
    pub child_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_config_round_trips_as_tagged_json() {
        let rule = RecurrenceRule::Repeating {
            repeat_days: vec![0, 2, 4],
            assigned_children: vec![Uuid::now_v7()],
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"rule_type\":\"repeating\""));
        let back: RecurrenceRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn daily_rule_defaults_to_all_children() {
        let rule: RecurrenceRule = serde_json::from_str(r#"{"rule_type":"daily"}"#).unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::Daily {
                assigned_children: vec![]
            }
        );
    }

    #[test]
    fn repeating_rule_rejects_empty_days() {
        let rule = RecurrenceRule::Repeating {
            repeat_days: vec![],
            assigned_children: vec![Uuid::now_v7()],
        };
        assert!(matches!(
            rule.validate(),
            Err(CoreError::InvalidRuleConfig(_))
        ));
    }

    #[test]
    fn repeating_rule_rejects_out_of_range_weekday() {
        let rule = RecurrenceRule::Repeating {
            repeat_days: vec![0, 7],
            assigned_children: vec![],
        };
        assert!(matches!(
            rule.validate(),
            Err(CoreError::InvalidRuleConfig(_))
        ));
    }

    #[test]
    fn rotation_rule_rejects_single_child() {
        let rule = RecurrenceRule::WeeklyRotation {
            rotation_type: RotationType::Alternating,
            assigned_children: vec![Uuid::now_v7()],
        };
        assert!(matches!(
            rule.validate(),
            Err(CoreError::InvalidRuleConfig(_))
        ));
    }

    #[test]
    fn status_parses_from_str() {
        assert_eq!(
            "Pending".parse::<AssignmentStatus>().unwrap(),
            AssignmentStatus::Pending
        );
        assert!("done".parse::<AssignmentStatus>().is_err());
    }
}
