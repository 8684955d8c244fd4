use crate::error::CoreError;
use crate::generation;
use crate::models::{
    Assignment, AssignmentQuery, AssignmentStatus, Completion, GenerationReport,
};
use crate::repository::{ChildRepository, SqliteRepository, TemplateRepository};
use crate::rotation;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[async_trait]
impl super::AssignmentRepository for SqliteRepository {
    async fn generate_for_date(
        &self,
        household_id: Uuid,
        date: NaiveDate,
        task_id: Option<Uuid>,
    ) -> Result<GenerationReport, CoreError> {
        let household_exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM households WHERE id = $1")
                .bind(household_id)
                .fetch_optional(self.pool())
                .await?;
        if household_exists.is_none() {
            return Err(CoreError::NotFound(format!(
                "Household with id {} not found",
                household_id
            )));
        }

        let mut templates = self.find_active_templates(household_id).await?;
        if let Some(task_id) = task_id {
            templates.retain(|t| t.id == task_id);
            if templates.is_empty() {
                return Err(CoreError::NotFound(format!(
                    "Active template with id {} not found in this household",
                    task_id
                )));
            }
        }

        let children = self.find_children(household_id).await?;

        // The existing snapshot covers the whole ISO week so rotation
        // templates dedupe per week, not per day.
        let (week_start, week_end) = rotation::week_bounds(date);
        let existing: Vec<Assignment> = sqlx::query_as(
            "SELECT * FROM assignments WHERE household_id = $1 AND date >= $2 AND date <= $3",
        )
        .bind(household_id)
        .bind(week_start)
        .bind(week_end)
        .fetch_all(self.pool())
        .await?;

        let plan = generation::plan_for_date(household_id, date, &templates, &children, &existing);

        // All creates land in one transaction: a storage failure (including
        // a lost uniqueness race with a concurrent generate) rolls back the
        // whole per-date batch rather than leaving a half-generated day.
        let mut tx = self.pool().begin().await?;
        let mut created = Vec::with_capacity(plan.creates.len());

        for create in &plan.creates {
            let assignment = Assignment {
                id: Uuid::now_v7(),
                household_id: create.household_id,
                task_id: create.task_id,
                child_id: create.child_id,
                date: create.date,
                status: AssignmentStatus::Pending,
                points: create.points,
                created_at: Utc::now(),
                completed_at: None,
            };

            sqlx::query(
                r#"INSERT INTO assignments (id, household_id, task_id, child_id, date, status, points, created_at, completed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(assignment.id)
            .bind(assignment.household_id)
            .bind(assignment.task_id)
            .bind(assignment.child_id)
            .bind(assignment.date)
            .bind(assignment.status)
            .bind(assignment.points)
            .bind(assignment.created_at)
            .bind(assignment.completed_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    CoreError::DuplicateAssignment(format!(
                        "({}, {}, {})",
                        assignment.task_id, assignment.child_id, assignment.date
                    ))
                }
                _ => e.into(),
            })?;

            created.push(assignment);
        }

        tx.commit().await?;

        Ok(GenerationReport {
            generated_count: created.len(),
            assignments: created,
            issues: plan.issues,
        })
    }

    async fn find_assignment_by_id(&self, id: Uuid) -> Result<Option<Assignment>, CoreError> {
        let assignment = sqlx::query_as("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(assignment)
    }

    async fn find_assignments_by_id_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Assignment>, CoreError> {
        // IDs are stored as raw UUID bytes; match on the hex form.
        let mut pattern = prefix.replace('-', "").to_lowercase();
        pattern.push('%');

        let assignments: Vec<Assignment> =
            sqlx::query_as("SELECT * FROM assignments WHERE lower(hex(id)) LIKE $1")
                .bind(pattern)
                .fetch_all(self.pool())
                .await?;
        Ok(assignments)
    }

    async fn find_assignments(
        &self,
        query: &AssignmentQuery,
    ) -> Result<Vec<Assignment>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM assignments WHERE 1=1");

        if let Some(household_id) = query.household_id {
            qb.push(" AND household_id = ");
            qb.push_bind(household_id);
        }
        if let Some(child_id) = query.child_id {
            qb.push(" AND child_id = ");
            qb.push_bind(child_id);
        }
        if let Some(date) = query.date {
            qb.push(" AND date = ");
            qb.push_bind(date);
        }
        if let Some(status) = query.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY date, created_at");

        let assignments = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(assignments)
    }

    async fn complete_assignment(
        &self,
        id: Uuid,
    ) -> Result<(Assignment, Completion), CoreError> {
        let mut tx = self.pool().begin().await?;
        let now = Utc::now();

        // Conditional update serializes racing completions: the loser sees
        // zero rows and surfaces a conflict instead of a second credit.
        let completed: Option<Assignment> = sqlx::query_as(
            r#"UPDATE assignments
            SET status = $1, completed_at = $2
            WHERE id = $3 AND status IN ('pending', 'overdue')
            RETURNING *
            "#,
        )
        .bind(AssignmentStatus::Completed)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(assignment) = completed else {
            let current: Option<Assignment> =
                sqlx::query_as("SELECT * FROM assignments WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match current {
                Some(_) => CoreError::AlreadyCompleted(id),
                None => CoreError::NotFound(format!("Assignment with id {} not found", id)),
            });
        };

        // Credit the points captured at generation time, in the same
        // transaction as the status flip. The UNIQUE constraint on
        // assignment_id makes a second completion row impossible.
        let completion = Completion {
            id: Uuid::now_v7(),
            assignment_id: assignment.id,
            points_earned: assignment.points,
            completed_at: now,
        };

        sqlx::query(
            "INSERT INTO completions (id, assignment_id, points_earned, completed_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(completion.id)
        .bind(completion.assignment_id)
        .bind(completion.points_earned)
        .bind(completion.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CoreError::AlreadyCompleted(id)
            }
            _ => e.into(),
        })?;

        tx.commit().await?;
        Ok((assignment, completion))
    }

    async fn mark_overdue(&self, id: Uuid) -> Result<Assignment, CoreError> {
        let updated: Option<Assignment> = sqlx::query_as(
            r#"UPDATE assignments
            SET status = $1
            WHERE id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(AssignmentStatus::Overdue)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        if let Some(assignment) = updated {
            return Ok(assignment);
        }

        let current: Option<Assignment> = sqlx::query_as("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match current {
            // Already overdue: the flip is idempotent.
            Some(a) if a.status == AssignmentStatus::Overdue => Ok(a),
            Some(_) => Err(CoreError::ForbiddenTransition(
                "completed assignments cannot become overdue".to_string(),
            )),
            None => Err(CoreError::NotFound(format!(
                "Assignment with id {} not found",
                id
            ))),
        }
    }

    async fn sweep_overdue(&self, household_id: Uuid, today: NaiveDate) -> Result<u64, CoreError> {
        let result = sqlx::query(
            r#"UPDATE assignments
            SET status = $1
            WHERE household_id = $2 AND status = 'pending' AND date < $3
            "#,
        )
        .bind(AssignmentStatus::Overdue)
        .bind(household_id)
        .bind(today)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    async fn reassign_assignment(
        &self,
        id: Uuid,
        new_child_id: Uuid,
    ) -> Result<Assignment, CoreError> {
        let assignment = self
            .find_assignment_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Assignment with id {} not found", id)))?;

        if assignment.status == AssignmentStatus::Completed {
            return Err(CoreError::ForbiddenTransition(
                "completed assignments cannot be reassigned".to_string(),
            ));
        }

        let child = self
            .find_child_by_id(new_child_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound(format!("Child with id {} not found", new_child_id))
            })?;
        if child.household_id != assignment.household_id {
            return Err(CoreError::InvalidInput(
                "Child belongs to a different household.".to_string(),
            ));
        }

        // Keyed on current status so a racing complete() wins; the unique
        // key catches a reassign onto an already-assigned (task, child, date).
        let updated: Option<Assignment> = sqlx::query_as(
            r#"UPDATE assignments
            SET child_id = $1
            WHERE id = $2 AND status IN ('pending', 'overdue')
            RETURNING *
            "#,
        )
        .bind(new_child_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CoreError::DuplicateAssignment(format!(
                    "({}, {}, {})",
                    assignment.task_id, new_child_id, assignment.date
                ))
            }
            _ => e.into(),
        })?;

        updated.ok_or_else(|| {
            CoreError::ForbiddenTransition(
                "completed assignments cannot be reassigned".to_string(),
            )
        })
    }
}
