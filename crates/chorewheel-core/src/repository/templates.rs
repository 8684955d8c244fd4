use crate::error::CoreError;
use crate::models::{NewTemplateData, RecurrenceRule, TaskTemplate, UpdateTemplateData};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use uuid::Uuid;

/// Raw template row; `rule_config` holds the tagged JSON form of
/// [`RecurrenceRule`] and is the source of truth, with the `rule_type`
/// column denormalized from it for readable queries.
#[derive(Debug, FromRow)]
struct TemplateRow {
    id: Uuid,
    household_id: Uuid,
    name: String,
    description: Option<String>,
    points: i64,
    #[allow(dead_code)]
    rule_type: String,
    rule_config: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for TaskTemplate {
    type Error = CoreError;

    fn try_from(row: TemplateRow) -> Result<Self, CoreError> {
        let rule: RecurrenceRule = serde_json::from_str(&row.rule_config).map_err(|e| {
            CoreError::InvalidRuleConfig(format!(
                "stored rule_config for template {} is unreadable: {}",
                row.id, e
            ))
        })?;
        Ok(TaskTemplate {
            id: row.id,
            household_id: row.household_id,
            name: row.name,
            description: row.description,
            points: row.points,
            rule,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_templates(rows: Vec<TemplateRow>) -> Result<Vec<TaskTemplate>, CoreError> {
    rows.into_iter().map(TaskTemplate::try_from).collect()
}

fn encode_rule(rule: &RecurrenceRule) -> Result<String, CoreError> {
    serde_json::to_string(rule)
        .map_err(|e| CoreError::InvalidRuleConfig(format!("cannot serialize rule: {}", e)))
}

#[async_trait]
impl super::TemplateRepository for SqliteRepository {
    async fn add_template(&self, data: NewTemplateData) -> Result<TaskTemplate, CoreError> {
        if data.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Template name cannot be empty.".to_string(),
            ));
        }
        if data.points < 0 {
            return Err(CoreError::InvalidInput(
                "Points must be zero or positive.".to_string(),
            ));
        }
        data.rule.validate()?;

        let household_exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM households WHERE id = $1")
                .bind(data.household_id)
                .fetch_optional(self.pool())
                .await?;
        if household_exists.is_none() {
            return Err(CoreError::NotFound(format!(
                "Household with id {} not found",
                data.household_id
            )));
        }

        let now = Utc::now();
        let template = TaskTemplate {
            id: Uuid::now_v7(),
            household_id: data.household_id,
            name: data.name.trim().to_string(),
            description: data.description,
            points: data.points,
            rule: data.rule,
            active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO task_templates (id, household_id, name, description, points, rule_type, rule_config, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(template.id)
        .bind(template.household_id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(template.points)
        .bind(template.rule.rule_type())
        .bind(encode_rule(&template.rule)?)
        .bind(template.active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(self.pool())
        .await?;

        Ok(template)
    }

    async fn find_template_by_id(&self, id: Uuid) -> Result<Option<TaskTemplate>, CoreError> {
        let row: Option<TemplateRow> = sqlx::query_as("SELECT * FROM task_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(TaskTemplate::try_from).transpose()
    }

    async fn find_templates(&self, household_id: Uuid) -> Result<Vec<TaskTemplate>, CoreError> {
        let rows: Vec<TemplateRow> =
            sqlx::query_as("SELECT * FROM task_templates WHERE household_id = $1 ORDER BY created_at")
                .bind(household_id)
                .fetch_all(self.pool())
                .await?;
        rows_to_templates(rows)
    }

    async fn find_active_templates(
        &self,
        household_id: Uuid,
    ) -> Result<Vec<TaskTemplate>, CoreError> {
        let rows: Vec<TemplateRow> = sqlx::query_as(
            "SELECT * FROM task_templates WHERE household_id = $1 AND active = TRUE ORDER BY created_at",
        )
        .bind(household_id)
        .fetch_all(self.pool())
        .await?;
        rows_to_templates(rows)
    }

    async fn update_template(
        &self,
        id: Uuid,
        data: UpdateTemplateData,
    ) -> Result<TaskTemplate, CoreError> {
        if let Some(points) = data.points {
            if points < 0 {
                return Err(CoreError::InvalidInput(
                    "Points must be zero or positive.".to_string(),
                ));
            }
        }
        if let Some(rule) = &data.rule {
            rule.validate()?;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE task_templates SET ");
        let mut updated = false;

        if let Some(name) = &data.name {
            qb.push("name = ");
            qb.push_bind(name);
            updated = true;
        }

        if let Some(description) = &data.description {
            if updated {
                qb.push(", ");
            }
            qb.push("description = ");
            qb.push_bind(description);
            updated = true;
        }

        if let Some(points) = data.points {
            if updated {
                qb.push(", ");
            }
            qb.push("points = ");
            qb.push_bind(points);
            updated = true;
        }

        if let Some(rule) = &data.rule {
            if updated {
                qb.push(", ");
            }
            qb.push("rule_type = ");
            qb.push_bind(rule.rule_type());
            qb.push(", rule_config = ");
            qb.push_bind(encode_rule(rule)?);
            updated = true;
        }

        if updated {
            qb.push(", updated_at = ");
            qb.push_bind(Utc::now());
            qb.push(" WHERE id = ");
            qb.push_bind(id);
            let result = qb.build().execute(self.pool()).await?;
            if result.rows_affected() == 0 {
                return Err(CoreError::NotFound(format!(
                    "Template with id {} not found",
                    id
                )));
            }
        }

        self.find_template_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Template with id {} not found", id)))
    }

    async fn set_template_active(&self, id: Uuid, active: bool) -> Result<TaskTemplate, CoreError> {
        let result = sqlx::query("UPDATE task_templates SET active = $1, updated_at = $2 WHERE id = $3")
            .bind(active)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "Template with id {} not found",
                id
            )));
        }
        self.find_template_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Template with id {} not found", id)))
    }
}
