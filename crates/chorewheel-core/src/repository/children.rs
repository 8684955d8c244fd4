use crate::error::CoreError;
use crate::models::Child;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::ChildRepository for SqliteRepository {
    async fn add_child(&self, household_id: Uuid, name: String) -> Result<Child, CoreError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "Child name cannot be empty.".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;

        let household_exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM households WHERE id = $1")
                .bind(household_id)
                .fetch_optional(&mut *tx)
                .await?;
        if household_exists.is_none() {
            return Err(CoreError::NotFound(format!(
                "Household with id {} not found",
                household_id
            )));
        }

        // Position is the creation-order index rotation ordering relies on.
        let next_position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM children WHERE household_id = $1",
        )
        .bind(household_id)
        .fetch_one(&mut *tx)
        .await?;

        let child = Child {
            id: Uuid::now_v7(),
            household_id,
            name,
            position: next_position,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO children (id, household_id, name, position, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(child.id)
        .bind(child.household_id)
        .bind(&child.name)
        .bind(child.position)
        .bind(child.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CoreError::InvalidInput(
                format!("Child '{}' already exists in this household.", child.name),
            ),
            _ => e.into(),
        })?;

        tx.commit().await?;
        Ok(child)
    }

    async fn find_child_by_id(&self, id: Uuid) -> Result<Option<Child>, CoreError> {
        let child = sqlx::query_as("SELECT * FROM children WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(child)
    }

    async fn find_children(&self, household_id: Uuid) -> Result<Vec<Child>, CoreError> {
        let children =
            sqlx::query_as("SELECT * FROM children WHERE household_id = $1 ORDER BY position")
                .bind(household_id)
                .fetch_all(self.pool())
                .await?;
        Ok(children)
    }

    async fn find_child_by_name(
        &self,
        household_id: Uuid,
        name: &str,
    ) -> Result<Option<Child>, CoreError> {
        let child = sqlx::query_as("SELECT * FROM children WHERE household_id = $1 AND name = $2")
            .bind(household_id)
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(child)
    }
}
