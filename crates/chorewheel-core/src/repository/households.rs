use crate::error::CoreError;
use crate::models::Household;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::HouseholdRepository for SqliteRepository {
    async fn add_household(&self, name: String) -> Result<Household, CoreError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "Household name cannot be empty.".to_string(),
            ));
        }

        let household = Household {
            id: Uuid::now_v7(),
            name,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO households (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(household.id)
            .bind(&household.name)
            .bind(household.created_at)
            .execute(self.pool())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => CoreError::InvalidInput(
                    format!("Household '{}' already exists.", household.name),
                ),
                _ => e.into(),
            })?;

        Ok(household)
    }

    async fn find_household_by_id(&self, id: Uuid) -> Result<Option<Household>, CoreError> {
        let household = sqlx::query_as("SELECT * FROM households WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(household)
    }

    async fn find_household_by_name(&self, name: &str) -> Result<Option<Household>, CoreError> {
        let household = sqlx::query_as("SELECT * FROM households WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(household)
    }

    async fn find_households(&self) -> Result<Vec<Household>, CoreError> {
        let households = sqlx::query_as("SELECT * FROM households ORDER BY created_at")
            .fetch_all(self.pool())
            .await?;
        Ok(households)
    }
}
