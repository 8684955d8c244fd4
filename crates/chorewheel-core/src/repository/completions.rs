use crate::error::CoreError;
use crate::models::Completion;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl super::CompletionRepository for SqliteRepository {
    async fn find_completion_for_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Option<Completion>, CoreError> {
        let completion = sqlx::query_as("SELECT * FROM completions WHERE assignment_id = $1")
            .bind(assignment_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(completion)
    }

    async fn total_points_for_child(&self, child_id: Uuid) -> Result<i64, CoreError> {
        let total: i64 = sqlx::query_scalar(
            r#"SELECT COALESCE(SUM(c.points_earned), 0)
            FROM completions c
            JOIN assignments a ON c.assignment_id = a.id
            WHERE a.child_id = $1
            "#,
        )
        .bind(child_id)
        .fetch_one(self.pool())
        .await?;
        Ok(total)
    }
}
