use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    Assignment, AssignmentQuery, Child, Completion, GenerationReport, Household, NewTemplateData,
    TaskTemplate, UpdateTemplateData,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

// Re-export domain modules
pub mod assignments;
pub mod children;
pub mod completions;
pub mod households;
pub mod templates;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for household operations
#[async_trait]
pub trait HouseholdRepository {
    async fn add_household(&self, name: String) -> Result<Household, CoreError>;
    async fn find_household_by_id(&self, id: Uuid) -> Result<Option<Household>, CoreError>;
    async fn find_household_by_name(&self, name: &str) -> Result<Option<Household>, CoreError>;
    async fn find_households(&self) -> Result<Vec<Household>, CoreError>;
}

/// Domain-specific trait for child operations
#[async_trait]
pub trait ChildRepository {
    async fn add_child(&self, household_id: Uuid, name: String) -> Result<Child, CoreError>;
    async fn find_child_by_id(&self, id: Uuid) -> Result<Option<Child>, CoreError>;
    /// Children of a household in stable creation order.
    async fn find_children(&self, household_id: Uuid) -> Result<Vec<Child>, CoreError>;
    async fn find_child_by_name(
        &self,
        household_id: Uuid,
        name: &str,
    ) -> Result<Option<Child>, CoreError>;
}

/// Domain-specific trait for task template operations
#[async_trait]
pub trait TemplateRepository {
    async fn add_template(&self, data: NewTemplateData) -> Result<TaskTemplate, CoreError>;
    async fn find_template_by_id(&self, id: Uuid) -> Result<Option<TaskTemplate>, CoreError>;
    async fn find_templates(&self, household_id: Uuid) -> Result<Vec<TaskTemplate>, CoreError>;
    async fn find_active_templates(
        &self,
        household_id: Uuid,
    ) -> Result<Vec<TaskTemplate>, CoreError>;
    async fn update_template(
        &self,
        id: Uuid,
        data: UpdateTemplateData,
    ) -> Result<TaskTemplate, CoreError>;
    /// Soft-delete / restore. Inactive templates are skipped by generation.
    async fn set_template_active(&self, id: Uuid, active: bool) -> Result<TaskTemplate, CoreError>;
}

/// Domain-specific trait for assignment generation and lifecycle
#[async_trait]
pub trait AssignmentRepository {
    /// Generates the missing assignments for a household on a date, in one
    /// transaction. `task_id` narrows generation to a single template.
    async fn generate_for_date(
        &self,
        household_id: Uuid,
        date: NaiveDate,
        task_id: Option<Uuid>,
    ) -> Result<GenerationReport, CoreError>;
    async fn find_assignment_by_id(&self, id: Uuid) -> Result<Option<Assignment>, CoreError>;
    async fn find_assignments_by_id_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Assignment>, CoreError>;
    async fn find_assignments(&self, query: &AssignmentQuery)
        -> Result<Vec<Assignment>, CoreError>;
    /// pending/overdue → completed, crediting the captured points exactly
    /// once. Completing an already-completed assignment is a conflict.
    async fn complete_assignment(&self, id: Uuid)
        -> Result<(Assignment, Completion), CoreError>;
    /// pending → overdue. A pure status flip with no point side effects.
    async fn mark_overdue(&self, id: Uuid) -> Result<Assignment, CoreError>;
    /// Flips every pending assignment of the household dated before
    /// `today`. Returns the number of rows flipped.
    async fn sweep_overdue(&self, household_id: Uuid, today: NaiveDate) -> Result<u64, CoreError>;
    /// Moves a pending/overdue assignment to another child of the same
    /// household, preserving date, task, and status.
    async fn reassign_assignment(
        &self,
        id: Uuid,
        new_child_id: Uuid,
    ) -> Result<Assignment, CoreError>;
}

/// Domain-specific trait for completion records
#[async_trait]
pub trait CompletionRepository {
    async fn find_completion_for_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Option<Completion>, CoreError>;
    async fn total_points_for_child(&self, child_id: Uuid) -> Result<i64, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    HouseholdRepository
    + ChildRepository
    + TemplateRepository
    + AssignmentRepository
    + CompletionRepository
{
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
