use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid rule configuration: {0}")]
    InvalidRuleConfig(String),

    #[error("Assignment {0} is already completed")]
    AlreadyCompleted(Uuid),

    #[error("Assignment already exists for (task, child, date): {0}")]
    DuplicateAssignment(String),

    #[error("Forbidden status transition: {0}")]
    ForbiddenTransition(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Name)
}

impl CoreError {
    /// Whether this error is a conflict a caller may retry or treat as a
    /// lost race (already completed, duplicate insert).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CoreError::AlreadyCompleted(_) | CoreError::DuplicateAssignment(_)
        )
    }
}
