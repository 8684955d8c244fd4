//! # Chorewheel Core Library
//!
//! The engine behind chorewheel, a household chore tracker: recurring task
//! templates are expanded into dated per-child assignments, rotation duty is
//! resolved deterministically, and completions credit points.
//!
//! ## Features
//!
//! - **Deterministic Recurrence**: daily, weekday-set, and weekly-rotation
//!   rules evaluated as pure functions of the calendar date
//! - **Stateless Rotation**: whose turn it is derives from an ISO week index
//!   and the ordered child list, never from a stored counter
//! - **Idempotent Generation**: re-running generation for a household and
//!   date never produces duplicate assignment rows
//! - **Auditable Lifecycle**: pending → completed / overdue transitions with
//!   exactly-once point crediting captured at generation time
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`rules`]: Rule evaluation (does a template apply, for which children)
//! - [`rotation`]: ISO-week arithmetic and on-duty resolution
//! - [`generation`]: Pure planning of missing assignments for a date
//! - [`repository`]: Data access layer with Repository pattern
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chorewheel_core::{db, repository::{AssignmentRepository, HouseholdRepository, Repository, SqliteRepository}};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("chores.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let household = repo.add_household("Smith family".to_string()).await?;
//!     let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
//!     let report = repo.generate_for_date(household.id, date, None).await?;
//!     println!("Generated {} assignments", report.generated_count);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod generation;
pub mod models;
pub mod repository;
pub mod rotation;
pub mod rules;
