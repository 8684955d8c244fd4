use anyhow::{anyhow, Result};
use chorewheel_core::error::CoreError;
use chorewheel_core::repository::Repository;

use crate::cli::ReassignCommand;
use crate::util::{resolve_assignment_id, resolve_child};

pub async fn reassign_assignment(repo: &impl Repository, command: ReassignCommand) -> Result<()> {
    let assignment_id = resolve_assignment_id(repo, &command.id).await?;
    let assignment = repo
        .find_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!(
                "Assignment with id {} not found",
                assignment_id
            )))
        })?;

    let child = resolve_child(repo, assignment.household_id, &command.child).await?;
    let updated = repo.reassign_assignment(assignment_id, child.id).await?;

    let task_name = repo
        .find_template_by_id(updated.task_id)
        .await?
        .map(|t| t.name)
        .unwrap_or_else(|| updated.task_id.to_string());

    println!("Reassigned '{}' ({}) to {}", task_name, updated.date, child.name);
    Ok(())
}
