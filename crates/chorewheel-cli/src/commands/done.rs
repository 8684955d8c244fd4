use anyhow::Result;
use chorewheel_core::repository::Repository;

use crate::cli::DoneCommand;
use crate::util::resolve_assignment_id;

pub async fn done_assignment(repo: &impl Repository, command: DoneCommand) -> Result<()> {
    let assignment_id = resolve_assignment_id(repo, &command.id).await?;
    let (assignment, completion) = repo.complete_assignment(assignment_id).await?;

    let task_name = repo
        .find_template_by_id(assignment.task_id)
        .await?
        .map(|t| t.name)
        .unwrap_or_else(|| assignment.task_id.to_string());

    println!(
        "Completed '{}', {} point(s) earned",
        task_name, completion.points_earned
    );
    Ok(())
}
