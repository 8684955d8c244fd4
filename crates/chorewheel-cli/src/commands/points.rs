use anyhow::Result;
use chorewheel_core::repository::Repository;

use crate::cli::PointsCommand;
use crate::util::{require_household, resolve_child};

pub async fn show_points(
    repo: &impl Repository,
    command: PointsCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;
    let child = resolve_child(repo, household.id, &command.child).await?;
    let total = repo.total_points_for_child(child.id).await?;
    println!("{} has earned {} point(s).", child.name, total);
    Ok(())
}
