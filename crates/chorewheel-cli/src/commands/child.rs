use anyhow::Result;
use chorewheel_core::repository::Repository;

use crate::cli::{ChildAction, ChildCommand};
use crate::util::require_household;
use crate::views::table::{display_children, ViewChild};

pub async fn child_command(
    repo: &impl Repository,
    command: ChildCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;

    match command.action {
        ChildAction::Add { name } => {
            let child = repo.add_child(household.id, name).await?;
            println!("Added '{}' to household '{}'", child.name, household.name);
        }
        ChildAction::List => {
            let children = repo.find_children(household.id).await?;
            let mut view = Vec::with_capacity(children.len());
            for child in children {
                let points = repo.total_points_for_child(child.id).await?;
                view.push(ViewChild {
                    name: child.name,
                    position: child.position,
                    points,
                });
            }
            display_children(&view);
        }
    }
    Ok(())
}
