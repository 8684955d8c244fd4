use anyhow::Result;
use chorewheel_core::models::AssignmentQuery;
use chorewheel_core::repository::Repository;
use std::collections::HashMap;

use crate::cli::ListCommand;
use crate::parser::parse_date;
use crate::util::{require_household, resolve_child};
use crate::views::table::{display_assignments, ViewAssignment};

pub async fn list_assignments(
    repo: &impl Repository,
    command: ListCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;

    let mut query = AssignmentQuery {
        household_id: Some(household.id),
        ..Default::default()
    };
    if let Some(name) = command.child.as_deref() {
        query.child_id = Some(resolve_child(repo, household.id, name).await?.id);
    }
    if let Some(date) = command.date.as_deref() {
        query.date = Some(parse_date(date)?);
    }
    if let Some(status) = command.status {
        query.status = Some(status.into());
    }

    let assignments = repo.find_assignments(&query).await?;

    let templates = repo.find_templates(household.id).await?;
    let children = repo.find_children(household.id).await?;
    let template_names: HashMap<_, _> = templates.iter().map(|t| (t.id, t.name.clone())).collect();
    let child_names: HashMap<_, _> = children.iter().map(|c| (c.id, c.name.clone())).collect();

    let view: Vec<ViewAssignment> = assignments
        .iter()
        .map(|a| ViewAssignment {
            id: a.id,
            task: template_names.get(&a.task_id).cloned().unwrap_or_default(),
            child: child_names.get(&a.child_id).cloned().unwrap_or_default(),
            date: a.date,
            status: a.status,
            points: a.points,
        })
        .collect();
    display_assignments(&view);

    Ok(())
}
