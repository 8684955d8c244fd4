use anyhow::Result;
use chorewheel_core::repository::Repository;
use chrono::Local;
use owo_colors::OwoColorize;
use std::collections::HashMap;

use crate::cli::GenerateCommand;
use crate::parser::parse_date;
use crate::util::{require_household, resolve_template};
use crate::views::table::{display_assignments, ViewAssignment};

pub async fn generate_assignments(
    repo: &impl Repository,
    command: GenerateCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;
    let date = match command.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let task_id = match command.task.as_deref() {
        Some(name) => Some(resolve_template(repo, household.id, name).await?.id),
        None => None,
    };

    let report = repo.generate_for_date(household.id, date, task_id).await?;

    if report.generated_count == 0 {
        println!("Nothing to generate for {}, already up to date.", date);
    } else {
        println!(
            "Generated {} assignment(s) for {}:",
            report.generated_count, date
        );

        let templates = repo.find_templates(household.id).await?;
        let children = repo.find_children(household.id).await?;
        let template_names: HashMap<_, _> =
            templates.iter().map(|t| (t.id, t.name.clone())).collect();
        let child_names: HashMap<_, _> = children.iter().map(|c| (c.id, c.name.clone())).collect();

        let view: Vec<ViewAssignment> = report
            .assignments
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
    }

    for issue in &report.issues {
        eprintln!(
            "{} template '{}' skipped: {}",
            "Warning:".yellow().bold(),
            issue.template_name,
            issue.reason
        );
    }

    Ok(())
}
