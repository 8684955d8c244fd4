use anyhow::{anyhow, Result};
use chorewheel_core::models::{NewTemplateData, RecurrenceRule, RotationType};
use chorewheel_core::repository::Repository;
use dialoguer::Confirm;
use uuid::Uuid;

use crate::cli::{RotationKind, RuleKind, TemplateAction, TemplateAddCommand, TemplateCommand};
use crate::parser::parse_weekdays;
use crate::util::{require_household, resolve_child, resolve_template};
use crate::views::table::{describe_rule, display_templates, ViewTemplate};

pub async fn template_command(
    repo: &impl Repository,
    command: TemplateCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;

    match command.action {
        TemplateAction::Add(add) => {
            let rule = build_rule(repo, household.id, &add).await?;
            let template = repo
                .add_template(NewTemplateData {
                    household_id: household.id,
                    name: add.name,
                    description: add.description,
                    points: add.points,
                    rule,
                })
                .await?;
            println!(
                "Added template '{}' ({}, {} points)",
                template.name,
                describe_rule(&template.rule),
                template.points
            );
        }
        TemplateAction::List => {
            let templates = repo.find_templates(household.id).await?;
            let view: Vec<ViewTemplate> = templates
                .iter()
                .map(|t| ViewTemplate {
                    name: t.name.clone(),
                    rule: describe_rule(&t.rule),
                    points: t.points,
                    active: t.active,
                })
                .collect();
            display_templates(&view);
        }
        TemplateAction::Pause { name, force } => {
            let template = resolve_template(repo, household.id, &name).await?;
            if !force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Pause '{}'? It will be skipped by generation until resumed.",
                        template.name
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirmation {
                    println!("Pause cancelled.");
                    return Ok(());
                }
            }
            repo.set_template_active(template.id, false).await?;
            println!("Paused template '{}'", template.name);
        }
        TemplateAction::Resume { name } => {
            let template = resolve_template(repo, household.id, &name).await?;
            repo.set_template_active(template.id, true).await?;
            println!("Resumed template '{}'", template.name);
        }
    }
    Ok(())
}

async fn build_rule(
    repo: &impl Repository,
    household_id: Uuid,
    add: &TemplateAddCommand,
) -> Result<RecurrenceRule> {
    let mut assigned_children = Vec::with_capacity(add.child.len());
    for name in &add.child {
        assigned_children.push(resolve_child(repo, household_id, name).await?.id);
    }

    match add.rule {
        RuleKind::Daily => Ok(RecurrenceRule::Daily { assigned_children }),
        RuleKind::Repeating => {
            let on = add
                .on
                .as_deref()
                .ok_or_else(|| anyhow!("Repeating chores need --on (e.g. --on mon,wed,fri)"))?;
            Ok(RecurrenceRule::Repeating {
                repeat_days: parse_weekdays(on)?,
                assigned_children,
            })
        }
        RuleKind::Rotation => Ok(RecurrenceRule::WeeklyRotation {
            rotation_type: match add.rotation {
                RotationKind::Alternating => RotationType::Alternating,
                RotationKind::OddEven => RotationType::OddEvenWeek,
            },
            assigned_children,
        }),
    }
}
