use anyhow::{anyhow, Result};
use chorewheel_core::error::CoreError;
use chorewheel_core::models::{Child, Household, TaskTemplate};
use chorewheel_core::repository::Repository;
use uuid::Uuid;

pub async fn resolve_assignment_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let assignments = repo.find_assignments_by_id_prefix(short_id).await?;
    if assignments.len() == 1 {
        Ok(assignments[0].id)
    } else if assignments.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No assignment found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let info: Vec<(String, String)> = assignments
            .into_iter()
            .map(|a| (a.id.to_string(), format!("{} ({})", a.date, a.status)))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(info)))
    }
}

/// Resolves the household a command operates on: the --household flag if
/// given, otherwise the configured default.
pub async fn require_household(
    repo: &impl Repository,
    name: Option<&str>,
) -> Result<Household> {
    let name = name.ok_or_else(|| {
        anyhow!(CoreError::InvalidInput(
            "No household given. Pass --household or set one in config.toml.".to_string()
        ))
    })?;
    repo.find_household_by_name(name)
        .await?
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Household '{}' not found", name))))
}

pub async fn resolve_child(
    repo: &impl Repository,
    household_id: Uuid,
    name: &str,
) -> Result<Child> {
    repo.find_child_by_name(household_id, name)
        .await?
        .ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!(
                "Child '{}' not found in this household",
                name
            )))
        })
}

pub async fn resolve_template(
    repo: &impl Repository,
    household_id: Uuid,
    name: &str,
) -> Result<TaskTemplate> {
    let templates = repo.find_templates(household_id).await?;
    templates
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!(
                "Template '{}' not found in this household",
                name
            )))
        })
}
