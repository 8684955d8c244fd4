use anyhow::Result;
use chorewheel_core::repository::Repository;

use crate::cli::{HouseholdAction, HouseholdCommand};

pub async fn household_command(repo: &impl Repository, command: HouseholdCommand) -> Result<()> {
    match command.action {
        HouseholdAction::Add { name } => {
            let household = repo.add_household(name).await?;
            println!("Created household '{}'", household.name);
        }
        HouseholdAction::List => {
            let households = repo.find_households().await?;
            if households.is_empty() {
                println!("No households found.");
            }
            for household in households {
                println!("{}", household.name);
            }
        }
    }
    Ok(())
}
