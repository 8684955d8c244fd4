use anyhow::Result;
use chorewheel_core::repository::Repository;
use chrono::Local;

use crate::cli::OverdueCommand;
use crate::parser::parse_date;
use crate::util::require_household;

pub async fn sweep_overdue(
    repo: &impl Repository,
    command: OverdueCommand,
    household: Option<&str>,
) -> Result<()> {
    let household = require_household(repo, household).await?;
    let as_of = match command.as_of.as_deref() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let flipped = repo.sweep_overdue(household.id, as_of).await?;
    if flipped == 0 {
        println!("No assignments became overdue.");
    } else {
        println!("Marked {} assignment(s) overdue (as of {}).", flipped, as_of);
    }
    Ok(())
}
