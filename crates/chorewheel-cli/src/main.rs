use clap::Parser;
use owo_colors::{OwoColorize, Style};

use chorewheel_core::db;
use chorewheel_core::error::CoreError;
use chorewheel_core::repository::SqliteRepository;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let config = config::Config::new().unwrap_or_default();

    let db_pool = match db::establish_connection(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let cli = cli::Cli::parse();
    let household = cli.household.as_deref().or(config.household.as_deref());

    let result = match cli.command {
        cli::Commands::Household(command) => {
            commands::household::household_command(&repository, command).await
        }
        cli::Commands::Child(command) => {
            commands::child::child_command(&repository, command, household).await
        }
        cli::Commands::Template(command) => {
            commands::template::template_command(&repository, command, household).await
        }
        cli::Commands::Generate(command) => {
            commands::generate::generate_assignments(&repository, command, household).await
        }
        cli::Commands::List(command) => {
            commands::list::list_assignments(&repository, command, household).await
        }
        cli::Commands::Done(command) => {
            commands::done::done_assignment(&repository, command).await
        }
        cli::Commands::Reassign(command) => {
            commands::reassign::reassign_assignment(&repository, command).await
        }
        cli::Commands::Overdue(command) => {
            commands::overdue::sweep_overdue(&repository, command, household).await
        }
        cli::Commands::Points(command) => {
            commands::points::show_points(&repository, command, household).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    let core_error = err
        .downcast_ref::<CoreError>()
        .or_else(|| err.source().and_then(|e| e.downcast_ref::<CoreError>()));

    if let Some(core_error) = core_error {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRuleConfig(s) => {
                eprintln!(
                    "{} Invalid rule configuration: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::AlreadyCompleted(id) => {
                eprintln!(
                    "{} Assignment {} is already completed.",
                    "Error:".style(error_style),
                    id.simple().to_string()[..7].to_string().yellow()
                );
            }
            CoreError::DuplicateAssignment(key) => {
                eprintln!(
                    "{} That assignment already exists: {}",
                    "Error:".style(error_style),
                    key
                );
            }
            CoreError::ForbiddenTransition(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(assignments) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, summary) in assignments {
                    eprintln!("  {} ({})", id.yellow(), summary);
                }
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
