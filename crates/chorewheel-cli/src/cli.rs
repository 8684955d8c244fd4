use clap::{Parser, Subcommand, ValueEnum};
use chorewheel_core::models::AssignmentStatus;

/// Household chore tracker with rotating duties and point rewards
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Household to operate on (overrides the configured default)
    #[clap(long, global = true)]
    pub household: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage households
    Household(HouseholdCommand),
    /// Manage children
    Child(ChildCommand),
    /// Manage task templates
    Template(TemplateCommand),
    /// Generate the day's assignments
    Generate(GenerateCommand),
    /// List assignments
    List(ListCommand),
    /// Mark an assignment as completed
    Done(DoneCommand),
    /// Move an assignment to another child
    Reassign(ReassignCommand),
    /// Flip past-dated pending assignments to overdue
    Overdue(OverdueCommand),
    /// Show a child's earned points
    Points(PointsCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct HouseholdCommand {
    #[command(subcommand)]
    pub action: HouseholdAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum HouseholdAction {
    /// Create a household
    Add { name: String },
    /// List households
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct ChildCommand {
    #[command(subcommand)]
    pub action: ChildAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ChildAction {
    /// Add a child to the household
    Add { name: String },
    /// List the household's children with their points
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TemplateAction {
    /// Add a task template
    Add(TemplateAddCommand),
    /// List the household's templates
    List,
    /// Pause a template (skipped by generation until resumed)
    Pause {
        name: String,
        /// Skip the confirmation prompt
        #[clap(short, long)]
        force: bool,
    },
    /// Resume a paused template
    Resume { name: String },
}

#[derive(Parser, Debug, Clone)]
pub struct TemplateAddCommand {
    /// The name of the chore
    pub name: String,
    /// Points earned on completion
    #[clap(short, long, default_value_t = 0)]
    pub points: i64,
    /// A longer description
    #[clap(short, long)]
    pub description: Option<String>,
    /// Recurrence kind
    #[clap(long, value_enum)]
    pub rule: RuleKind,
    /// Days of week for repeating chores (mon,tue,wed,thu,fri,sat,sun)
    #[clap(long)]
    pub on: Option<String>,
    /// Children the chore is assigned to, in rotation order
    #[clap(long, num_args = 1..)]
    pub child: Vec<String>,
    /// Rotation mode for weekly rotations
    #[clap(long, value_enum, default_value_t = RotationKind::Alternating)]
    pub rotation: RotationKind,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Every day, for every listed child (or all children)
    Daily,
    /// On listed weekdays, for every listed child
    Repeating,
    /// One child on duty per week
    Rotation,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    /// Cycle through the full child list, one child per week
    Alternating,
    /// First child on even weeks, second on odd weeks
    OddEven,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateCommand {
    /// Date to generate for (defaults to today)
    #[clap(short, long)]
    pub date: Option<String>,
    /// Restrict generation to a single template by name
    #[clap(long)]
    pub task: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Show only one child's assignments
    #[clap(long)]
    pub child: Option<String>,
    /// Show only one date
    #[clap(short, long)]
    pub date: Option<String>,
    /// Show only one status
    #[clap(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Completed,
    Overdue,
}

impl From<StatusArg> for AssignmentStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => AssignmentStatus::Pending,
            StatusArg::Completed => AssignmentStatus::Completed,
            StatusArg::Overdue => AssignmentStatus::Overdue,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// Assignment ID (unambiguous prefix is enough)
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ReassignCommand {
    /// Assignment ID (unambiguous prefix is enough)
    pub id: String,
    /// The child taking over
    pub child: String,
}

#[derive(Parser, Debug, Clone)]
pub struct OverdueCommand {
    /// Treat this date as "today" (defaults to the actual date)
    #[clap(long)]
    pub as_of: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PointsCommand {
    /// The child's name
    pub child: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_date() {
        let cli = Cli::parse_from(["chorewheel", "generate", "--date", "2025-06-02"]);
        match cli.command {
            Commands::Generate(cmd) => assert_eq!(cmd.date.as_deref(), Some("2025-06-02")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_template_add_with_rotation() {
        let cli = Cli::parse_from([
            "chorewheel",
            "template",
            "add",
            "Take out trash",
            "--points",
            "10",
            "--rule",
            "rotation",
            "--child",
            "Emma",
            "Noah",
        ]);
        match cli.command {
            Commands::Template(TemplateCommand {
                action: TemplateAction::Add(cmd),
            }) => {
                assert_eq!(cmd.points, 10);
                assert_eq!(cmd.rule, RuleKind::Rotation);
                assert_eq!(cmd.child, vec!["Emma", "Noah"]);
                assert_eq!(cmd.rotation, RotationKind::Alternating);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
