use chorewheel_core::models::{AssignmentStatus, RecurrenceRule};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ViewAssignment {
    pub id: Uuid,
    pub task: String,
    pub child: String,
    pub date: NaiveDate,
    pub status: AssignmentStatus,
    pub points: i64,
}

pub fn display_assignments(assignments: &[ViewAssignment]) {
    if assignments.is_empty() {
        println!("No assignments found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Task", "Child", "Date", "Status", "Points"]);

    for assignment in assignments {
        let mut row = Row::new();
        row.add_cell(Cell::new(&assignment.id.simple().to_string()[..7]));

        let mut task_cell = Cell::new(&assignment.task);
        if assignment.status == AssignmentStatus::Completed {
            task_cell = task_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        }
        row.add_cell(task_cell);

        row.add_cell(Cell::new(&assignment.child));
        row.add_cell(Cell::new(assignment.date.to_string()));

        let status_cell = match assignment.status {
            AssignmentStatus::Pending => Cell::new("pending"),
            AssignmentStatus::Completed => Cell::new("completed").fg(Color::Green),
            AssignmentStatus::Overdue => {
                Cell::new("overdue").fg(Color::Red).add_attribute(Attribute::Bold)
            }
        };
        row.add_cell(status_cell);

        row.add_cell(Cell::new(assignment.points.to_string()));
        table.add_row(row);
    }

    println!("{table}");
}

#[derive(Debug, Clone)]
pub struct ViewTemplate {
    pub name: String,
    pub rule: String,
    pub points: i64,
    pub active: bool,
}

pub fn display_templates(templates: &[ViewTemplate]) {
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Rule", "Points", "Active"]);

    for template in templates {
        let mut row = Row::new();
        let mut name_cell = Cell::new(&template.name);
        if !template.active {
            name_cell = name_cell.fg(Color::DarkGrey);
        }
        row.add_cell(name_cell);
        row.add_cell(Cell::new(&template.rule));
        row.add_cell(Cell::new(template.points.to_string()));
        row.add_cell(Cell::new(if template.active { "yes" } else { "paused" }));
        table.add_row(row);
    }

    println!("{table}");
}

#[derive(Debug, Clone)]
pub struct ViewChild {
    pub name: String,
    pub position: i64,
    pub points: i64,
}

pub fn display_children(children: &[ViewChild]) {
    if children.is_empty() {
        println!("No children found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Points"]);

    for child in children {
        let mut row = Row::new();
        row.add_cell(Cell::new(child.position.to_string()));
        row.add_cell(Cell::new(&child.name));
        row.add_cell(Cell::new(child.points.to_string()));
        table.add_row(row);
    }

    println!("{table}");
}

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Short human summary of a recurrence rule for the template table.
pub fn describe_rule(rule: &RecurrenceRule) -> String {
    match rule {
        RecurrenceRule::Daily { assigned_children } => {
            if assigned_children.is_empty() {
                "daily (all children)".to_string()
            } else {
                format!("daily ({} children)", assigned_children.len())
            }
        }
        RecurrenceRule::Repeating { repeat_days, .. } => {
            let days: Vec<&str> = repeat_days
                .iter()
                .filter_map(|d| WEEKDAY_NAMES.get(*d as usize).copied())
                .collect();
            format!("repeating on {}", days.join(", "))
        }
        RecurrenceRule::WeeklyRotation {
            rotation_type,
            assigned_children,
        } => format!(
            "weekly rotation ({}, {} children)",
            rotation_type,
            assigned_children.len()
        ),
    }
}
