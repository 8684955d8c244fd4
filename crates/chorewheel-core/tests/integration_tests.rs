use chorewheel_core::db::establish_connection;
use chorewheel_core::error::CoreError;
use chorewheel_core::models::*;
use chorewheel_core::repository::{
    AssignmentRepository, ChildRepository, CompletionRepository, HouseholdRepository,
    SqliteRepository, TemplateRepository,
};
use chorewheel_core::rotation;
use chrono::{Duration, NaiveDate};
use tempfile::TempDir;
use uuid::Uuid;

/// Helper function to create a test database
async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

async fn create_test_household(repo: &SqliteRepository, name: &str) -> Household {
    repo.add_household(name.to_string())
        .await
        .expect("Failed to create test household")
}

async fn create_test_child(repo: &SqliteRepository, household_id: Uuid, name: &str) -> Child {
    repo.add_child(household_id, name.to_string())
        .await
        .expect("Failed to create test child")
}

async fn create_template(
    repo: &SqliteRepository,
    household_id: Uuid,
    name: &str,
    points: i64,
    rule: RecurrenceRule,
) -> TaskTemplate {
    repo.add_template(NewTemplateData {
        household_id,
        name: name.to_string(),
        description: None,
        points,
        rule,
    })
    .await
    .expect("Failed to create test template")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Monday whose ISO week index is 0, so the first listed child is on duty
/// for both rotation modes.
fn week_zero_monday() -> NaiveDate {
    let monday = date(2001, 1, 1);
    assert_eq!(rotation::week_index(monday), 0);
    monday
}

#[tokio::test]
async fn test_end_to_end_generation_and_completion() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Smith family").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let noah = create_test_child(&repo, household.id, "Noah").await;

    let feed_pet = create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;
    let trash = create_template(
        &repo,
        household.id,
        "Take out trash",
        10,
        RecurrenceRule::WeeklyRotation {
            rotation_type: RotationType::Alternating,
            assigned_children: vec![emma.id, noah.id],
        },
    )
    .await;

    let monday = week_zero_monday();
    let report = repo
        .generate_for_date(household.id, monday, None)
        .await
        .expect("Failed to generate assignments");

    // 2 daily fan-out rows + 1 rotation row, Emma on duty in week 0.
    assert_eq!(report.generated_count, 3);
    assert!(report.issues.is_empty());
    let trash_row = report
        .assignments
        .iter()
        .find(|a| a.task_id == trash.id)
        .expect("rotation assignment missing");
    assert_eq!(trash_row.child_id, emma.id);
    assert!(report
        .assignments
        .iter()
        .all(|a| a.status == AssignmentStatus::Pending));

    let emma_feed = report
        .assignments
        .iter()
        .find(|a| a.task_id == feed_pet.id && a.child_id == emma.id)
        .expect("Emma's feed-pet assignment missing");

    let (completed, completion) = repo
        .complete_assignment(emma_feed.id)
        .await
        .expect("Failed to complete assignment");
    assert_eq!(completed.status, AssignmentStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(completion.points_earned, 5);
    assert_eq!(repo.total_points_for_child(emma.id).await.unwrap(), 5);

    // Re-generating for the same date creates nothing.
    let again = repo
        .generate_for_date(household.id, monday, None)
        .await
        .expect("Failed to re-generate");
    assert_eq!(again.generated_count, 0);
}

#[tokio::test]
async fn test_generation_is_idempotent_across_the_week() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Rotation house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let noah = create_test_child(&repo, household.id, "Noah").await;

    create_template(
        &repo,
        household.id,
        "Take out trash",
        10,
        RecurrenceRule::WeeklyRotation {
            rotation_type: RotationType::Alternating,
            assigned_children: vec![emma.id, noah.id],
        },
    )
    .await;

    let monday = week_zero_monday();
    let first = repo
        .generate_for_date(household.id, monday, None)
        .await
        .unwrap();
    assert_eq!(first.generated_count, 1);

    // Later days of the same ISO week are already covered.
    for offset in 1..7 {
        let later = repo
            .generate_for_date(household.id, monday + Duration::days(offset), None)
            .await
            .unwrap();
        assert_eq!(later.generated_count, 0, "day offset {}", offset);
    }

    // The next week rotates to Noah.
    let next = repo
        .generate_for_date(household.id, monday + Duration::days(7), None)
        .await
        .unwrap();
    assert_eq!(next.generated_count, 1);
    assert_eq!(next.assignments[0].child_id, noah.id);
}

#[tokio::test]
async fn test_repeating_template_weekday_filtering() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Weekday house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;

    create_template(
        &repo,
        household.id,
        "Water plants",
        3,
        RecurrenceRule::Repeating {
            repeat_days: vec![0, 2, 4], // Mon, Wed, Fri
            assigned_children: vec![emma.id],
        },
    )
    .await;

    let monday = week_zero_monday();
    let tuesday = repo
        .generate_for_date(household.id, monday + Duration::days(1), None)
        .await
        .unwrap();
    assert_eq!(tuesday.generated_count, 0);

    let wednesday = repo
        .generate_for_date(household.id, monday + Duration::days(2), None)
        .await
        .unwrap();
    assert_eq!(wednesday.generated_count, 1);
    assert_eq!(wednesday.assignments[0].child_id, emma.id);
}

#[tokio::test]
async fn test_completion_is_terminal_and_credits_once() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Terminal house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![emma.id],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];

    repo.complete_assignment(assignment.id).await.unwrap();

    let second = repo.complete_assignment(assignment.id).await;
    assert!(matches!(second, Err(CoreError::AlreadyCompleted(_))));

    // Exactly one completion row, ever.
    let completion = repo
        .find_completion_for_assignment(assignment.id)
        .await
        .unwrap();
    assert!(completion.is_some());
    assert_eq!(repo.total_points_for_child(emma.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_point_capture_at_generation_time() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Audit house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let template = create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];
    assert_eq!(assignment.points, 5);

    // Raise the template's points after generation.
    repo.update_template(
        template.id,
        UpdateTemplateData {
            points: Some(50),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (_, completion) = repo.complete_assignment(assignment.id).await.unwrap();
    assert_eq!(completion.points_earned, 5);
    assert_eq!(repo.total_points_for_child(emma.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_reassignment_rules() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Reassign house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let noah = create_test_child(&repo, household.id, "Noah").await;

    let other = create_test_household(&repo, "Other house").await;
    let stranger = create_test_child(&repo, other.id, "Liam").await;

    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![emma.id],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];

    // Cross-household reassignment is rejected.
    let cross = repo.reassign_assignment(assignment.id, stranger.id).await;
    assert!(matches!(cross, Err(CoreError::InvalidInput(_))));

    // Valid reassignment preserves task, date, and status.
    let moved = repo
        .reassign_assignment(assignment.id, noah.id)
        .await
        .unwrap();
    assert_eq!(moved.child_id, noah.id);
    assert_eq!(moved.task_id, assignment.task_id);
    assert_eq!(moved.date, assignment.date);
    assert_eq!(moved.status, AssignmentStatus::Pending);

    // After completion the child is locked in.
    repo.complete_assignment(assignment.id).await.unwrap();
    let locked = repo.reassign_assignment(assignment.id, emma.id).await;
    assert!(matches!(locked, Err(CoreError::ForbiddenTransition(_))));

    let unchanged = repo
        .find_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.child_id, noah.id);
}

#[tokio::test]
async fn test_overdue_sweep_and_completion_of_overdue() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Overdue house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let monday = week_zero_monday();
    let report = repo
        .generate_for_date(household.id, monday, None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];

    // Sweeping as of the same day flips nothing.
    let same_day = repo.sweep_overdue(household.id, monday).await.unwrap();
    assert_eq!(same_day, 0);

    let flipped = repo
        .sweep_overdue(household.id, monday + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(flipped, 1);

    let overdue = repo
        .find_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(overdue.status, AssignmentStatus::Overdue);
    assert!(overdue.completed_at.is_none());

    // Overdue assignments can still be completed, with the usual credit.
    let (completed, completion) = repo.complete_assignment(assignment.id).await.unwrap();
    assert_eq!(completed.status, AssignmentStatus::Completed);
    assert_eq!(completion.points_earned, 5);
    assert_eq!(repo.total_points_for_child(emma.id).await.unwrap(), 5);

    // Completed rows are never swept back to overdue.
    let after = repo
        .sweep_overdue(household.id, monday + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(after, 0);
}

#[tokio::test]
async fn test_mark_overdue_single_assignment() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Single overdue house").await;
    create_test_child(&repo, household.id, "Emma").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];

    let overdue = repo.mark_overdue(assignment.id).await.unwrap();
    assert_eq!(overdue.status, AssignmentStatus::Overdue);

    // Idempotent on already-overdue rows.
    let again = repo.mark_overdue(assignment.id).await.unwrap();
    assert_eq!(again.status, AssignmentStatus::Overdue);

    repo.complete_assignment(assignment.id).await.unwrap();
    let forbidden = repo.mark_overdue(assignment.id).await;
    assert!(matches!(forbidden, Err(CoreError::ForbiddenTransition(_))));
}

#[tokio::test]
async fn test_childless_household_generates_nothing() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Empty nest").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    assert_eq!(report.generated_count, 0);
    assert!(report.issues.is_empty());
}

#[tokio::test]
async fn test_malformed_template_is_reported_not_fatal() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Mixed house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;

    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    // Passes structural validation at creation, but half the roster no
    // longer matches any household child.
    let broken = create_template(
        &repo,
        household.id,
        "Broken rotation",
        10,
        RecurrenceRule::WeeklyRotation {
            rotation_type: RotationType::Alternating,
            assigned_children: vec![emma.id, Uuid::now_v7()],
        },
    )
    .await;

    // Week 0: the rotation lands on Emma, so both templates generate.
    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    assert_eq!(report.generated_count, 2);
    assert!(report.issues.is_empty());

    // Week 1: the rotation lands on the unknown child. The daily template
    // still generates; the broken one shows up as a per-template issue.
    let next_week = repo
        .generate_for_date(household.id, week_zero_monday() + Duration::days(7), None)
        .await
        .unwrap();
    assert_eq!(next_week.generated_count, 1);
    assert_eq!(next_week.issues.len(), 1);
    assert_eq!(next_week.issues[0].template_id, broken.id);
}

#[tokio::test]
async fn test_generate_for_single_template() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Targeted house").await;
    create_test_child(&repo, household.id, "Emma").await;

    let feed = create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;
    create_template(
        &repo,
        household.id,
        "Sweep floor",
        2,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), Some(feed.id))
        .await
        .unwrap();
    assert_eq!(report.generated_count, 1);
    assert_eq!(report.assignments[0].task_id, feed.id);

    let missing = repo
        .generate_for_date(household.id, week_zero_monday(), Some(Uuid::now_v7()))
        .await;
    assert!(matches!(missing, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_inactive_template_is_skipped_until_resumed() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Paused house").await;
    create_test_child(&repo, household.id, "Emma").await;
    let template = create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    repo.set_template_active(template.id, false).await.unwrap();
    let paused = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    assert_eq!(paused.generated_count, 0);

    repo.set_template_active(template.id, true).await.unwrap();
    let resumed = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    assert_eq!(resumed.generated_count, 1);
}

#[tokio::test]
async fn test_assignment_query_filters() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Query house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let noah = create_test_child(&repo, household.id, "Noah").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let monday = week_zero_monday();
    repo.generate_for_date(household.id, monday, None)
        .await
        .unwrap();
    repo.generate_for_date(household.id, monday + Duration::days(1), None)
        .await
        .unwrap();

    let all = repo
        .find_assignments(&AssignmentQuery {
            household_id: Some(household.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    let emmas = repo
        .find_assignments(&AssignmentQuery {
            child_id: Some(emma.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(emmas.len(), 2);
    assert!(emmas.iter().all(|a| a.child_id == emma.id));

    let noah_monday = repo
        .find_assignments(&AssignmentQuery {
            child_id: Some(noah.id),
            date: Some(monday),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(noah_monday.len(), 1);

    repo.complete_assignment(noah_monday[0].id).await.unwrap();
    let pending = repo
        .find_assignments(&AssignmentQuery {
            household_id: Some(household.id),
            status: Some(AssignmentStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 3);
}

#[tokio::test]
async fn test_template_validation_at_creation() {
    let (repo, _temp_dir) = setup_test_db().await;
    let household = create_test_household(&repo, "Validation house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;

    let bad_rotation = repo
        .add_template(NewTemplateData {
            household_id: household.id,
            name: "Solo rotation".to_string(),
            description: None,
            points: 10,
            rule: RecurrenceRule::WeeklyRotation {
                rotation_type: RotationType::Alternating,
                assigned_children: vec![emma.id],
            },
        })
        .await;
    assert!(matches!(
        bad_rotation,
        Err(CoreError::InvalidRuleConfig(_))
    ));

    let bad_days = repo
        .add_template(NewTemplateData {
            household_id: household.id,
            name: "No days".to_string(),
            description: None,
            points: 1,
            rule: RecurrenceRule::Repeating {
                repeat_days: vec![],
                assigned_children: vec![emma.id],
            },
        })
        .await;
    assert!(matches!(bad_days, Err(CoreError::InvalidRuleConfig(_))));

    let negative_points = repo
        .add_template(NewTemplateData {
            household_id: household.id,
            name: "Negative".to_string(),
            description: None,
            points: -1,
            rule: RecurrenceRule::Daily {
                assigned_children: vec![],
            },
        })
        .await;
    assert!(matches!(negative_points, Err(CoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_rule_edits_affect_only_future_generation() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Edit house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let template = create_template(
        &repo,
        household.id,
        "Water plants",
        3,
        RecurrenceRule::Repeating {
            repeat_days: vec![0],
            assigned_children: vec![emma.id],
        },
    )
    .await;

    let monday = week_zero_monday();
    let before = repo
        .generate_for_date(household.id, monday, None)
        .await
        .unwrap();
    assert_eq!(before.generated_count, 1);

    // Switch the rule to Wednesdays only.
    repo.update_template(
        template.id,
        UpdateTemplateData {
            rule: Some(RecurrenceRule::Repeating {
                repeat_days: vec![2],
                assigned_children: vec![emma.id],
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Monday's existing assignment is untouched; next Monday generates
    // nothing, Wednesday does.
    let next_monday = repo
        .generate_for_date(household.id, monday + Duration::days(7), None)
        .await
        .unwrap();
    assert_eq!(next_monday.generated_count, 0);

    let wednesday = repo
        .generate_for_date(household.id, monday + Duration::days(9), None)
        .await
        .unwrap();
    assert_eq!(wednesday.generated_count, 1);

    let monday_row = repo
        .find_assignments(&AssignmentQuery {
            household_id: Some(household.id),
            date: Some(monday),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(monday_row.len(), 1);
}

#[tokio::test]
async fn test_odd_even_rotation_parity() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Parity house").await;
    let emma = create_test_child(&repo, household.id, "Emma").await;
    let noah = create_test_child(&repo, household.id, "Noah").await;

    create_template(
        &repo,
        household.id,
        "Recycling",
        8,
        RecurrenceRule::WeeklyRotation {
            rotation_type: RotationType::OddEvenWeek,
            assigned_children: vec![emma.id, noah.id],
        },
    )
    .await;

    let monday = week_zero_monday();
    for week in 0..4 {
        let report = repo
            .generate_for_date(household.id, monday + Duration::weeks(week), None)
            .await
            .unwrap();
        assert_eq!(report.generated_count, 1);
        let expected = if week % 2 == 0 { emma.id } else { noah.id };
        assert_eq!(report.assignments[0].child_id, expected, "week {}", week);
    }
}

#[tokio::test]
async fn test_assignment_id_prefix_lookup() {
    let (repo, _temp_dir) = setup_test_db().await;

    let household = create_test_household(&repo, "Prefix house").await;
    create_test_child(&repo, household.id, "Emma").await;
    create_template(
        &repo,
        household.id,
        "Feed pet",
        5,
        RecurrenceRule::Daily {
            assigned_children: vec![],
        },
    )
    .await;

    let report = repo
        .generate_for_date(household.id, week_zero_monday(), None)
        .await
        .unwrap();
    let assignment = &report.assignments[0];

    let prefix: String = assignment.id.simple().to_string().chars().take(8).collect();
    let matches = repo.find_assignments_by_id_prefix(&prefix).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, assignment.id);
}
