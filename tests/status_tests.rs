use chrono::{Days, NaiveDate, NaiveDateTime};
use maintenance_scheduler::{DueStatus, ParseDueStatusError, classify};

fn now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

#[test]
fn window_upper_bound_is_inclusive() {
    assert_eq!(classify(now() + Days::new(7), now(), 7), DueStatus::DueSoon);
    assert_eq!(classify(now() + Days::new(8), now(), 7), DueStatus::Pending);
}

#[test]
fn past_due_is_overdue() {
    assert_eq!(classify(now() - Days::new(1), now(), 7), DueStatus::Overdue);
}

#[test]
fn due_today_is_due_soon() {
    assert_eq!(classify(now(), now(), 7), DueStatus::DueSoon);
    assert_eq!(classify(now(), now(), 0), DueStatus::DueSoon);
    assert_eq!(classify(now() + Days::new(1), now(), 0), DueStatus::Pending);
}

#[test]
fn datetime_boundaries_are_exact() {
    let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    let now = at("2024-03-10 12:00:00");
    assert_eq!(classify(at("2024-03-17 12:00:00"), now, 7), DueStatus::DueSoon);
    assert_eq!(classify(at("2024-03-17 12:00:01"), now, 7), DueStatus::Pending);
    assert_eq!(classify(at("2024-03-10 11:59:59"), now, 7), DueStatus::Overdue);
}

#[test]
fn status_serializes_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&DueStatus::DueSoon).unwrap(),
        "\"due_soon\""
    );
    assert_eq!("overdue".parse::<DueStatus>(), Ok(DueStatus::Overdue));
    assert_eq!(" due_soon ".parse::<DueStatus>(), Ok(DueStatus::DueSoon));
    assert!(DueStatus::Overdue.is_alert());
    assert!(!DueStatus::Pending.is_alert());
}

#[test]
fn unknown_status_reports_the_input() {
    let err = "late".parse::<DueStatus>().unwrap_err();
    assert_eq!(err, ParseDueStatusError("late".into()));
    assert!(err.to_string().contains("'late'"));
}
