use chrono::NaiveDate;
use maintenance_scheduler::{
    DueStatus, FrequencyUnit, MaintenanceRecord, MaintenanceRegister, RegisterError,
    ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fleet() -> MaintenanceRegister {
    MaintenanceRegister::from_records(vec![
        MaintenanceRecord::new(
            1,
            "TRK-001",
            "Cambio de aceite",
            date(2024, 1, 1),
            1,
            FrequencyUnit::Months,
        ),
        MaintenanceRecord::new(
            2,
            "TRK-002",
            "Revisión de frenos",
            date(2024, 2, 1),
            1,
            FrequencyUnit::Months,
        ),
        MaintenanceRecord::new(
            3,
            "TRK-002",
            "Inspección diaria",
            date(2024, 2, 27),
            7,
            FrequencyUnit::Days,
        ),
        MaintenanceRecord::new(
            4,
            "BUS-010",
            "Revisión técnica",
            date(2024, 2, 20),
            1,
            FrequencyUnit::Years,
        ),
        MaintenanceRecord::new(
            5,
            "BUS-010",
            "Neumáticos",
            date(2024, 2, 20),
            500,
            FrequencyUnit::Kilometers,
        ),
        MaintenanceRecord::new(
            6,
            "VAN-100",
            "Extintores",
            date(2023, 12, 1),
            2,
            FrequencyUnit::Weeks,
        ),
    ])
    .unwrap()
}

#[test]
fn upsert_stores_computed_next_due() {
    let mut register = MaintenanceRegister::new();
    let record = MaintenanceRecord::new(
        1,
        "TRK-001",
        "Cambio de aceite",
        date(2024, 1, 1),
        5,
        FrequencyUnit::Days,
    )
    .with_business_days(true);
    let saved = register.upsert(record).unwrap();
    assert_eq!(saved.next_due, Some(date(2024, 1, 8)));
    assert_eq!(register.len(), 1);
    assert_eq!(register.next_id(), 2);
}

#[test]
fn upsert_replaces_and_recomputes() {
    let mut register = fleet();
    let mut record = register.get(1).cloned().unwrap();
    record.base_date = date(2024, 2, 1);
    // A stale value supplied by the caller is overwritten.
    record.next_due = Some(date(1999, 1, 1));
    register.upsert(record).unwrap();
    assert_eq!(register.len(), 6);
    assert_eq!(register.get(1).unwrap().next_due, Some(date(2024, 3, 1)));
}

#[test]
fn update_requires_existing_record() {
    let mut register = fleet();
    let record = MaintenanceRecord::new(
        42,
        "TRK-042",
        "Aceite",
        date(2024, 1, 1),
        1,
        FrequencyUnit::Months,
    );
    assert_eq!(register.update(record), Err(RegisterError::NotFound(42)));
}

#[test]
fn invalid_records_are_rejected() {
    let mut register = MaintenanceRegister::new();
    let record =
        MaintenanceRecord::new(1, "", "Aceite", date(2024, 1, 1), 1, FrequencyUnit::Months);
    assert_eq!(
        register.upsert(record).unwrap_err(),
        RegisterError::Validation(ValidationError::MissingField {
            record: 1,
            field: "vehicle"
        })
    );

    let dup = vec![
        MaintenanceRecord::new(1, "A", "Aceite", date(2024, 1, 1), 1, FrequencyUnit::Months),
        MaintenanceRecord::new(1, "B", "Aceite", date(2024, 1, 1), 1, FrequencyUnit::Months),
    ];
    assert_eq!(
        MaintenanceRegister::from_records(dup).unwrap_err(),
        RegisterError::Validation(ValidationError::DuplicateRecord(1))
    );
}

#[test]
fn remove_and_ordering() {
    let mut register = fleet();
    assert!(register.remove(3));
    assert!(!register.remove(3));
    let ids: Vec<i32> = register.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 6]);
    assert_eq!(register.next_id(), 7);
}

#[test]
fn recompute_all_refreshes_every_record() {
    let mut register = fleet();
    register.recompute_all();
    for record in register.records() {
        assert_eq!(record.next_due, Some(record.compute_next_due()));
    }
}

#[test]
fn classify_all_uses_one_now() {
    let register = fleet();
    let classified = register.classify_all(date(2024, 3, 1), 7);
    let statuses: Vec<(i32, DueStatus, i64)> = classified
        .iter()
        .map(|c| (c.record.id, c.status, c.days_until_due))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (1, DueStatus::Overdue, -29),
            (2, DueStatus::DueSoon, 0),
            (3, DueStatus::DueSoon, 4),
            (4, DueStatus::Pending, 356),
            (5, DueStatus::Pending, 20),
            (6, DueStatus::Overdue, -77),
        ]
    );
}

#[test]
fn dashboard_counts_and_alert_order() {
    let register = fleet();
    let summary = register.dashboard(date(2024, 3, 1), 7);
    assert_eq!(summary.total, 6);
    assert_eq!(summary.overdue, 2);
    assert_eq!(summary.due_soon, 2);
    assert_eq!(summary.pending, 2);
    let alert_ids: Vec<i32> = summary.critical_alerts.iter().map(|c| c.record.id).collect();
    assert_eq!(alert_ids, vec![6, 1, 2, 3]);
    assert_eq!(
        summary.to_cli_summary(),
        "records=6, overdue=2, due_soon=2, pending=2, next=6@2023-12-15"
    );
}

#[test]
fn dataframe_view_has_expected_shape() {
    let register = fleet();
    let df = register.dataframe(date(2024, 3, 1), 7).unwrap();
    assert_eq!(df.height(), 6);
    let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "vehicle",
            "program",
            "frequency",
            "business_days",
            "base_date",
            "next_due",
            "status",
            "days_until_due"
        ]
    );
    let status = df.column("status").unwrap().str().unwrap();
    assert_eq!(status.get(0), Some("overdue"));
    assert_eq!(status.get(3), Some("pending"));
    let frequency = df.column("frequency").unwrap().str().unwrap();
    assert_eq!(frequency.get(4), Some("500 Kilómetros"));

    let empty = MaintenanceRegister::new().dataframe(date(2024, 3, 1), 7).unwrap();
    assert_eq!(empty.height(), 0);
}
