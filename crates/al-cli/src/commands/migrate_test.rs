use super::*;
use chrono::NaiveDate;

fn state(applied: bool, reversible: bool, registered: bool) -> MigrationState {
    MigrationState {
        id: "20240101000000-create-users".to_string(),
        applied_at: applied.then(|| {
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap()
        }),
        reversible,
        registered,
    }
}

#[test]
fn pending_unit_is_marked() {
    assert_eq!(
        format_state(&state(false, true, true)),
        "pending              20240101000000-create-users"
    );
}

#[test]
fn applied_unit_shows_timestamp_and_flags() {
    let line = format_state(&state(true, false, false));
    assert!(line.starts_with("2024-01-02 03:04:05  20240101000000-create-users"));
    assert!(line.ends_with("[irreversible]  [unknown]"));
}
