use super::*;

fn id(name: &str) -> MigrationId {
    MigrationId::parse(name).unwrap()
}

#[test]
fn parses_plain_name() {
    let v = id("20231120120000-create-users");
    assert_eq!(v.token(), "20231120120000");
    assert_eq!(v.description(), "create-users");
    assert_eq!(v.to_string(), "20231120120000-create-users");
}

#[test]
fn extra_leading_digit_keeps_trailing_token() {
    let v = id("120231203110000-add-fuel-consumption-to-vehicles");
    assert_eq!(v.token(), "20231203110000");
    assert!(v < id("20231203120000-add-province-to-vehicles"));
    assert!(v > id("20231202090000-create-reviews"));
}

#[test]
fn non_digit_prefix_is_dropped() {
    let v = id("v20240101000000-seed");
    assert_eq!(v.to_string(), "20240101000000-seed");
}

#[test]
fn duplicate_tokens_order_by_description() {
    let rename = id("20240210093000-rename-test-drive-notifications");
    let revert = id("20240210093000-revert-notification-table-name");
    assert!(rename < revert);
}

#[test]
fn rejects_malformed_names() {
    for name in [
        "create-users",
        "2023112012-create-users",
        "20231120120000create-users",
        "20231120120000-",
    ] {
        assert!(
            matches!(MigrationId::parse(name), Err(SchemaError::InvalidVersion { .. })),
            "expected rejection for {name}"
        );
    }
}

#[test]
fn timestamp_and_matching() {
    let v = id("20231120120000-create-users");
    assert_eq!(
        v.timestamp().unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2023-11-20 12:00:00"
    );
    assert!(v.matches("20231120120000"));
    assert!(v.matches("20231120120000-create-users"));
    assert!(!v.matches("20231120120000-create"));
}

#[test]
fn from_str_round_trips_display() {
    let v: MigrationId = "20240302110000-restore-notifications-table".parse().unwrap();
    assert_eq!(v, id(&v.to_string()));
}
