use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20231205090000-create-test-drive-requests",
            vec![SchemaOp::create_table(
                "test_drive_requests",
                entity([
                    reference("user_id"),
                    reference("vehicle_id"),
                    ColumnDef::new("requested_date", ColumnType::Timestamp).not_null(),
                    text("message"),
                ]),
                [
                    Constraint::foreign_key(
                        "test_drive_requests",
                        "user_id",
                        "users",
                        OnDelete::Cascade,
                    ),
                    Constraint::foreign_key(
                        "test_drive_requests",
                        "vehicle_id",
                        "vehicles",
                        OnDelete::Cascade,
                    ),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("test_drive_requests")]),
        Migration::new(
            "20231206090000-create-test-drive-notifications",
            vec![SchemaOp::create_table(
                "test_drive_notifications",
                entity([
                    reference("from_user_id"),
                    reference("to_user_id"),
                    reference("test_drive_request_id"),
                    ColumnDef::new("is_read", ColumnType::Boolean)
                        .not_null()
                        .default(DefaultValue::Bool(false)),
                ]),
                [
                    Constraint::foreign_key(
                        "test_drive_notifications",
                        "from_user_id",
                        "users",
                        OnDelete::Cascade,
                    ),
                    Constraint::foreign_key(
                        "test_drive_notifications",
                        "to_user_id",
                        "users",
                        OnDelete::Cascade,
                    ),
                    Constraint::foreign_key(
                        "test_drive_notifications",
                        "test_drive_request_id",
                        "test_drive_requests",
                        OnDelete::Cascade,
                    ),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("test_drive_notifications")]),
        Migration::new(
            "20240112090000-rename-notification-user-columns",
            vec![
                SchemaOp::rename_column("test_drive_notifications", "from_user_id", "sender_id"),
                SchemaOp::rename_column("test_drive_notifications", "to_user_id", "receiver_id"),
            ],
        )?
        .with_down(vec![
            SchemaOp::rename_column("test_drive_notifications", "receiver_id", "to_user_id"),
            SchemaOp::rename_column("test_drive_notifications", "sender_id", "from_user_id"),
        ]),
        // The next two units share a token and undo each other.
        Migration::new(
            "20240210093000-rename-test-drive-notifications",
            vec![SchemaOp::rename_table(
                "test_drive_notifications",
                "notifications",
            )],
        )?
        .with_down(vec![SchemaOp::rename_table(
            "notifications",
            "test_drive_notifications",
        )]),
        Migration::new(
            "20240210093000-revert-notification-table-name",
            vec![SchemaOp::rename_table(
                "notifications",
                "test_drive_notifications",
            )],
        )?
        .with_down(vec![SchemaOp::rename_table(
            "test_drive_notifications",
            "notifications",
        )]),
        Migration::new(
            "20240302110000-restore-notifications-table",
            vec![SchemaOp::rename_table(
                "test_drive_notifications",
                "notifications",
            )],
        )?
        .with_down(vec![SchemaOp::rename_table(
            "notifications",
            "test_drive_notifications",
        )]),
        Migration::new(
            "20240315090000-add-referral-to-notifications",
            vec![
                SchemaOp::add_column("notifications", text("referral_id")),
                SchemaOp::add_constraint(Constraint::foreign_key(
                    "notifications",
                    "referral_id",
                    "referrals",
                    OnDelete::Cascade,
                )),
                SchemaOp::drop_not_null("notifications", "test_drive_request_id"),
            ],
        )?
        .with_down(vec![
            SchemaOp::set_not_null("notifications", "test_drive_request_id"),
            SchemaOp::drop_constraint("notifications_referral_id_fkey"),
            SchemaOp::remove_column("notifications", "referral_id"),
        ]),
    ])
}
