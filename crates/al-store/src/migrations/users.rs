use super::{entity, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20231120090000-create-users",
            vec![
                SchemaOp::create_enum("user_role", &["user", "admin"]),
                SchemaOp::create_table(
                    "users",
                    entity([
                        text("email").not_null(),
                        text("password").not_null(),
                        text("first_name"),
                        text("last_name"),
                        ColumnDef::new("role", ColumnType::enumeration("user_role"))
                            .not_null()
                            .default(DefaultValue::text("user")),
                    ]),
                    [Constraint::unique("users", "email")],
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::drop_table("users"),
            SchemaOp::drop_enum("user_role"),
        ]),
        // Enum growth cannot be undone.
        Migration::new(
            "20231215100000-add-repair-and-insurance-roles",
            vec![
                SchemaOp::add_enum_value("user_role", "repair"),
                SchemaOp::add_enum_value("user_role", "insurance"),
            ],
        )?,
        Migration::new(
            "20240105080000-add-dealer-role",
            vec![SchemaOp::add_enum_value("user_role", "dealer")],
        )?,
        Migration::new(
            "20240115093000-add-profile-fields-to-users",
            vec![
                SchemaOp::add_column("users", text("phone")),
                SchemaOp::add_column("users", text("avatar_url")),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("users", "avatar_url"),
            SchemaOp::remove_column("users", "phone"),
        ]),
        Migration::new(
            "20240201120000-add-verification-to-users",
            vec![
                SchemaOp::add_column(
                    "users",
                    ColumnDef::new("is_verified", ColumnType::Boolean)
                        .not_null()
                        .default(DefaultValue::Bool(false)),
                ),
                SchemaOp::add_column(
                    "users",
                    ColumnDef::new("last_login_at", ColumnType::Timestamp),
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("users", "last_login_at"),
            SchemaOp::remove_column("users", "is_verified"),
        ]),
        Migration::new(
            "20240318090000-add-detailer-role",
            vec![SchemaOp::add_enum_value("user_role", "detailer")],
        )?,
    ])
}
