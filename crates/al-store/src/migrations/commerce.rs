use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20231212090000-create-packages",
            vec![
                SchemaOp::create_enum("package_category", &["dealer", "insurance", "repair"]),
                SchemaOp::create_table(
                    "packages",
                    entity([
                        text("package_name").not_null(),
                        ColumnDef::new("price", ColumnType::decimal(10, 2)).not_null(),
                        ColumnDef::new(
                            "package_category",
                            ColumnType::enumeration("package_category"),
                        )
                        .not_null(),
                    ]),
                    [],
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::drop_table("packages"),
            SchemaOp::drop_enum("package_category"),
        ]),
        Migration::new(
            "20231213090000-create-subscriptions",
            vec![SchemaOp::create_table(
                "subscriptions",
                entity([
                    reference("user_id"),
                    reference("package_id"),
                    text("status")
                        .not_null()
                        .default(DefaultValue::text("active")),
                    ColumnDef::new("current_period_end", ColumnType::Timestamp),
                ]),
                [
                    Constraint::foreign_key("subscriptions", "user_id", "users", OnDelete::Cascade),
                    Constraint::foreign_key(
                        "subscriptions",
                        "package_id",
                        "packages",
                        OnDelete::Restrict,
                    ),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("subscriptions")]),
        Migration::new(
            "20240118090000-add-stripe-ids-to-packages",
            vec![
                SchemaOp::add_column("packages", text("stripe_product_id")),
                SchemaOp::add_column("packages", text("stripe_price_id")),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("packages", "stripe_price_id"),
            SchemaOp::remove_column("packages", "stripe_product_id"),
        ]),
        Migration::new(
            "20240128090000-add-features-to-packages",
            vec![SchemaOp::add_column(
                "packages",
                ColumnDef::new("features", ColumnType::TextList),
            )],
        )?
        .with_down(vec![SchemaOp::remove_column("packages", "features")]),
        Migration::new(
            "20240203090000-create-wallets",
            vec![SchemaOp::create_table(
                "wallets",
                entity([
                    reference("user_id"),
                    ColumnDef::new("reserve_balance", ColumnType::decimal(14, 2))
                        .not_null()
                        .default(DefaultValue::Int(0)),
                ]),
                [
                    Constraint::foreign_key("wallets", "user_id", "users", OnDelete::Cascade),
                    Constraint::unique("wallets", "user_id"),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("wallets")]),
        Migration::new(
            "20240212090000-create-advertisements",
            vec![
                SchemaOp::create_enum("ad_type", &["featured", "sponsored"]),
                SchemaOp::create_table(
                    "advertisements",
                    entity([
                        reference("user_id"),
                        reference("vehicle_id"),
                        ColumnDef::new("ad_type", ColumnType::enumeration("ad_type")).not_null(),
                        ColumnDef::new("daily_budget", ColumnType::decimal(10, 2)),
                        ColumnDef::new("clicks_today", ColumnType::Integer)
                            .not_null()
                            .default(DefaultValue::Int(0)),
                        ColumnDef::new("last_click_date", ColumnType::Date),
                    ]),
                    [
                        Constraint::foreign_key(
                            "advertisements",
                            "user_id",
                            "users",
                            OnDelete::Cascade,
                        ),
                        Constraint::foreign_key(
                            "advertisements",
                            "vehicle_id",
                            "vehicles",
                            OnDelete::Cascade,
                        ),
                    ],
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::drop_table("advertisements"),
            SchemaOp::drop_enum("ad_type"),
        ]),
        Migration::new(
            "20240220090000-add-base-ad-type",
            vec![SchemaOp::add_enum_value("ad_type", "base")],
        )?,
        Migration::new(
            "20240225090000-add-pause-reason-to-advertisements",
            vec![
                SchemaOp::create_enum("pause_reason", &["user", "budget", "system", "none"]),
                SchemaOp::add_column(
                    "advertisements",
                    ColumnDef::new("pause_reason", ColumnType::enumeration("pause_reason"))
                        .not_null()
                        .default(DefaultValue::text("none")),
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("advertisements", "pause_reason"),
            SchemaOp::drop_enum("pause_reason"),
        ]),
        Migration::new(
            "20240301090000-add-click-tracking-to-advertisements",
            vec![
                SchemaOp::add_column(
                    "advertisements",
                    ColumnDef::new("user_clicks", ColumnType::TextList),
                ),
                SchemaOp::add_column(
                    "advertisements",
                    ColumnDef::new("user_leads", ColumnType::TextList),
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("advertisements", "user_leads"),
            SchemaOp::remove_column("advertisements", "user_clicks"),
        ]),
        Migration::new(
            "20240318091000-add-detailer-package-category",
            vec![SchemaOp::add_enum_value("package_category", "detailer")],
        )?,
    ])
}
