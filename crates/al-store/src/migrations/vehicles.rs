use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20231125090000-create-vehicles",
            vec![
                SchemaOp::create_enum("vehicle_status", &["live", "draft", "sold"]),
                SchemaOp::create_table(
                    "vehicles",
                    entity([
                        reference("dealer_id"),
                        text("slug").not_null(),
                        ColumnDef::new("status", ColumnType::enumeration("vehicle_status"))
                            .not_null()
                            .default(DefaultValue::text("draft")),
                        ColumnDef::new("price", ColumnType::decimal(10, 2)),
                        text("make"),
                        text("model"),
                        ColumnDef::new("year", ColumnType::Integer),
                        ColumnDef::new("kilometres", ColumnType::Integer),
                        text("city"),
                    ]),
                    [Constraint::foreign_key(
                        "vehicles",
                        "dealer_id",
                        "users",
                        OnDelete::Cascade,
                    )],
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::drop_table("vehicles"),
            SchemaOp::drop_enum("vehicle_status"),
        ]),
        // Registered with a stray leading digit; sorts as 20231203110000.
        Migration::new(
            "120231203110000-add-fuel-consumption-to-vehicles",
            vec![SchemaOp::add_column("vehicles", text("fuel_consumption"))],
        )?
        .with_down(vec![SchemaOp::remove_column("vehicles", "fuel_consumption")]),
        Migration::new(
            "20231203120000-add-province-and-doors-to-vehicles",
            vec![
                SchemaOp::add_column("vehicles", text("province")),
                SchemaOp::add_column("vehicles", ColumnDef::new("doors", ColumnType::Integer)),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("vehicles", "doors"),
            SchemaOp::remove_column("vehicles", "province"),
        ]),
        Migration::new(
            "20231210090000-rename-kilometres-to-mileage",
            vec![SchemaOp::rename_column("vehicles", "kilometres", "mileage")],
        )?
        .with_down(vec![SchemaOp::rename_column("vehicles", "mileage", "kilometres")]),
        Migration::new(
            "20231218100000-change-fuel-consumption-to-double",
            vec![SchemaOp::change_column_type(
                "vehicles",
                "fuel_consumption",
                ColumnType::Double,
            )],
        )?
        .with_down(vec![SchemaOp::change_column_type(
            "vehicles",
            "fuel_consumption",
            ColumnType::Text,
        )]),
        Migration::new(
            "20240108100000-add-unique-slug-to-vehicles",
            vec![SchemaOp::add_constraint(Constraint::unique("vehicles", "slug"))],
        )?
        .with_down(vec![SchemaOp::drop_constraint("vehicles_slug_key")]),
        Migration::new(
            "20240122090000-add-transmission-and-featured-to-vehicles",
            vec![
                SchemaOp::add_column("vehicles", text("transmission")),
                SchemaOp::add_column(
                    "vehicles",
                    ColumnDef::new("is_featured", ColumnType::Boolean)
                        .not_null()
                        .default(DefaultValue::Bool(false)),
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::remove_column("vehicles", "is_featured"),
            SchemaOp::remove_column("vehicles", "transmission"),
        ]),
        Migration::new(
            "20240305100000-widen-vehicle-price",
            vec![SchemaOp::change_column_type(
                "vehicles",
                "price",
                ColumnType::decimal(12, 2),
            )],
        )?
        .with_down(vec![SchemaOp::change_column_type(
            "vehicles",
            "price",
            ColumnType::decimal(10, 2),
        )]),
    ])
}
