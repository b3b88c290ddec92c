use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

fn reported_by_user() -> Vec<SchemaOp> {
    vec![
        SchemaOp::add_column("reported_contents", text("user_id")),
        SchemaOp::add_constraint(Constraint::foreign_key(
            "reported_contents",
            "user_id",
            "users",
            OnDelete::SetNull,
        )),
    ]
}

fn drop_reporting_user() -> Vec<SchemaOp> {
    vec![
        SchemaOp::drop_constraint("reported_contents_user_id_fkey"),
        SchemaOp::remove_column("reported_contents", "user_id"),
    ]
}

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    let reporters = || ColumnDef::new("reporters", ColumnType::TextList);

    Ok(vec![
        Migration::new(
            "20231201090000-create-reported-contents",
            vec![SchemaOp::create_table(
                "reported_contents",
                entity([
                    reference("vehicle_id"),
                    text("user_id"),
                    ColumnDef::new("reports", ColumnType::Integer)
                        .not_null()
                        .default(DefaultValue::Int(0)),
                    text("report_reason"),
                ]),
                [
                    Constraint::foreign_key(
                        "reported_contents",
                        "vehicle_id",
                        "vehicles",
                        OnDelete::Cascade,
                    ),
                    Constraint::foreign_key(
                        "reported_contents",
                        "user_id",
                        "users",
                        OnDelete::SetNull,
                    ),
                    Constraint::check(
                        "reported_contents_reports_check",
                        "reported_contents",
                        "reports",
                        "reports >= 0",
                    ),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("reported_contents")]),
        Migration::new(
            "20231202090000-create-reviews",
            vec![SchemaOp::create_table(
                "reviews",
                entity([
                    reference("reviewer_id"),
                    reference("reviewed_user_id"),
                    ColumnDef::new("rating", ColumnType::Integer).not_null(),
                    text("text"),
                ]),
                [
                    Constraint::foreign_key("reviews", "reviewer_id", "users", OnDelete::Cascade),
                    Constraint::foreign_key(
                        "reviews",
                        "reviewed_user_id",
                        "users",
                        OnDelete::Cascade,
                    ),
                    Constraint::check(
                        "reviews_rating_check",
                        "reviews",
                        "rating",
                        "rating BETWEEN 1 AND 5",
                    ),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("reviews")]),
        Migration::new(
            "20240120090000-replace-user-with-reporters-on-reported-contents",
            drop_reporting_user()
                .into_iter()
                .chain([SchemaOp::add_column("reported_contents", reporters())])
                .collect(),
        )?
        .with_down(
            std::iter::once(SchemaOp::remove_column("reported_contents", "reporters"))
                .chain(reported_by_user())
                .collect(),
        ),
        // Undoes the unit above; the single reporting user is the final shape.
        Migration::new(
            "20240310100000-restore-user-on-reported-contents",
            std::iter::once(SchemaOp::remove_column("reported_contents", "reporters"))
                .chain(reported_by_user())
                .collect(),
        )?
        .with_down(
            drop_reporting_user()
                .into_iter()
                .chain([SchemaOp::add_column("reported_contents", reporters())])
                .collect(),
        ),
    ])
}
