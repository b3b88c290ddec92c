use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20240205090000-create-referrals",
            vec![
                SchemaOp::create_enum("referral_job_type", &["repair", "insurance"]),
                SchemaOp::create_enum("referral_status", &["inprogress", "completed"]),
                SchemaOp::create_table(
                    "referrals",
                    entity([
                        reference("customer_id"),
                        text("vehicle_id"),
                        ColumnDef::new("job_type", ColumnType::enumeration("referral_job_type"))
                            .not_null(),
                        ColumnDef::new("status", ColumnType::enumeration("referral_status"))
                            .not_null()
                            .default(DefaultValue::text("inprogress")),
                        text("job_description"),
                    ]),
                    [
                        Constraint::foreign_key(
                            "referrals",
                            "customer_id",
                            "users",
                            OnDelete::Cascade,
                        ),
                        Constraint::foreign_key(
                            "referrals",
                            "vehicle_id",
                            "vehicles",
                            OnDelete::SetNull,
                        ),
                    ],
                ),
            ],
        )?
        .with_down(vec![
            SchemaOp::drop_table("referrals"),
            SchemaOp::drop_enum("referral_status"),
            SchemaOp::drop_enum("referral_job_type"),
        ]),
        Migration::new(
            "20240214090000-add-job-category-to-referrals",
            vec![SchemaOp::add_column("referrals", text("job_category"))],
        )?
        .with_down(vec![SchemaOp::remove_column("referrals", "job_category")]),
        Migration::new(
            "20240318092000-add-detailer-referral-job-type",
            vec![SchemaOp::add_enum_value("referral_job_type", "detailer")],
        )?,
    ])
}
