//! The marketplace migration registry.
//!
//! Units are grouped by the area of the data model they touch; the runner
//! orders them by version token. The history carries some inconsistencies
//! that are kept as recorded:
//!
//! - `120231203110000-add-fuel-consumption-to-vehicles` has an extra leading
//!   digit and sorts as `20231203110000`.
//! - Token `20240210093000` is shared by two units that rename the
//!   notifications table in opposite directions;
//!   `20240302110000-restore-notifications-table` settles the final name.
//! - reported_contents swaps `user_id` for a `reporters` list and later
//!   swaps it back.
//!
//! The last unit in version order decides the final shape.

mod commerce;
mod messaging;
mod referrals;
mod reports;
mod test_drives;
mod users;
mod vehicles;

use al_schema::{ColumnDef, ColumnType, Migration, SchemaResult};

/// Every marketplace unit, unsorted.
pub fn marketplace_migrations() -> SchemaResult<Vec<Migration>> {
    let groups = [
        users::migrations()?,
        messaging::migrations()?,
        vehicles::migrations()?,
        reports::migrations()?,
        test_drives::migrations()?,
        commerce::migrations()?,
        referrals::migrations()?,
    ];
    Ok(groups.into_iter().flatten().collect())
}

/// `id`, the given columns, then `created_at` / `updated_at`.
fn entity(columns: impl IntoIterator<Item = ColumnDef>) -> Vec<ColumnDef> {
    std::iter::once(ColumnDef::id())
        .chain(columns)
        .chain(ColumnDef::timestamps())
        .collect()
}

fn text(name: &str) -> ColumnDef {
    ColumnDef::new(name, ColumnType::Text)
}

/// A required reference column holding another row's id.
fn reference(name: &str) -> ColumnDef {
    text(name).not_null()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
