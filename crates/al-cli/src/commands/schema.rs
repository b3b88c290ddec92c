//! Schema command implementation

use al_schema::{Catalog, ConstraintKind, LiveSchema, SchemaIntrospect};
use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, SchemaArgs};
use crate::context::RuntimeContext;

/// Execute the schema command
pub async fn execute(args: &SchemaArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let catalog = LiveSchema::new(ctx.db())
        .snapshot()
        .await
        .context("Failed to read the installed schema")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        print!("{}", render(&catalog)?);
    }
    Ok(())
}

/// Tables in dependency order, then enum domains.
fn render(catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    if catalog.tables.is_empty() {
        out.push_str("No tables installed\n");
    }

    for table in catalog.table_order()? {
        let Some(shape) = catalog.table(&table) else {
            continue;
        };
        out.push_str(&format!("{table}\n"));
        for (name, column) in &shape.columns {
            let mut line = format!("  {name:<24} {}", column.data_type);
            if !column.nullable {
                line.push_str(" NOT NULL");
            }
            if column.has_default {
                line.push_str(" DEFAULT");
            }
            out.push_str(&line);
            out.push('\n');
        }
        for constraint in catalog.constraints_on(&table) {
            let detail = match &constraint.kind {
                ConstraintKind::Unique { column } => format!("unique({column})"),
                ConstraintKind::ForeignKey {
                    column,
                    ref_table,
                    ref_column,
                    on_delete,
                } => format!(
                    "{column} -> {ref_table}.{ref_column} on delete {}",
                    on_delete.as_str()
                ),
                ConstraintKind::Check { expression, .. } => format!("check({expression})"),
                ConstraintKind::EnumBinding { column, enum_name } => {
                    format!("{column} in {enum_name}")
                }
            };
            out.push_str(&format!("  - {}: {detail}\n", constraint.name));
        }
        out.push('\n');
    }

    for (name, values) in &catalog.enums {
        out.push_str(&format!("enum {name}: {}\n", values.join(", ")));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
