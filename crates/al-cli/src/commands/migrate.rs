//! Migrate command implementation

use al_schema::{MigrationRunner, MigrationState};
use al_store::marketplace_migrations;
use anyhow::{Context, Result};

use crate::cli::{
    GlobalArgs, MigrateArgs, MigrateCommands, MigrateDownArgs, MigrateStatusArgs, MigrateUpArgs,
    OutputFormat,
};
use crate::context::RuntimeContext;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let runner = MigrationRunner::new(ctx.db(), marketplace_migrations()?)
        .context("Invalid migration registry")?;

    match &args.command {
        MigrateCommands::Up(up) => execute_up(&runner, up).await,
        MigrateCommands::Down(down) => execute_down(&runner, down).await,
        MigrateCommands::Status(status) => execute_status(&runner, status).await,
    }
}

async fn execute_up(runner: &MigrationRunner<'_>, args: &MigrateUpArgs) -> Result<()> {
    let report = match &args.to {
        Some(target) => runner.apply_through(target).await,
        None => runner.apply_pending().await,
    }
    .context("Migration failed")?;

    if report.is_empty() {
        println!("Schema is up to date");
        return Ok(());
    }
    for unit in &report.applied {
        println!(
            "  Applied {} ({} ops, {} skipped)",
            unit.id, unit.applied_ops, unit.skipped_ops
        );
    }
    println!();
    println!("Applied {} migration(s)", report.len());
    Ok(())
}

async fn execute_down(runner: &MigrationRunner<'_>, args: &MigrateDownArgs) -> Result<()> {
    let report = runner.revert(args.steps).await.context("Revert failed")?;

    if report.is_empty() {
        println!("Nothing to revert");
        return Ok(());
    }
    for unit in &report.reverted {
        println!("  Reverted {}", unit.id);
    }
    for id in &report.irreversible {
        println!("  Removed {id} from history (no inverse, schema unchanged)");
    }
    println!();
    println!("Reverted {} migration(s)", report.len());
    Ok(())
}

async fn execute_status(runner: &MigrationRunner<'_>, args: &MigrateStatusArgs) -> Result<()> {
    let states = runner.status().await.context("Failed to read history")?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&states)?);
        }
        OutputFormat::Table => {
            let pending = states.iter().filter(|s| s.applied_at.is_none()).count();
            for state in &states {
                println!("  {}", format_state(state));
            }
            println!();
            println!("{} migration(s), {pending} pending", states.len());
        }
    }
    Ok(())
}

fn format_state(state: &MigrationState) -> String {
    let applied = match state.applied_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "pending".to_string(),
    };
    let mut line = format!("{applied:<19}  {}", state.id);
    if !state.reversible {
        line.push_str("  [irreversible]");
    }
    if !state.registered {
        line.push_str("  [unknown]");
    }
    line
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
