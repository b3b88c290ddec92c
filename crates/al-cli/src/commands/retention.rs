//! Retention command implementation

use al_store::RetentionJob;
use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RetentionArgs, RetentionCommands};
use crate::context::RuntimeContext;

/// Execute the retention command
pub async fn execute(args: &RetentionArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let settings = &ctx.config.retention;
    let job = RetentionJob::new(ctx.db(), settings);

    match args.command {
        RetentionCommands::Run => {
            let removed = job.tick().await.context("Retention tick failed")?;
            println!("Removed {removed} expired row(s) from {}", job.table());
        }
        RetentionCommands::Serve => {
            if !settings.enabled {
                println!("Retention is disabled in the configuration");
                return Ok(());
            }
            let schedule = settings
                .daily_schedule()
                .context("Invalid retention schedule")?;
            println!(
                "Retention for {} scheduled at '{schedule}', press Ctrl-C to stop",
                job.table()
            );
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {e}");
                    std::future::pending::<()>().await;
                }
            };
            let ticks = job.run_scheduled(schedule, shutdown).await;
            println!("Stopped after {ticks} tick(s)");
        }
    }
    Ok(())
}
