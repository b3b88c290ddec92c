//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Autolot - schema migrations and data retention for the marketplace store
#[derive(Parser, Debug)]
#[command(name = "autolot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: ./autolot.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path from the config
    #[arg(short, long, global = true, env = "AUTOLOT_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply, revert, or inspect schema migrations
    Migrate(MigrateArgs),

    /// Print the installed schema
    Schema(SchemaArgs),

    /// Delete expired notifications
    Retention(RetentionArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommands,
}

/// Migrate subcommands
#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// Apply pending migrations in version order
    Up(MigrateUpArgs),

    /// Revert the most recently applied migrations
    Down(MigrateDownArgs),

    /// List every migration and whether it is applied
    Status(MigrateStatusArgs),
}

/// Arguments for migrate up
#[derive(Args, Debug)]
pub struct MigrateUpArgs {
    /// Stop after this migration (full id or version token)
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for migrate down
#[derive(Args, Debug)]
pub struct MigrateDownArgs {
    /// Number of applied migrations to revert
    #[arg(short = 'n', long, default_value_t = 1)]
    pub steps: usize,
}

/// Arguments for migrate status
#[derive(Args, Debug)]
pub struct MigrateStatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print the schema as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the retention command
#[derive(Args, Debug)]
pub struct RetentionArgs {
    #[command(subcommand)]
    pub command: RetentionCommands,
}

/// Retention subcommands
#[derive(Subcommand, Debug)]
pub enum RetentionCommands {
    /// Run one retention tick now
    Run,

    /// Tick on the configured schedule until interrupted
    Serve,
}

/// Output formats for listings
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
