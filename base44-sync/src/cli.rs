//! Command-line arguments

use clap::Parser;

/// Mirror Base44 application entities into a Supabase Postgres database
#[derive(Debug, Parser)]
#[command(name = "base44-sync", version, about)]
pub struct Args {
    /// Sync only the named destination relations (repeatable)
    #[arg(long = "only", value_name = "RELATION")]
    pub only: Vec<String>,

    /// Fetch and normalize but skip all destination writes
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
