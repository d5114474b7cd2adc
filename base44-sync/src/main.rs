//! base44-sync: mirror Base44 application entities into Supabase
//!
//! Each run is a full, idempotent pass: every mapped entity is fetched,
//! normalized against its field rules and upserted by id, with nested
//! witness references flattened into a join relation along the way.

mod api;
mod cli;
mod config;
mod sync;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use api::{Base44Client, SupabaseClient};
use cli::Args;
use config::{Credentials, SyncCatalog};
use sync::{RelationResult, SyncEngine, SyncRun};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let credentials = Credentials::from_env()?;
    let mut catalog = SyncCatalog::default_catalog();

    if !args.only.is_empty() {
        catalog.retain_relations(&args.only);
        if catalog.mappings.is_empty() {
            anyhow::bail!(
                "no mapped relation matches --only filter: {}",
                args.only.join(", ")
            );
        }
    }

    let provider = Arc::new(Base44Client::new(
        credentials.b44_app_id,
        credentials.b44_api_key,
    ));
    let store = Arc::new(SupabaseClient::new(
        credentials.supabase_url,
        credentials.supabase_key,
    ));

    let engine = SyncEngine::new(provider, store, catalog).dry_run(args.dry_run);
    let run = engine.run().await;

    print_report(&run, args.dry_run);

    if run.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(run: &SyncRun, dry_run: bool) {
    if dry_run {
        println!("{}", "dry run — no writes performed".dimmed());
    }

    for outcome in &run.outcomes {
        match &outcome.result {
            RelationResult::Synced { records, links } => {
                let mut line = format!("{} records", records);
                if *links > 0 {
                    line.push_str(&format!(", {} links", links));
                }
                println!("{} {}: {}", "✓".green(), outcome.relation.bold(), line);
            }
            RelationResult::Failed { reason } => {
                println!("{} {}: {}", "✗".red(), outcome.relation.bold(), reason.red());
            }
        }
    }

    println!();
    if run.has_failures() {
        println!(
            "{}",
            format!(
                "{} records synced, {} relation(s) failed",
                run.total_records(),
                run.failed_count()
            )
            .red()
        );
    } else {
        println!(
            "{}",
            format!("{} records synced", run.total_records()).green()
        );
    }
}
