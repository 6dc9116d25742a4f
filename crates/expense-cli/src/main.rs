//! Expense CLI - Command-line front end for the local expense store
//!
//! Record entries, manage favorites, and inspect what the sync engine will
//! pick up next.

mod cli;
mod commands;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::favorites::run_favorites;
use crate::commands::list::run_list;
use crate::commands::pending::run_pending;
use crate::commands::purge::run_purge;
use crate::commands::show::run_show;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        if let Some(hint) = error.hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("expense=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.db_path)?;

    match cli.command {
        Commands::Add(args) => run_add(&args, &config)?,
        Commands::List { asc, json } => run_list(asc, json, &config)?,
        Commands::Show { id, json } => run_show(id, json, &config)?,
        Commands::Edit {
            id,
            amount,
            tag,
            location,
        } => run_edit(
            id,
            amount.as_deref(),
            tag.as_deref(),
            location.as_deref(),
            &config,
        )?,
        Commands::Delete { id } => run_delete(id, &config)?,
        Commands::Favorites { command } => run_favorites(command, &config)?,
        Commands::Pending {
            category,
            table,
            json,
        } => run_pending(category, table, json, &config)?,
        Commands::Purge { hash, table } => run_purge(&hash, table, &config)?,
    }

    Ok(())
}
