//! catalog-sync: upload a spreadsheet-maintained content catalog to Firestore

mod cli;
mod config;
mod sheet;
mod store;
mod upload;

use clap::Parser;
use colored::*;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Upload(args) => cli::commands::handle_upload_command(args).await,
        Commands::Order(args) => cli::commands::handle_order_command(args),
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
