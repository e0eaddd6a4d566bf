//! Command-line interface

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Upload a catalog workbook to Firestore")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload every catalog sheet found in the workbook
    Upload(UploadArgs),

    /// Print the computed product order for the Products sheet as CSV
    Order(OrderArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Service-account key file (JSON)
    #[arg(short, long, required_unless_present = "dry_run")]
    pub key: Option<PathBuf>,

    /// Catalog workbook (.xlsx)
    #[arg(short, long)]
    pub excel: PathBuf,

    /// Config file (defaults to <config dir>/catalog-sync/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Upload into an in-memory store and report what would be written
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Catalog workbook (.xlsx)
    #[arg(short, long)]
    pub excel: PathBuf,

    /// Write the CSV here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to <config dir>/catalog-sync/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
