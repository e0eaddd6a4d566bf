//! Upload command handler

use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::path::Path;

use crate::cli::UploadArgs;
use crate::config::Config;
use crate::sheet::XlsxSource;
use crate::store::{Credentials, DocumentStore, FirestoreStore, MemoryStore};
use crate::upload::{SheetStatus, SheetSummary, UploadError, UploadSummary, Uploader};

/// Handle `catalog-sync upload`
pub async fn handle_upload_command(args: UploadArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    if args.dry_run {
        println!("{}", "Dry run: writing to an in-memory store".yellow());
        let store = MemoryStore::new();
        let summary = upload(&store, &config, &args.excel).await?;

        print_summary(&summary.sheets);
        println!(
            "Would write {} document(s) in {} commit(s) (sizes: {:?})",
            store.document_count().to_string().bold(),
            store.commit_count(),
            store.commit_sizes()
        );
        return Ok(());
    }

    // Credentials are resolved before the workbook is touched
    let key = args
        .key
        .as_deref()
        .context("--key is required unless --dry-run is given")?;
    let credentials = Credentials::from_key_file(key)?;
    let store = FirestoreStore::new(&credentials)?;

    let summary = upload(&store, &config, &args.excel).await?;

    print_summary(&summary.sheets);
    println!(
        "{} {} operation(s) in {} commit(s) to project {}",
        "Uploaded".bright_green().bold(),
        summary.operations,
        summary.commits,
        credentials.project_id.cyan()
    );

    Ok(())
}

async fn upload(store: &dyn DocumentStore, config: &Config, excel: &Path) -> Result<UploadSummary> {
    let mut source = XlsxSource::open(excel)?;
    info!("Reading workbook {}", source.path().display());

    match Uploader::new(store, config).run(&mut source).await {
        Ok(summary) => Ok(summary),
        Err(err) => {
            if let UploadError::Commit { completed, .. } = &err {
                println!("{}", "Upload stopped; sheets completed before the failure:".red());
                print_summary(completed);
            }
            Err(err).context("Upload failed")
        }
    }
}

fn print_summary(sheets: &[SheetSummary]) {
    for sheet in sheets {
        let label = format!("{:<15}", sheet.kind.to_string());
        match &sheet.status {
            SheetStatus::Written {
                records,
                dropped,
                operations,
            } => {
                let dropped = if *dropped > 0 {
                    format!(", {} row(s) dropped", dropped).yellow().to_string()
                } else {
                    String::new()
                };
                let sheet_name = sheet.sheet.as_deref().unwrap_or_default();
                println!(
                    "  {} {} written ({} write(s) from '{}'){}",
                    label.bold(),
                    records.to_string().bright_green(),
                    operations,
                    sheet_name,
                    dropped
                );
            }
            SheetStatus::Missing => {
                println!("  {} {}", label.bold(), "sheet missing".dimmed());
            }
            SheetStatus::Unreadable { error } => {
                println!(
                    "  {} {} {}",
                    label.bold(),
                    "sheet unreadable, skipped:".red(),
                    error
                );
            }
        }
    }
}
