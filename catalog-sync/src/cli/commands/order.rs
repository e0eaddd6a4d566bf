//! Order command handler

use anyhow::{Context, Result};
use colored::*;
use csv::Writer;
use std::fs::File;
use std::io::{self, Write};

use crate::cli::OrderArgs;
use crate::config::Config;
use crate::sheet::{TabularSource, XlsxSource};
use crate::upload::order::{ProductOrder, product_orders};
use crate::upload::{EntityKind, sheet_candidates};

/// Handle `catalog-sync order`
pub fn handle_order_command(args: OrderArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let mut source = XlsxSource::open(&args.excel)?;

    let report = compute_report(&mut source, &config)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
            write_report(&report, file)?;
            println!(
                "{} order for {} product(s) to {}",
                "Wrote".bright_green(),
                report.len(),
                path.display().to_string().cyan()
            );
        }
        None => write_report(&report, io::stdout().lock())?,
    }

    Ok(())
}

fn compute_report(source: &mut dyn TabularSource, config: &Config) -> Result<Vec<ProductOrder>> {
    let kind = EntityKind::Product;
    let sheet_config = config.sheet(kind);
    let candidates = sheet_candidates(kind, &sheet_config);

    let sheet = source.resolve_sheet(&candidates).with_context(|| {
        format!("Workbook has no {} sheet (tried {})", kind, candidates.join(", "))
    })?;

    let mut rows = source.read_sheet(&sheet)?;
    if sheet_config.skip_description_row && !rows.is_empty() {
        rows.remove(0);
    }

    log::info!("Computing order for {} row(s) of '{}'", rows.len(), sheet);
    Ok(product_orders(&rows))
}

fn write_report<W: Write>(report: &[ProductOrder], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    if report.is_empty() {
        wtr.write_record(["productId", "topicId", "level", "order"])
            .context("Failed to write CSV header")?;
    }

    for line in report {
        wtr.serialize(line)
            .with_context(|| format!("Failed to write product: {}", line.product_id))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
