//! `cmt import` command - import a mapping spreadsheet into the catalog

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{open_project, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::catalog::Catalog;
use crate::import::{apply, parse_mapping, ImportStats, ParsedMapping, PREVIEW_ROWS};
use crate::source::{load_table, SheetSelector};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Mapping file (.csv, .tsv, .xlsx, .xls)
    pub file: PathBuf,

    /// Sheet name or zero-based index (workbook sources only)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Parse and show a preview without writing to the catalog
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    if !args.file.exists() {
        return Err(miette::miette!("File not found: {}", args.file.display()));
    }
    let project = open_project(global)?;

    if !global.quiet {
        println!(
            "{} Importing mappings from {}{}",
            style("→").blue(),
            style(args.file.display()).yellow(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
        println!();
    }

    let sheet = args.sheet.as_deref().map(SheetSelector::from);
    let table = load_table(&args.file, sheet.as_ref())
        .map_err(|e| miette::miette!("Failed to read file: {}", e))?;

    let parsed = parse_mapping(&table).map_err(|e| miette::miette!("{}", e))?;

    if parsed.mapped_col.is_none() {
        eprintln!(
            "{} Couldn't reliably find a mapped-controls column. Continuing with empty control lists.",
            style("!").yellow()
        );
    }

    if !global.quiet {
        print_columns(&parsed);
    }
    if args.dry_run || !global.quiet {
        print_preview(&parsed);
    }

    if args.dry_run {
        println!(
            "{}",
            style("Dry-run completed. No catalog changes made.").yellow()
        );
        return Ok(());
    }

    let mut catalog = Catalog::open(&project)?;
    let stats = apply(&mut catalog, &parsed)?;
    print_summary(&stats);

    Ok(())
}

fn print_columns(parsed: &ParsedMapping) {
    println!(
        "Using columns -> Policy: '{}', Description: '{}', Mapped Controls: '{}'",
        style(&parsed.policy_col.name).cyan(),
        style(parsed.desc_col.as_ref().map_or("-", |c| c.name.as_str())).cyan(),
        style(parsed.mapped_col.as_ref().map_or("-", |c| c.name.as_str())).cyan(),
    );
    println!();
}

fn print_preview(parsed: &ParsedMapping) {
    println!("Preview of parsed rows (first {}):", PREVIEW_ROWS);
    for row in parsed.rows.iter().take(PREVIEW_ROWS) {
        println!(
            " - {} -> {} controls -> [{}]",
            truncate_str(&row.name, 40),
            row.controls.len(),
            row.controls.join(", ")
        );
    }
    println!();
}

fn print_summary(stats: &ImportStats) {
    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  Rows processed:    {}",
        style(stats.rows_processed).cyan()
    );
    println!(
        "  Templates created: {}",
        style(stats.templates_created).green()
    );
    if stats.templates_updated > 0 {
        println!(
            "  Templates updated: {}",
            style(stats.templates_updated).yellow()
        );
    }
    println!(
        "  Controls created:  {}",
        style(stats.controls_created).green()
    );
    if stats.skipped > 0 {
        println!("  Skipped (no name): {}", style(stats.skipped).dim());
    }
    println!();
    println!("{}", style("Import completed.").green());
}
