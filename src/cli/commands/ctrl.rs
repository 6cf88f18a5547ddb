//! `cmt ctrl` command - control catalog queries

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;
use crate::parse::ident::normalize_control_id;

#[derive(clap::Subcommand, Debug)]
pub enum CtrlCommands {
    /// List controls in the catalog
    List(ListArgs),

    /// Show a control and the templates that map it
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in identifier and title
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only the count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Control identifier (e.g. A.6.1; normalized before lookup)
    pub id: String,
}

pub fn run(cmd: CtrlCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CtrlCommands::List(args) => run_list(args, global),
        CtrlCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::open(&project)?;

    let mut controls = catalog.list_controls(args.search.as_deref())?;
    if let Some(n) = args.limit {
        controls.truncate(n);
    }

    if args.count {
        println!("{}", controls.len());
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&controls).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for c in &controls {
                println!("{}", c.control_id);
            }
        }
        OutputFormat::Tsv => {
            for c in &controls {
                println!("{}\t{}\t{}", c.control_id, c.title, c.description);
            }
        }
        OutputFormat::Table => {
            if controls.is_empty() {
                println!("No controls found.");
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(["ID", "Title", "Description"]);
            for c in &controls {
                builder.push_record([
                    c.control_id.clone(),
                    truncate_str(&c.title, 45),
                    truncate_str(&c.description, 50),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::sharp());
            println!("{table}");
            println!(
                "{}",
                style(format!("{} control(s) found", controls.len())).dim()
            );
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::open(&project)?;

    let id = normalize_control_id(&args.id);
    let ctrl = catalog
        .get_control(&id)?
        .ok_or_else(|| miette::miette!("Control not found: {}", args.id))?;

    println!(
        "{} {}",
        style(&ctrl.control_id).cyan().bold(),
        style(&ctrl.title).bold()
    );
    if !ctrl.description.is_empty() {
        println!();
        println!("{}", ctrl.description);
    }

    let templates = catalog.templates_for_control(&ctrl.control_id)?;
    if !templates.is_empty() {
        println!();
        println!("{}", style("Mapped by templates:").bold());
        for name in templates {
            println!("  - {name}");
        }
    }

    Ok(())
}
