//! `cmt policy` command - policy template queries

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;

#[derive(clap::Subcommand, Debug)]
pub enum PolicyCommands {
    /// List policy templates in the catalog
    List(ListArgs),

    /// Show a policy template and its mapped controls
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name and description
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
    /// Template name (exact match)
    pub name: String,
}

pub fn run(cmd: PolicyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PolicyCommands::List(args) => run_list(args, global),
        PolicyCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::open(&project)?;

    let mut templates = catalog.list_templates(args.search.as_deref())?;
    if let Some(n) = args.limit {
        templates.truncate(n);
    }

    if args.count {
        println!("{}", templates.len());
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&templates).into_diagnostic()?
            );
        }
        OutputFormat::Id => {
            for t in &templates {
                println!("{}", t.name);
            }
        }
        OutputFormat::Tsv => {
            for t in &templates {
                let controls = catalog.controls_for_template(t.id)?;
                println!("{}\t{}\t{}", t.name, controls.len(), t.max_words);
            }
        }
        OutputFormat::Table => {
            if templates.is_empty() {
                println!("No policy templates found.");
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(["Name", "Controls", "Max Words", "Description"]);
            for t in &templates {
                let controls = catalog.controls_for_template(t.id)?;
                builder.push_record([
                    truncate_str(&t.name, 40),
                    controls.len().to_string(),
                    t.max_words.to_string(),
                    truncate_str(&t.description, 40),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::sharp());
            println!("{table}");
            println!(
                "{}",
                style(format!("{} template(s) found", templates.len())).dim()
            );
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let catalog = Catalog::open(&project)?;

    let template = catalog
        .get_template_by_name(&args.name)?
        .ok_or_else(|| miette::miette!("Policy template not found: {}", args.name))?;

    println!("{}", style(&template.name).cyan().bold());
    if !template.description.is_empty() {
        println!();
        println!("{}", template.description);
    }
    println!();
    println!("  Max words: {}", template.max_words);
    println!("  Created:   {}", template.created);
    println!("  Updated:   {}", template.updated);

    let controls = catalog.controls_for_template(template.id)?;
    println!();
    if controls.is_empty() {
        println!("{}", style("No mapped controls.").dim());
    } else {
        println!("{}", style("Mapped controls:").bold());
        for c in &controls {
            println!("  {} {}", style(&c.control_id).cyan(), c.title);
        }
    }

    Ok(())
}
