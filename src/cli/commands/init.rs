//! `cmt init` command - create a new catalog project

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::core::catalog::Catalog;
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Reinitialize even if .cmt/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let project = if args.force {
        Project::init_force(&args.path)
    } else {
        Project::init(&args.path)
    }
    .map_err(|e| miette::miette!("{}", e))?;

    // Creates the database file with the current schema
    Catalog::open(&project)?;

    println!(
        "{} Initialized catalog project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    Ok(())
}
