//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, ctrl::CtrlCommands, import::ImportArgs, init::InitArgs,
    policy::PolicyCommands,
};

#[derive(Parser)]
#[command(name = "cmt")]
#[command(author, version, about = "Control Mapping Toolkit")]
#[command(
    long_about = "A toolkit for importing policy-to-control mapping spreadsheets into a local compliance catalog."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for list commands
    #[arg(long, short = 'f', global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Project root (default: auto-detect by finding .cmt/)
    #[arg(long, global = true, env = "CMT_PROJECT")]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new catalog project
    Init(InitArgs),

    /// Import a policy-to-control mapping spreadsheet
    Import(ImportArgs),

    /// Control catalog queries
    #[command(subcommand)]
    Ctrl(CtrlCommands),

    /// Policy template queries
    #[command(subcommand)]
    Policy(PolicyCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// Just IDs/names, one per line
    Id,
}
