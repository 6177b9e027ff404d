//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ClarifyCommand, ComponentsCommand, GenerateCommand, RestructureCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// ML pipeline generator
#[derive(Debug, Parser, Clone)]
#[command(name = "pipeline-generator")]
#[command(version = "0.1.0")]
#[command(about = "Assemble ML pipelines from a component catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to component catalog JSON
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Print research steps as they change
    #[arg(short, long, global = true)]
    pub stream: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a pipeline for a prompt
    Generate(GenerateCommand),

    /// Ask clarification questions for a prompt
    Clarify(ClarifyCommand),

    /// Sort components into canonical stage order
    Restructure(RestructureCommand),

    /// List catalog components
    Components(ComponentsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
