//! Command-line interface for typesniff
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing and provides a clean,
//! user-friendly interface.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

/// typesniff - content-type classification for filesystem entries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify files, directories and links
    Classify(commands::classify::ClassifyArgs),
    /// Report Shannon entropy and compression ratio of a file
    Entropy(commands::entropy::EntropyArgs),
    /// Check whether a file is extractable as an archive
    CanExtract(commands::can_extract::CanExtractArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate configuration
    Validate,
    /// Show current configuration
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        // Initialize output handler with global verbose and quiet settings
        let output = Output::new(self.verbose, self.quiet);

        if !atty::is(atty::Stream::Stdout) {
            console::set_colors_enabled(false);
        }

        match self.command {
            Some(Commands::Classify(args)) => {
                commands::classify::execute(args, self.config.as_deref(), &output)
            }
            Some(Commands::Entropy(args)) => commands::entropy::execute(args, &output),
            Some(Commands::CanExtract(args)) => commands::can_extract::execute(args, &output),
            Some(Commands::Config(cmd)) => {
                commands::config::execute(cmd, self.config.as_deref(), &output)
            }
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
