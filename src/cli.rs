//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sitewright static site assembler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory for exported sites (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: sitewright.toml)
    #[arg(short = 'C', long, default_value = "sitewright.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config and a starter site specification
    Init {
        /// the name(path) of project directory, related to `root`
        name: Option<PathBuf>,

        /// Free-form description used to pick the starter site layout
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Compile a site specification, store it and export its files
    Build {
        /// Site specification JSON file
        #[arg(default_value = "site.json")]
        spec: PathBuf,

        /// Remove a previous export of the same site before writing
        #[arg(long)]
        clean: bool,
    },

    /// Serve stored sites in preview mode and expose the JSON API
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the built-in component fragments
    Components,

    /// List stored sites, newest first
    Sites,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}
