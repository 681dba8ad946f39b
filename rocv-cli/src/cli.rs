//! Argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validate RO-Crates against their declared profiles
#[derive(Parser)]
#[command(name = "rocv", version, about)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print lifecycle events while validating
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a crate (directory, .zip, file:// URI, or http(s) URL)
    Validate {
        /// Crate location
        rocrate: String,

        /// Force a specific profile identifier instead of auto-detection
        #[arg(short, long)]
        profile: Option<String>,

        /// Minimum requirement severity to check
        #[arg(short, long, default_value = "REQUIRED")]
        severity: String,

        /// Additional profiles directory (repeatable; shadows built-ins)
        #[arg(long = "profiles-path")]
        profiles_paths: Vec<PathBuf>,

        /// Do not run requirements inherited from parent profiles
        #[arg(long)]
        no_inheritance: bool,

        /// Stop at the first issue at or above the threshold
        #[arg(long)]
        fail_fast: bool,

        /// Ask which profile to use when auto-detection is ambiguous
        #[arg(short, long)]
        interactive: bool,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect the registered profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
pub enum ProfilesAction {
    /// List all registered profiles
    List {
        /// Additional profiles directory (repeatable)
        #[arg(long = "profiles-path")]
        profiles_paths: Vec<PathBuf>,
    },
    /// Show one profile's requirements
    Describe {
        /// Profile identifier
        identifier: String,

        /// Additional profiles directory (repeatable)
        #[arg(long = "profiles-path")]
        profiles_paths: Vec<PathBuf>,
    },
}
