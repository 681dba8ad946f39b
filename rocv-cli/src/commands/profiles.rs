//! The profiles subcommands

use crate::error::CliResult;
use colored::Colorize;
use rocv_core::{default_profiles_path, ProfileRegistry};
use std::path::PathBuf;

fn load_registry(extra_paths: Vec<PathBuf>) -> CliResult<ProfileRegistry> {
    let mut paths = vec![default_profiles_path()];
    paths.extend(extra_paths);
    Ok(ProfileRegistry::load(&paths).map_err(rocv_core::EngineError::Profile)?)
}

/// List all registered profiles
pub fn run_list(extra_paths: Vec<PathBuf>) -> CliResult<()> {
    let registry = load_registry(extra_paths)?;
    for profile in registry.all() {
        println!(
            "{:<28} {:<40} {}",
            profile.identifier.bold(),
            profile.uri,
            profile.name
        );
    }
    Ok(())
}

/// Describe one profile's requirements and checks
pub fn run_describe(identifier: &str, extra_paths: Vec<PathBuf>) -> CliResult<()> {
    let registry = load_registry(extra_paths)?;
    let profile = registry
        .get(identifier)
        .map_err(rocv_core::EngineError::Profile)?;

    println!("{} ({})", profile.name.bold(), profile.identifier);
    println!("  uri: {}", profile.uri);
    if let Some(description) = &profile.description {
        println!("  {}", description);
    }
    if !profile.is_profile_of.is_empty() {
        println!("  inherits: {}", profile.is_profile_of.join(", "));
    }
    println!();
    for requirement in &profile.requirements {
        println!(
            "  [{}] {}",
            requirement.level.name.yellow(),
            requirement.identifier.bold()
        );
        for check in &requirement.checks {
            println!("      - {}", check.identifier);
        }
    }
    Ok(())
}
