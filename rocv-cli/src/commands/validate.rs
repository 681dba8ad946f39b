//! The validate command

use crate::error::{CliError, CliResult, EXIT_ISSUES, EXIT_SUCCESS};
use crate::output;
use colored::Colorize;
use rocv_core::{
    default_profiles_path, validate, Event, EventType, Profile, ProfileChooser, Severity,
    Subscriber, ValidationSettings,
};
use std::io::Write;
use std::path::PathBuf;

/// Options collected from the command line
pub struct ValidateOpts {
    pub rocrate: String,
    pub profile: Option<String>,
    pub severity: String,
    pub profiles_paths: Vec<PathBuf>,
    pub no_inheritance: bool,
    pub fail_fast: bool,
    pub interactive: bool,
    pub format: String,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

/// Prints lifecycle events as they happen (`--verbose`)
struct ProgressPrinter;

impl Subscriber for ProgressPrinter {
    fn update(&mut self, event: &Event) {
        match event.event_type {
            EventType::ProfileStarted => {
                if let Some(profile) = &event.profile {
                    eprintln!("{} profile {}", "check".dimmed(), profile.bold());
                }
            }
            EventType::IssueFound => {
                if let Some(issue) = &event.issue {
                    eprintln!("{} {}", "issue".red(), issue.message);
                }
            }
            EventType::ProfileFallback => {
                if let Some(message) = &event.message {
                    eprintln!("{} {}", "warn".yellow().bold(), message);
                }
            }
            _ => {}
        }
    }
}

/// Asks the user to pick a profile from the detected candidates
struct PromptChooser;

impl ProfileChooser for PromptChooser {
    fn choose<'a>(&self, candidates: &[&'a Profile]) -> Option<&'a Profile> {
        if candidates.is_empty() {
            return None;
        }
        eprintln!("Multiple candidate profiles:");
        for (i, profile) in candidates.iter().enumerate() {
            eprintln!("  {}. {} ({})", i + 1, profile.name, profile.identifier);
        }
        eprint!("Select a profile [1-{}]: ", candidates.len());
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok()?;
        let index: usize = line.trim().parse().ok()?;
        candidates.get(index.checked_sub(1)?).copied()
    }
}

/// Run a validation and return the process exit code
pub fn run(opts: ValidateOpts) -> CliResult<i32> {
    let severity: Severity = opts
        .severity
        .parse()
        .map_err(CliError::Usage)?;

    let mut profiles_paths = vec![default_profiles_path()];
    profiles_paths.extend(opts.profiles_paths);

    let settings = ValidationSettings {
        rocrate_uri: opts.rocrate,
        profile_identifier: opts.profile,
        requirement_severity: severity,
        interactive: opts.interactive,
        profiles_paths,
        inherit_profiles: !opts.no_inheritance,
        abort_on_first: opts.fail_fast,
        http_cache_dir: None,
    };

    let subscribers: Vec<Box<dyn Subscriber>> = if opts.verbose {
        vec![Box::new(ProgressPrinter)]
    } else {
        Vec::new()
    };

    let result = validate(&settings, subscribers, &PromptChooser)?;

    let report = match opts.format.as_str() {
        "json" => result.to_json(),
        _ => output::render_text(&result),
    };
    match &opts.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(report.as_bytes())?;
        }
        None => print!("{}", report),
    }

    Ok(if result.is_valid() {
        EXIT_SUCCESS
    } else {
        EXIT_ISSUES
    })
}
