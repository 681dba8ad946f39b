mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands, ProfilesAction};
use error::exit_with_error;

fn init_tracing() {
    // The CLI depends on library crates that emit `tracing` events.
    // Default to "off" so output only changes when the user opts in via
    // `RUST_LOG`.
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "off".into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => exit_with_error(e),
    }
}

fn run(cli: Cli) -> error::CliResult<i32> {
    match cli.command {
        Commands::Validate {
            rocrate,
            profile,
            severity,
            profiles_paths,
            no_inheritance,
            fail_fast,
            interactive,
            format,
            output,
        } => commands::validate::run(commands::validate::ValidateOpts {
            rocrate,
            profile,
            severity,
            profiles_paths,
            no_inheritance,
            fail_fast,
            interactive,
            format,
            output,
            verbose: cli.verbose,
        }),

        Commands::Profiles { action } => {
            match action {
                ProfilesAction::List { profiles_paths } => {
                    commands::profiles::run_list(profiles_paths)?
                }
                ProfilesAction::Describe {
                    identifier,
                    profiles_paths,
                } => commands::profiles::run_describe(&identifier, profiles_paths)?,
            }
            Ok(error::EXIT_SUCCESS)
        }
    }
}
