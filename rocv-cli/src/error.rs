use colored::Colorize;
use std::fmt;
use std::process;

/// Exit codes: 0 = conformant, 1 = issues found, 2 = engine error.
#[allow(dead_code)]
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ISSUES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the validation engine (loader, profile, internal).
    Engine(rocv_core::EngineError),
    /// Bad argument values (severity names and the like).
    Usage(String),
    /// Output file could not be written.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Output(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<rocv_core::EngineError> for CliError {
    fn from(e: rocv_core::EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

/// Print the error and exit with the engine-error code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    process::exit(EXIT_ERROR)
}

pub type CliResult<T> = std::result::Result<T, CliError>;
