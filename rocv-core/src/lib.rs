//! RO-Crate validation engine
//!
//! Checks whether an RO-Crate conforms to one or more declared profiles.
//! A profile is a named, versioned collection of requirements; each
//! requirement carries a severity (REQUIRED, RECOMMENDED, OPTIONAL) and is
//! decomposed into SHACL shape checks and programmatic checks.
//!
//! The engine is single-threaded and synchronous per validation call.
//! Independent calls over distinct crates may run on separate threads as
//! long as they share only the registry, which is immutable after
//! construction.
//!
//! # Example
//!
//! ```no_run
//! use rocv_core::{validate_simple, Severity, ValidationSettings};
//!
//! let settings = ValidationSettings::new("testdata/my-crate");
//! let result = validate_simple(&settings).unwrap();
//! if !result.passed(Severity::Required) {
//!     for issue in result.issues() {
//!         eprintln!("{}: {}", issue.check, issue.message);
//!     }
//! }
//! ```

pub mod checks;
pub mod errors;
pub mod events;
pub mod executor;
pub mod fetch;
pub mod profile;
pub mod registry;
pub mod requirement;
pub mod resolve;
pub mod result;
pub mod rocrate;
pub mod select;
pub mod service;
pub mod settings;
pub mod severity;
pub mod uri;

pub use errors::{EngineError, LoaderError, ProfileError, Result};
pub use events::{Event, EventType, Publisher, Subscriber};
pub use executor::Executor;
pub use profile::{Profile, ProfileVersion};
pub use registry::{CheckRef, ProfileRegistry};
pub use requirement::{Check, CheckBody, ProgrammaticFinding, Requirement};
pub use result::{CheckId, Issue, ValidationResult, ENGINE_INTERNAL};
pub use rocrate::{LoaderOptions, RoCrate};
pub use select::{NoChooser, ProfileChooser, Selection};
pub use service::{detect_profiles, list_profiles, validate, validate_simple, ProfileInfo};
pub use settings::{default_profiles_path, ValidationSettings};
pub use severity::{levels, RequirementLevel, Severity};
pub use uri::CrateUri;
