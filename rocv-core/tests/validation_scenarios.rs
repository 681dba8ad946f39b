//! End-to-end validation scenarios over the fixture crates
//!
//! Every test drives the public `validate` entry point against a crate
//! checked in under `tests/data/crates/`, using the built-in profiles
//! directory at the workspace root.

use rocv_core::{
    validate, validate_simple, Event, EventType, NoChooser, Severity, Subscriber,
    ValidationSettings,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/crates")
        .join(name)
}

fn settings(name: &str) -> ValidationSettings {
    ValidationSettings::new(fixture(name).to_string_lossy().to_string())
}

// ----------------------------------------------------------------------
// Scenario: valid workflow crate
// ----------------------------------------------------------------------

#[test]
fn valid_workflow_crate_passes_at_required() {
    let result = validate_simple(&settings("valid-workflow-crate")).unwrap();
    assert_eq!(
        result.issues(),
        &[],
        "expected no issues, got: {:#?}",
        result.issues()
    );
    assert_eq!(result.profiles, vec!["workflow-ro-crate-1.0".to_string()]);
    assert!(result.is_valid());
}

#[test]
fn valid_workflow_crate_passes_at_every_threshold() {
    for severity in [Severity::Optional, Severity::Recommended, Severity::Required] {
        let mut s = settings("valid-workflow-crate");
        s.requirement_severity = severity;
        let result = validate_simple(&s).unwrap();
        assert!(
            result.issues().is_empty(),
            "issues at {}: {:#?}",
            severity,
            result.issues()
        );
    }
}

// ----------------------------------------------------------------------
// Scenario: missing output file
// ----------------------------------------------------------------------

#[test]
fn missing_output_yields_exactly_one_file_presence_issue() {
    let result = validate_simple(&settings("missing-output")).unwrap();
    assert_eq!(result.issues().len(), 1, "issues: {:#?}", result.issues());
    let issue = &result.issues()[0];
    assert_eq!(issue.check.check, "file_presence");
    assert_eq!(issue.severity, Severity::Required);
    assert!(issue.message.contains("outputs/tac_on_data_360_1.txt"));
    assert!(!result.is_valid());
}

// ----------------------------------------------------------------------
// Scenario: wrong @id property
// ----------------------------------------------------------------------

#[test]
fn wrong_id_crate_fails_at_required_citing_the_root() {
    let result = validate_simple(&settings("wrong-id")).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .issues()
        .iter()
        .all(|i| i.severity == Severity::Required));
    assert!(
        result
            .issues()
            .iter()
            .any(|i| i.focus_node.as_deref() == Some("./")),
        "no issue cites the root data entity: {:#?}",
        result.issues()
    );
}

// ----------------------------------------------------------------------
// Scenario: missing license
// ----------------------------------------------------------------------

#[test]
fn missing_license_is_recommended_only() {
    // At RECOMMENDED: exactly the license issue
    let mut s = settings("no-license");
    s.requirement_severity = Severity::Recommended;
    let result = validate_simple(&s).unwrap();
    assert_eq!(result.issues().len(), 1, "issues: {:#?}", result.issues());
    let issue = &result.issues()[0];
    assert_eq!(issue.severity, Severity::Recommended);
    assert_eq!(issue.check.check, "license");
    assert!(!result.is_valid());

    // At REQUIRED the same crate is valid
    let result = validate_simple(&settings("no-license")).unwrap();
    assert!(result.is_valid(), "issues: {:#?}", result.issues());
}

// ----------------------------------------------------------------------
// Scenario: directory referenced without trailing slash
// ----------------------------------------------------------------------

#[test]
fn directory_without_trailing_slash_is_tolerated() {
    let result = validate_simple(&settings("indirect-dir")).unwrap();
    assert_eq!(result.issues(), &[], "issues: {:#?}", result.issues());
}

// ----------------------------------------------------------------------
// Scenario: unknown profile, non-interactive fallback
// ----------------------------------------------------------------------

#[derive(Default)]
struct EventLog {
    events: Rc<RefCell<Vec<EventType>>>,
}

struct EventRecorder {
    events: Rc<RefCell<Vec<EventType>>>,
}

impl Subscriber for EventRecorder {
    fn update(&mut self, event: &Event) {
        self.events.borrow_mut().push(event.event_type);
    }
}

impl EventLog {
    fn subscriber(&self) -> Box<dyn Subscriber> {
        Box::new(EventRecorder {
            events: self.events.clone(),
        })
    }
}

#[test]
fn unknown_profile_falls_back_to_base_with_event() {
    let log = EventLog::default();
    let result = validate(
        &settings("unknown-profile"),
        vec![log.subscriber()],
        &NoChooser,
    )
    .unwrap();

    assert_eq!(result.profiles, vec!["ro-crate-1.1".to_string()]);
    assert!(result.is_valid(), "issues: {:#?}", result.issues());

    let events = log.events.borrow();
    assert_eq!(events[0], EventType::ValidationStarted);
    assert_eq!(events[1], EventType::ProfileFallback);
    assert_eq!(*events.last().unwrap(), EventType::ValidationFinished);
}

// ----------------------------------------------------------------------
// Event stream shape and cancellation
// ----------------------------------------------------------------------

#[test]
fn event_stream_brackets_are_well_formed() {
    let log = EventLog::default();
    let result = validate(
        &settings("valid-workflow-crate"),
        vec![log.subscriber()],
        &NoChooser,
    )
    .unwrap();
    assert!(result.is_valid());

    let events = log.events.borrow();
    assert_eq!(events[0], EventType::ValidationStarted);
    assert_eq!(*events.last().unwrap(), EventType::ValidationFinished);

    let count = |t: EventType| events.iter().filter(|e| **e == t).count();
    assert_eq!(count(EventType::ProfileStarted), count(EventType::ProfileFinished));
    assert_eq!(
        count(EventType::RequirementStarted),
        count(EventType::RequirementFinished)
    );
    assert_eq!(count(EventType::CheckStarted), count(EventType::CheckFinished));
    assert!(count(EventType::CheckStarted) > 0);
    // A clean crate surfaces no issues
    assert_eq!(count(EventType::IssueFound), 0);
}

struct CancelAfterFirstCheck {
    seen_check: Rc<RefCell<bool>>,
}

impl Subscriber for CancelAfterFirstCheck {
    fn update(&mut self, event: &Event) {
        if event.event_type == EventType::CheckFinished {
            *self.seen_check.borrow_mut() = true;
        }
    }

    fn cancel_requested(&self) -> bool {
        *self.seen_check.borrow()
    }
}

#[test]
fn cancellation_takes_effect_at_the_next_check_boundary() {
    let seen_check = Rc::new(RefCell::new(false));
    let log = EventLog::default();
    let result = validate(
        &settings("valid-workflow-crate"),
        vec![
            Box::new(CancelAfterFirstCheck {
                seen_check: seen_check.clone(),
            }),
            log.subscriber(),
        ],
        &NoChooser,
    )
    .unwrap();

    assert!(result.cancelled);
    let events = log.events.borrow();
    assert_eq!(*events.last().unwrap(), EventType::ValidationCancelled);
    // At most one check ran before the flag was honored
    let checks = events
        .iter()
        .filter(|e| **e == EventType::CheckFinished)
        .count();
    assert_eq!(checks, 1);
}

// ----------------------------------------------------------------------
// Cross-cutting invariants
// ----------------------------------------------------------------------

#[test]
fn issues_never_fall_below_the_threshold() {
    for name in ["missing-output", "wrong-id", "no-license"] {
        for severity in [Severity::Optional, Severity::Recommended, Severity::Required] {
            let mut s = settings(name);
            s.requirement_severity = severity;
            let result = validate_simple(&s).unwrap();
            for issue in result.issues() {
                assert!(
                    issue.severity >= severity,
                    "{}: issue below threshold {}: {:?}",
                    name,
                    severity,
                    issue
                );
            }
            // validity <=> no issue at or above the threshold
            assert_eq!(result.is_valid(), !result.has_issues_at(severity));
        }
    }
}

#[test]
fn repeated_runs_produce_identical_issue_sets() {
    let first = validate_simple(&settings("wrong-id")).unwrap();
    let second = validate_simple(&settings("wrong-id")).unwrap();
    assert_eq!(first.issues(), second.issues());
}

#[test]
fn abort_on_first_stops_after_the_first_issue() {
    let mut s = settings("wrong-id");
    s.abort_on_first = true;
    let result = validate_simple(&s).unwrap();
    assert_eq!(result.issues().len(), 1);
    assert!(!result.is_valid());
}

#[test]
fn explicit_profile_override_is_used() {
    let mut s = settings("missing-output");
    s.profile_identifier = Some("workflow-ro-crate-1.0".to_string());
    let result = validate_simple(&s).unwrap();
    assert_eq!(result.profiles, vec!["workflow-ro-crate-1.0".to_string()]);
    // The crate has no main workflow, so the forced profile fails
    assert!(result
        .issues()
        .iter()
        .any(|i| i.check.requirement == "main_workflow"));
}

#[test]
fn inheritance_can_be_disabled() {
    let mut s = settings("missing-output");
    s.profile_identifier = Some("workflow-ro-crate-1.0".to_string());
    s.inherit_profiles = false;
    let result = validate_simple(&s).unwrap();
    // Without the inherited base profile, file_presence never runs
    assert!(result
        .issues()
        .iter()
        .all(|i| i.check.check != "file_presence"));
}

// ----------------------------------------------------------------------
// Zip loading end to end
// ----------------------------------------------------------------------

#[test]
fn zip_crate_validates_like_the_directory() {
    use std::io::Write;

    let source = fixture("valid-workflow-crate");
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("crate.zip");
    let file = std::fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let opts = zip::write::SimpleFileOptions::default();
    for name in ["ro-crate-metadata.json", "sort-and-change-case.ga", "README.md"] {
        writer.start_file(name, opts).unwrap();
        writer
            .write_all(&std::fs::read(source.join(name)).unwrap())
            .unwrap();
    }
    writer.finish().unwrap();

    let result = validate_simple(&ValidationSettings::new(
        zip_path.to_string_lossy().to_string(),
    ))
    .unwrap();
    assert_eq!(result.issues(), &[], "issues: {:#?}", result.issues());
    assert_eq!(result.profiles, vec!["workflow-ro-crate-1.0".to_string()]);
}

// ----------------------------------------------------------------------
// Loader failures abort before any result
// ----------------------------------------------------------------------

#[test]
fn loader_errors_abort_the_run() {
    let err = validate_simple(&ValidationSettings::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(
        err,
        rocv_core::EngineError::Loader(rocv_core::LoaderError::CrateNotFound { .. })
    ));
}
