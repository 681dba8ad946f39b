//! Check executor
//!
//! Drives a deterministic three-phase state machine per selected profile:
//!
//! - **prepare**: resolve the inheritance chain, filter checks by the
//!   severity threshold, and assemble the profile's shape set
//! - **execute**: run SHACL validation once over the union of shape
//!   checks, then walk requirements in order, attaching SHACL findings and
//!   running programmatic checks at their position
//! - **finalize**: emit terminal events and return the accumulated result
//!
//! Cancellation is cooperative and polled at every check boundary.
//! Programmatic-check failures and SHACL engine failures become
//! engine-internal issues; they never abort the whole run.

use crate::errors::{EngineError, ProfileError};
use crate::events::{Event, EventType, Publisher};
use crate::profile::Profile;
use crate::registry::ProfileRegistry;
use crate::requirement::{Check, CheckBody, Requirement};
use crate::resolve;
use crate::result::{CheckId, Issue, ValidationResult};
use crate::rocrate::RoCrate;
use crate::select::Selection;
use crate::settings::ValidationSettings;
use crate::severity::Severity;
use rocv_graph::Graph;
use rocv_shacl::{CompiledShape, ReportEntry, ShaclEngine};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Internal-issue kinds
const KIND_CHECK_INTERNAL: &str = "check_internal_error";
const KIND_SHAPE_ENGINE: &str = "shape_engine_failure";
const KIND_UNKNOWN_SHAPE: &str = "unknown_shape";

/// Executes selected profiles against a loaded crate
pub struct Executor<'r> {
    registry: &'r ProfileRegistry,
}

/// Why the run loop stopped early
enum Stop {
    Cancelled,
    AbortOnFirst,
}

impl<'r> Executor<'r> {
    /// Create an executor over a registry
    pub fn new(registry: &'r ProfileRegistry) -> Self {
        Self { registry }
    }

    /// Run the selected profiles and return the result
    pub fn execute(
        &self,
        rocrate: &RoCrate,
        selection: &Selection<'_>,
        settings: &ValidationSettings,
        publisher: &mut Publisher,
    ) -> Result<ValidationResult, EngineError> {
        let threshold = settings.requirement_severity;
        let profile_ids: Vec<String> = selection
            .profiles
            .iter()
            .map(|p| p.identifier.clone())
            .collect();
        let mut result =
            ValidationResult::new(settings.rocrate_uri.clone(), profile_ids, threshold);

        publisher.notify(Event::new(EventType::ValidationStarted));
        if selection.fallback {
            publisher.notify(
                Event::new(EventType::ProfileFallback)
                    .with_message(selection.warnings.join("; ")),
            );
        }

        // A loader failure aborts the whole run before any further event
        let data_graph = rocrate.metadata_graph()?;

        let mut stop = None;
        for profile in &selection.profiles {
            publisher.notify(Event::new(EventType::ProfileStarted).with_profile(&profile.identifier));
            let outcome = self.execute_profile(
                rocrate,
                &data_graph,
                profile,
                settings,
                publisher,
                &mut result,
            )?;
            publisher
                .notify(Event::new(EventType::ProfileFinished).with_profile(&profile.identifier));
            if let Some(reason) = outcome {
                stop = Some(reason);
                break;
            }
        }

        match stop {
            Some(Stop::Cancelled) => {
                result.cancelled = true;
                publisher.notify(Event::new(EventType::ValidationCancelled));
            }
            _ => publisher.notify(Event::new(EventType::ValidationFinished)),
        }
        Ok(result)
    }

    /// Run one profile; Some(reason) stops the remaining profiles
    fn execute_profile(
        &self,
        rocrate: &RoCrate,
        data_graph: &Graph,
        profile: &Profile,
        settings: &ValidationSettings,
        publisher: &mut Publisher,
        result: &mut ValidationResult,
    ) -> Result<Option<Stop>, EngineError> {
        let threshold = settings.requirement_severity;

        // prepare: inheritance chain and severity filtering
        let chain: Vec<&Profile> = if settings.inherit_profiles {
            resolve::resolve(self.registry, profile).map_err(EngineError::Profile)?
        } else {
            vec![self
                .registry
                .maybe_get(&profile.identifier)
                .ok_or_else(|| ProfileError::ProfileNotFound {
                    identifier: profile.identifier.clone(),
                })?]
        };

        // A shape-compilation failure anywhere in the chain aborts this
        // profile with a single internal-error issue
        for member in &chain {
            if let Some(message) = &member.engine_error {
                warn!(profile = %member.identifier, "aborting profile: {}", message);
                result.add_issue(Issue {
                    check: CheckId::internal(member.identifier.clone(), KIND_SHAPE_ENGINE),
                    severity: Severity::Required,
                    message: message.clone(),
                    focus_node: None,
                    result_path: None,
                    value: None,
                });
                return Ok(None);
            }
        }

        let included = included_requirements(&chain, threshold);
        let shapes = self.assemble_shapes(&included);
        debug!(
            profile = %profile.identifier,
            requirements = included.len(),
            shapes = shapes.len(),
            "prepared profile execution"
        );

        // execute: one SHACL pass over the union of this profile's shapes
        let engine = ShaclEngine::new(shapes);
        let report = if engine.is_empty() {
            None
        } else {
            Some(engine.validate(data_graph))
        };

        let mut entries_by_shape: HashMap<String, Vec<ReportEntry>> = HashMap::new();
        if let Some(report) = report {
            for entry in report.entries {
                let Some(shape_iri) = entry.source_shape.as_iri().map(str::to_string) else {
                    continue;
                };
                if self.registry.shape_check(&shape_iri).is_none() {
                    // A report entry nothing claims is an engine defect,
                    // surfaced rather than ignored
                    result.add_issue(Issue {
                        check: CheckId::internal(profile.identifier.clone(), KIND_UNKNOWN_SHAPE),
                        severity: Severity::Required,
                        message: format!(
                            "validation report references unknown shape {}",
                            shape_iri
                        ),
                        focus_node: Some(entry.focus_node.lexical()),
                        result_path: entry.path.clone(),
                        value: None,
                    });
                    continue;
                }
                entries_by_shape.entry(shape_iri).or_default().push(entry);
            }
        }

        // walk requirements in order, attaching findings check by check
        for (owner, requirement, checks) in &included {
            publisher.notify(
                Event::new(EventType::RequirementStarted)
                    .with_profile(&owner.identifier)
                    .with_requirement(&requirement.identifier),
            );
            for check in checks {
                if publisher.cancel_requested() {
                    return Ok(Some(Stop::Cancelled));
                }
                let check_id = CheckId::new(
                    owner.identifier.clone(),
                    requirement.identifier.clone(),
                    check.identifier.clone(),
                );
                publisher.notify(
                    Event::new(EventType::CheckStarted)
                        .with_profile(&owner.identifier)
                        .with_requirement(&requirement.identifier)
                        .with_check(&check.identifier),
                );

                let severity = check.effective_severity(requirement.level);
                let issues = match &check.body {
                    CheckBody::Shape { shape_key } => entries_by_shape
                        .remove(shape_key)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|entry| shacl_issue(&check_id, severity, rocrate, entry))
                        .collect(),
                    CheckBody::Programmatic { run } => match run(rocrate) {
                        Ok(findings) => findings
                            .into_iter()
                            .map(|finding| Issue {
                                check: check_id.clone(),
                                severity,
                                message: finding.message,
                                focus_node: finding.focus_node,
                                result_path: finding.path,
                                value: None,
                            })
                            .collect(),
                        Err(message) => {
                            warn!(check = %check_id, "programmatic check failed: {}", message);
                            vec![Issue {
                                check: CheckId::internal(
                                    owner.identifier.clone(),
                                    KIND_CHECK_INTERNAL,
                                ),
                                severity: Severity::Required,
                                message: format!("check {} failed internally: {}", check_id, message),
                                focus_node: None,
                                result_path: None,
                                value: None,
                            }]
                        }
                    },
                };

                for issue in issues {
                    // Cross-profile de-duplication happens here: only new
                    // issues are surfaced through the event stream
                    if result.add_issue(issue.clone()) {
                        publisher.notify(
                            Event::new(EventType::IssueFound)
                                .with_profile(&owner.identifier)
                                .with_requirement(&requirement.identifier)
                                .with_check(&check.identifier)
                                .with_issue(issue),
                        );
                    }
                }

                publisher.notify(
                    Event::new(EventType::CheckFinished)
                        .with_profile(&owner.identifier)
                        .with_requirement(&requirement.identifier)
                        .with_check(&check.identifier),
                );

                if settings.abort_on_first && result.has_issues_at(threshold) {
                    publisher.notify(
                        Event::new(EventType::RequirementFinished)
                            .with_profile(&owner.identifier)
                            .with_requirement(&requirement.identifier),
                    );
                    return Ok(Some(Stop::AbortOnFirst));
                }
            }
            publisher.notify(
                Event::new(EventType::RequirementFinished)
                    .with_profile(&owner.identifier)
                    .with_requirement(&requirement.identifier),
            );
        }

        Ok(None)
    }

    /// Clone the registry's compiled shapes for the included shape checks,
    /// dropping property shapes whose check fell below the threshold
    fn assemble_shapes(
        &self,
        included: &[(&Profile, &Requirement, Vec<&Check>)],
    ) -> Vec<CompiledShape> {
        let mut shapes = Vec::new();
        for (owner, requirement, checks) in included {
            let included_keys: HashSet<&str> = checks
                .iter()
                .filter_map(|c| match &c.body {
                    CheckBody::Shape { shape_key } => Some(shape_key.as_str()),
                    CheckBody::Programmatic { .. } => None,
                })
                .collect();
            if included_keys.is_empty() {
                continue;
            }
            let Some(shape) = self
                .registry
                .requirement_shape(&owner.identifier, &requirement.identifier)
            else {
                continue;
            };
            let mut shape = shape.clone();
            shape
                .property_shapes
                .retain(|ps| ps.id.as_iri().is_some_and(|iri| included_keys.contains(iri)));
            let node_included = shape
                .id
                .as_iri()
                .is_some_and(|iri| included_keys.contains(iri));
            if !node_included {
                shape.node_constraints.clear();
            }
            if !shape.property_shapes.is_empty() || node_included {
                shapes.push(shape);
            }
        }
        shapes
    }
}

/// Requirements of a chain that still apply at the threshold, with their
/// included checks, preserving resolver order
fn included_requirements<'c>(
    chain: &[&'c Profile],
    threshold: Severity,
) -> Vec<(&'c Profile, &'c Requirement, Vec<&'c Check>)> {
    resolve::effective_requirements(chain)
        .into_iter()
        .filter_map(|(profile, requirement)| {
            let checks: Vec<&Check> = requirement
                .checks
                .iter()
                .filter(|c| c.effective_severity(requirement.level) >= threshold)
                .collect();
            if checks.is_empty() {
                None
            } else {
                Some((profile, requirement, checks))
            }
        })
        .collect()
}

/// Convert a SHACL report entry into an issue for a check
fn shacl_issue(
    check_id: &CheckId,
    severity: Severity,
    rocrate: &RoCrate,
    entry: ReportEntry,
) -> Issue {
    let focus = relativize(rocrate.base_uri(), &entry.focus_node.lexical());
    let message = format!("{} (focus node: {})", entry.message, focus);
    Issue {
        check: check_id.clone(),
        severity,
        message,
        focus_node: Some(focus),
        result_path: entry.path,
        value: entry.value.map(|v| v.lexical()),
    }
}

/// Render crate-internal IRIs relative to the crate root for messages
fn relativize(base: &str, iri: &str) -> String {
    if iri == base {
        return "./".to_string();
    }
    match iri.strip_prefix(base) {
        Some(rest) => rest.to_string(),
        None => iri.to_string(),
    }
}
