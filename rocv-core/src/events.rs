//! Validation lifecycle events and the subscriber surface
//!
//! Events are delivered synchronously on the validation thread; handlers
//! must be fast. A panicking handler is caught and logged once per run.
//! Subscribers may request cancellation; the executor reads the flag at
//! every check boundary.

use crate::result::Issue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ValidationStarted,
    ProfileStarted,
    RequirementStarted,
    CheckStarted,
    IssueFound,
    CheckFinished,
    RequirementFinished,
    ProfileFinished,
    ValidationFinished,
    ValidationCancelled,
    /// Selection fell back to the base profile (warning-level engine event)
    ProfileFallback,
}

/// A lifecycle record
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Event type
    pub event_type: EventType,
    /// Emission time
    pub timestamp: DateTime<Utc>,
    /// Profile identifier, when profile-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Requirement identifier, when requirement-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    /// Check identifier, when check-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    /// The issue, for `IssueFound`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<Issue>,
    /// Free-form message (fallback warnings and the like)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Event {
    /// A bare event of the given type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            profile: None,
            requirement: None,
            check: None,
            issue: None,
            message: None,
        }
    }

    /// Attach a profile identifier
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Attach a requirement identifier
    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    /// Attach a check identifier
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// Attach an issue
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issue = Some(issue);
        self
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Receives lifecycle events during a validation run
pub trait Subscriber {
    /// Handle one event
    fn update(&mut self, event: &Event);

    /// Cooperative cancellation: polled at every check boundary
    fn cancel_requested(&self) -> bool {
        false
    }
}

/// Owns the subscribers of one validation run
#[derive(Default)]
pub struct Publisher {
    subscribers: Vec<Box<dyn Subscriber>>,
    handler_panic_logged: bool,
}

impl Publisher {
    /// A publisher with no subscribers
    pub fn new(subscribers: Vec<Box<dyn Subscriber>>) -> Self {
        Self {
            subscribers,
            handler_panic_logged: false,
        }
    }

    /// Deliver an event to every subscriber
    pub fn notify(&mut self, event: Event) {
        for subscriber in &mut self.subscribers {
            let result = catch_unwind(AssertUnwindSafe(|| subscriber.update(&event)));
            if result.is_err() && !self.handler_panic_logged {
                warn!("event subscriber panicked; further panics will not be logged");
                self.handler_panic_logged = true;
            }
        }
    }

    /// True when any subscriber has requested cancellation
    pub fn cancel_requested(&self) -> bool {
        self.subscribers.iter().any(|s| s.cancel_requested())
    }
}
