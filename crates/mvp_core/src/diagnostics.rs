//! Wiring-fault taxonomy and the per-coordinator fault log.
//!
//! # Responsibility
//! - Name every structural failure the core can detect.
//! - Report absorbed failures as structured log lines and keep them for
//!   inspection.
//!
//! # Invariants
//! - Reporting never panics and never unwinds into the caller.
//! - Every report identifies the owning component and the failing key/name.

use log::warn;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type MvpResult<T> = Result<T, MvpError>;

/// Collaborator role named in `MissingCollaborator` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Model,
    View,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::View => "view",
        }
    }
}

/// Structural failures detected by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MvpError {
    MissingCollaborator {
        component: String,
        role: Role,
    },
    DuplicateRegistration {
        key: String,
    },
    UnknownKey {
        key: String,
    },
    SignatureMismatch {
        key: String,
        expected: String,
        actual: String,
    },
    UnresolvedElement {
        element_type: &'static str,
        name: String,
    },
    InvalidBindIndex {
        element_type: &'static str,
        index: usize,
    },
    ReentrantDispatch {
        component: String,
        key: String,
    },
}

impl MvpError {
    /// Stable snake_case code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCollaborator { .. } => "missing_collaborator",
            Self::DuplicateRegistration { .. } => "duplicate_registration",
            Self::UnknownKey { .. } => "unknown_key",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::UnresolvedElement { .. } => "unresolved_element",
            Self::InvalidBindIndex { .. } => "invalid_bind_index",
            Self::ReentrantDispatch { .. } => "reentrant_dispatch",
        }
    }
}

impl Display for MvpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCollaborator { component, role } => {
                write!(f, "{component} has no {} attached", role.as_str())
            }
            Self::DuplicateRegistration { key } => write!(f, "method key already registered: {key}"),
            Self::UnknownKey { key } => write!(f, "method key not registered: {key}"),
            Self::SignatureMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "method {key} registered as `{actual}` but called as `{expected}`"
            ),
            Self::UnresolvedElement { element_type, name } => {
                write!(f, "no {element_type} named `{name}` found in hierarchy")
            }
            Self::InvalidBindIndex {
                element_type,
                index,
            } => write!(f, "no bound {element_type} at index {index}"),
            Self::ReentrantDispatch { component, key } => {
                write!(f, "{component} is busy; re-entrant dispatch of {key} skipped")
            }
        }
    }
}

impl Error for MvpError {}

/// Shared fault log for one coordinator and everything it wires.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    reports: Rc<RefCell<Vec<Report>>>,
}

/// One absorbed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub component: String,
    pub error: MvpError,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs `error` on behalf of `component` and keeps it.
    pub fn report(&self, component: &str, error: MvpError) {
        warn!(
            "event=wiring_fault module=core status=error component={} error_code={} error={}",
            component,
            error.code(),
            error
        );
        if let Ok(mut reports) = self.reports.try_borrow_mut() {
            reports.push(Report {
                component: component.to_string(),
                error,
            });
        }
    }

    /// Returns all reports in arrival order.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }

    /// Counts reports whose error matches `predicate`.
    pub fn count(&self, predicate: impl Fn(&MvpError) -> bool) -> usize {
        self.reports
            .borrow()
            .iter()
            .filter(|report| predicate(&report.error))
            .count()
    }

    /// Counts reports with the given error code.
    pub fn count_code(&self, code: &str) -> usize {
        self.count(|error| error.code() == code)
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.reports.borrow_mut().clear();
    }
}
