//! Error types for scheduling operations.

use thiserror::Error;

use crate::core::conflict::ConflictReport;

/// Conditions that must hold before any operation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    /// No period grid has been configured.
    #[error("schedule settings are not configured")]
    MissingScheduleConfig,
    /// No semester is active.
    #[error("no active semester is selected")]
    MissingSemester,
    /// The caller is not signed in.
    #[error("you must be signed in to edit the timetable")]
    Unauthenticated,
}

/// Errors produced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation cannot run yet.
    #[error("{0}")]
    NotReady(#[from] Precondition),
    /// The placement violates a scheduling rule.
    #[error("{0}")]
    Conflict(ConflictReport),
    /// The store rejected a write that the caller's snapshot allowed;
    /// another editor took the slot first.
    #[error("{0}")]
    StaleConflict(String),
    /// The backing store failed.
    #[error("persistence error: {0}")]
    Persistence(String),
    /// The approval gateway failed.
    #[error("approval request failed: {0}")]
    Approval(String),
    /// The referenced assignment or entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Configuration values are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Whether this is an expected, user-actionable outcome rather than a
    /// failure of a collaborator.
    #[must_use]
    pub const fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::NotReady(_) | Self::Conflict(_) | Self::StaleConflict(_)
        )
    }

    /// Whether the caller's snapshot is known to be out of date.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleConflict(_))
    }

    /// Conflict carried by this error, if any.
    #[must_use]
    pub const fn conflict(&self) -> Option<&ConflictReport> {
        match self {
            Self::Conflict(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ConflictReport> for EngineError {
    fn from(report: ConflictReport) -> Self {
        Self::Conflict(report)
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
