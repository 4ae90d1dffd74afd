//! API-facing response models.
//!
//! Operations return typed outcomes; callers that render messages (an HTTP
//! handler, a UI bridge) convert them into an [`OperationResponse`].

use serde::{Deserialize, Serialize};

use crate::core::{AssignOutcome, AssignmentStatus, EngineError, MoveOutcome, RemoveOutcome};

/// Scheduling operation a response describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// `assign`.
    Assign,
    /// `move_assignment`.
    Move,
    /// `remove`.
    Remove,
}

impl OperationKind {
    /// Lowercase name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Move => "move",
            Self::Remove => "remove",
        }
    }
}

/// State of the affected placement after the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Placement is authoritative.
    Confirmed,
    /// Placement awaits cross-department approval.
    Pending,
    /// Move was sent for approval; the placement has not moved.
    AwaitingApproval,
    /// Nothing changed.
    Unchanged,
    /// Placement was deleted.
    Removed,
    /// The operation did not apply.
    Rejected,
}

impl From<AssignmentStatus> for OperationStatus {
    fn from(status: AssignmentStatus) -> Self {
        match status {
            AssignmentStatus::Pending => Self::Pending,
            AssignmentStatus::Confirmed => Self::Confirmed,
        }
    }
}

/// Uniform response for any scheduling operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResponse {
    /// The operation applied (or was a harmless no-op).
    pub ok: bool,
    /// Human-readable reason when `ok` is false.
    pub message: Option<String>,
    /// Resulting placement state.
    pub status: OperationStatus,
    /// Approval requests that could not be raised after a placement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approval_warnings: Vec<String>,
}

impl OperationResponse {
    fn success(status: OperationStatus) -> Self {
        Self {
            ok: true,
            message: None,
            status,
            approval_warnings: Vec::new(),
        }
    }

    /// Failure response. Conflicts and unmet preconditions are shown as-is;
    /// collaborator failures are prefixed with the operation name.
    #[must_use]
    pub fn failure(kind: OperationKind, err: &EngineError) -> Self {
        let message = match err {
            EngineError::NotReady(_) | EngineError::Conflict(_) | EngineError::StaleConflict(_) => {
                err.to_string()
            }
            EngineError::Persistence(msg) => format!("{} failed: {msg}", kind.as_str()),
            other => format!("{} failed: {other}", kind.as_str()),
        };
        Self {
            ok: false,
            message: Some(message),
            status: OperationStatus::Rejected,
            approval_warnings: Vec::new(),
        }
    }

    /// Response for an `assign` result.
    #[must_use]
    pub fn from_assign(result: &Result<AssignOutcome, EngineError>) -> Self {
        match result {
            Ok(outcome) => {
                let mut response = Self::success(outcome.assignment.status.into());
                response.approval_warnings = outcome
                    .approval_failures
                    .iter()
                    .map(|f| {
                        format!(
                            "approval request for {} {} could not be sent: {}",
                            f.resource.kind.as_str(),
                            f.resource.resource_id,
                            f.message
                        )
                    })
                    .collect();
                response
            }
            Err(e) => Self::failure(OperationKind::Assign, e),
        }
    }

    /// Response for a `move_assignment` result.
    #[must_use]
    pub fn from_move(result: &Result<MoveOutcome, EngineError>) -> Self {
        match result {
            Ok(MoveOutcome::Unchanged) => Self::success(OperationStatus::Unchanged),
            Ok(MoveOutcome::Moved(assignment)) => Self::success(assignment.status.into()),
            Ok(MoveOutcome::AwaitingApproval { .. }) => {
                Self::success(OperationStatus::AwaitingApproval)
            }
            Err(e) => Self::failure(OperationKind::Move, e),
        }
    }

    /// Response for a `remove` result.
    #[must_use]
    pub fn from_remove(result: &Result<RemoveOutcome, EngineError>) -> Self {
        match result {
            Ok(_) => Self::success(OperationStatus::Removed),
            Err(e) => Self::failure(OperationKind::Remove, e),
        }
    }
}
