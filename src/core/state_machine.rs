//! Approval lifecycle of assignments.
//!
//! A placement that borrows an instructor or classroom from another
//! department starts out `Pending`; everything else is `Confirmed` right
//! away. Settling a pending placement is the approval workflow's job, the
//! engine only exposes the transition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::model::{Assignment, AssignmentStatus, ClassSession, Program, ResourceKind};
use crate::util::{DepartmentId, SessionId};

/// A resource that belongs to a department other than the requesting
/// program's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossDepartmentResource {
    /// Instructor or classroom.
    pub kind: ResourceKind,
    /// Resource identifier.
    pub resource_id: String,
    /// Department that must approve the use.
    pub department_id: DepartmentId,
}

/// Resources of `session` that need another department's approval.
///
/// A resource without a department never needs approval. A resource with a
/// department needs it whenever that department differs from the owning
/// program's, including when the program has no department.
#[must_use]
pub fn cross_department_resources(
    session: &ClassSession,
    programs: &[Program],
) -> Vec<CrossDepartmentResource> {
    let program_department = programs
        .iter()
        .find(|p| p.id == session.program_id)
        .and_then(|p| p.department_id.as_deref());

    let candidates = [
        (
            ResourceKind::Instructor,
            &session.instructor.id,
            session.instructor.department_id.as_deref(),
        ),
        (
            ResourceKind::Classroom,
            &session.classroom.id,
            session.classroom.preferred_department_id.as_deref(),
        ),
    ];

    candidates
        .into_iter()
        .filter_map(|(kind, resource_id, department)| {
            let department = department?;
            (Some(department) != program_department).then(|| CrossDepartmentResource {
                kind,
                resource_id: resource_id.clone(),
                department_id: department.to_string(),
            })
        })
        .collect()
}

/// Status of a newly created assignment.
#[must_use]
pub fn initial_status(cross_department: &[CrossDepartmentResource]) -> AssignmentStatus {
    if cross_department.is_empty() {
        AssignmentStatus::Confirmed
    } else {
        AssignmentStatus::Pending
    }
}

/// What a move does to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDecision {
    /// Relocate in place, keeping the status.
    Apply(AssignmentStatus),
    /// Leave the assignment where it is and ask for approval of the new
    /// location.
    RequireApproval,
}

/// Decide how a move of an assignment in `current` status proceeds.
#[must_use]
pub const fn decide_move(current: AssignmentStatus, cross_department: bool) -> MoveDecision {
    match (current, cross_department) {
        (AssignmentStatus::Confirmed, true) => MoveDecision::RequireApproval,
        (status, _) => MoveDecision::Apply(status),
    }
}

/// Whether removing the assignment must cancel outstanding approval requests.
#[must_use]
pub const fn removal_cancels_requests(cross_department: bool) -> bool {
    cross_department
}

/// Outcome delivered by the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// The owning department agreed.
    Approve,
    /// The owning department refused.
    Reject,
}

/// Hook for the approval workflow: the status a pending assignment settles
/// into, or `None` when it should be withdrawn.
pub fn settle(
    current: AssignmentStatus,
    decision: ApprovalDecision,
) -> Result<Option<AssignmentStatus>, String> {
    match (current, decision) {
        (AssignmentStatus::Pending, ApprovalDecision::Approve) => {
            Ok(Some(AssignmentStatus::Confirmed))
        }
        (AssignmentStatus::Pending, ApprovalDecision::Reject) => Ok(None),
        (AssignmentStatus::Confirmed, _) => {
            Err("only pending assignments can be approved or rejected".into())
        }
    }
}

/// Sessions whose placement is awaiting approval.
pub fn pending_session_ids<'a>(
    assignments: impl IntoIterator<Item = &'a Assignment>,
) -> BTreeSet<SessionId> {
    assignments
        .into_iter()
        .filter(|a| a.status == AssignmentStatus::Pending)
        .map(|a| a.session.id.clone())
        .collect()
}
