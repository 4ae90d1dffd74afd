//! Collaborator traits the engine calls out to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::model::{
    Assignment, ClassGroup, Classroom, Department, Instructor, NewAssignment, Program,
    ResourceKind,
};
use crate::core::EngineError;
use crate::util::{
    AssignmentId, ClassGroupId, DepartmentId, PeriodIndex, ProgramId, RequestId, SemesterId,
    SessionId,
};

/// Read-only access to catalog entities.
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// All programs.
    async fn get_programs(&self) -> Result<Vec<Program>, EngineError>;
    /// All class groups.
    async fn class_groups(&self) -> Result<Vec<ClassGroup>, EngineError>;
    /// All classrooms.
    async fn classrooms(&self) -> Result<Vec<Classroom>, EngineError>;
    /// All instructors.
    async fn instructors(&self) -> Result<Vec<Instructor>, EngineError>;
    /// All departments.
    async fn departments(&self) -> Result<Vec<Department>, EngineError>;
}

/// Persistent assignment storage.
///
/// Implementations enforce that no two assignments of a semester occupy the
/// same `(class group, period)`; the engine's own check runs on a snapshot
/// that may be stale.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Assignments of a semester.
    async fn list(&self, semester_id: &str) -> Result<Vec<Assignment>, EngineError>;
    /// Persist a new assignment. A write that overlaps an existing one for
    /// the same group and semester fails with `EngineError::StaleConflict`.
    async fn create(&self, assignment: NewAssignment) -> Result<Assignment, EngineError>;
    /// Delete an assignment.
    async fn delete(&self, assignment_id: AssignmentId) -> Result<(), EngineError>;
    /// Swap `old` for `new` in one transaction. Stores without transactions
    /// keep this default, and callers fall back to create-then-delete.
    async fn replace(
        &self,
        old: AssignmentId,
        new: NewAssignment,
    ) -> Result<Option<Assignment>, EngineError> {
        let _ = (old, new);
        Ok(None)
    }
}

/// A request for a department to approve use of one of its resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Resource kind.
    pub resource_type: ResourceKind,
    /// Resource identifier.
    pub resource_id: String,
    /// Department asked to approve.
    pub target_department_id: DepartmentId,
    /// Session that uses the resource.
    pub class_session_id: SessionId,
    /// User raising the request.
    pub requester_id: String,
    /// Program that owns the session.
    pub program_id: ProgramId,
    /// Semester of the placement.
    pub semester_id: SemesterId,
    /// Placement awaiting approval.
    pub assignment_id: AssignmentId,
}

/// Proposed relocation of a confirmed cross-department assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveApprovalRequest {
    /// Assignment that stays put until approval.
    pub assignment_id: AssignmentId,
    /// Session being moved.
    pub class_session_id: SessionId,
    /// User raising the request.
    pub requester_id: String,
    /// Semester of the placement.
    pub semester_id: SemesterId,
    /// Proposed class-group row.
    pub new_class_group_id: ClassGroupId,
    /// Proposed first period.
    pub new_start_period_index: PeriodIndex,
    /// Departments whose resources the session uses.
    pub target_department_ids: Vec<DepartmentId>,
}

/// Outbound approval workflow.
#[async_trait]
pub trait ApprovalGateway: Send + Sync {
    /// Raise a request for one cross-department resource.
    async fn create_request(&self, request: ApprovalRequest) -> Result<RequestId, EngineError>;
    /// Raise a request to relocate a confirmed cross-department assignment.
    async fn request_move_approval(
        &self,
        request: MoveApprovalRequest,
    ) -> Result<RequestId, EngineError>;
    /// Cancel every open request for a session, returning how many were
    /// cancelled.
    async fn cancel_active_requests_for_class_session(
        &self,
        session_id: &str,
    ) -> Result<usize, EngineError>;
}

/// Kind of change published by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// An assignment was created.
    Created,
    /// An assignment was deleted.
    Deleted,
    /// An assignment's approval status changed.
    StatusChanged,
}

/// Notification that an assignment changed in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentChange {
    /// Semester the assignment belongs to.
    pub semester_id: SemesterId,
    /// Assignment affected.
    pub assignment_id: AssignmentId,
    /// What happened.
    pub kind: ChangeKind,
}
