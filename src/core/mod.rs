//! Core scheduling abstractions: grid, conflict rules, approval lifecycle and
//! the operations that combine them.

pub mod audit;
pub mod conflict;
pub mod error;
pub mod grid;
pub mod model;
pub mod operations;
pub mod ports;
pub mod state_machine;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use conflict::{
    check_conflict, BoundaryViolation, ConflictCheck, ConflictKind, ConflictReport, ResourceClash,
};
pub use error::{AppResult, EngineError, Precondition};
pub use grid::{build_grid, Grid, PlacedSession, RowKeyKind, RowResource, Slot};
pub use model::{
    Assignment, AssignmentStatus, ClassGroup, ClassSession, Classroom, Course, Department,
    Instructor, NewAssignment, Program, ResourceKind,
};
pub use operations::{
    ApprovalFailure, AssignOutcome, CellRef, MoveOutcome, OperationContext, RemoveOutcome,
    Requester, Scheduler,
};
pub use ports::{
    ApprovalGateway, ApprovalRequest, AssignmentChange, AssignmentStore, ChangeKind,
    MoveApprovalRequest, ResourceCatalog,
};
pub use state_machine::{
    cross_department_resources, decide_move, initial_status, pending_session_ids, settle,
    ApprovalDecision, CrossDepartmentResource, MoveDecision,
};
pub use sync::{RowCatalog, Snapshot, SnapshotCache, Timetable};
