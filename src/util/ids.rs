//! Identifier aliases shared across the engine.
//!
//! Catalog entities are identified by the opaque string ids handed out by the
//! storage layer; the engine never parses them.

/// Class session identifier.
pub type SessionId = String;
/// Course identifier.
pub type CourseId = String;
/// Instructor identifier.
pub type InstructorId = String;
/// Classroom identifier.
pub type ClassroomId = String;
/// Class-group (student cohort) identifier.
pub type ClassGroupId = String;
/// Program identifier.
pub type ProgramId = String;
/// Department identifier.
pub type DepartmentId = String;
/// Semester identifier.
pub type SemesterId = String;
/// Row identifier in a grid; which entity it names depends on the view.
pub type RowId = String;
/// Zero-based period index in the weekly grid, laid out day-major.
pub type PeriodIndex = u32;
/// Persisted assignment identifier.
pub type AssignmentId = uuid::Uuid;
/// Approval request identifier issued by the approval gateway.
pub type RequestId = uuid::Uuid;
