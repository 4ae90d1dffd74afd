//! Catalog entities, class sessions and assignments.

use serde::{Deserialize, Serialize};

use crate::util::{
    AssignmentId, ClassGroupId, ClassroomId, CourseId, DepartmentId, InstructorId, PeriodIndex,
    ProgramId, SemesterId, SessionId,
};

/// A course offered by a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course identifier.
    pub id: CourseId,
    /// Display name.
    pub name: String,
    /// Short catalog code.
    pub code: String,
    /// Optional rendering color.
    pub color_hint: Option<String>,
}

/// A teaching staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Instructor identifier.
    pub id: InstructorId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Owning department, if any.
    pub department_id: Option<DepartmentId>,
}

impl Instructor {
    /// Name shown in conflict messages.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", last) => last.to_string(),
            (first, "") => first.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Classroom identifier.
    pub id: ClassroomId,
    /// Display name.
    pub name: String,
    /// Seat count.
    pub capacity: u32,
    /// Department that owns the room, if any.
    pub preferred_department_id: Option<DepartmentId>,
}

/// A cohort of students that attends sessions together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Class-group identifier.
    pub id: ClassGroupId,
    /// Display name.
    pub name: String,
    /// Number of enrolled students.
    pub student_count: u32,
}

/// An academic program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program identifier.
    pub id: ProgramId,
    /// Display name.
    pub name: String,
    /// Owning department, if any.
    pub department_id: Option<DepartmentId>,
}

/// An organizational department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department identifier.
    pub id: DepartmentId,
    /// Display name.
    pub name: String,
}

/// A course taught by one instructor, in one room, to one group, for a run of
/// consecutive periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    /// Session identifier.
    pub id: SessionId,
    /// Course taught.
    pub course: Course,
    /// Instructor teaching.
    pub instructor: Instructor,
    /// Room used.
    pub classroom: Classroom,
    /// Group attending.
    pub group: ClassGroup,
    /// Consecutive periods occupied, at least 1.
    pub period_count: u32,
    /// Program that owns the session.
    pub program_id: ProgramId,
}

impl ClassSession {
    /// Periods occupied when starting at `start`.
    #[must_use]
    pub fn span(&self, start: PeriodIndex) -> std::ops::Range<PeriodIndex> {
        start..start.saturating_add(self.period_count)
    }

    /// Whether `other` is the same teaching block: identical course,
    /// instructor and classroom. Such sessions may share a period across
    /// groups.
    #[must_use]
    pub fn is_merge_of(&self, other: &Self) -> bool {
        self.course.id == other.course.id
            && self.instructor.id == other.instructor.id
            && self.classroom.id == other.classroom.id
    }
}

/// Approval state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Awaiting cross-department approval.
    Pending,
    /// Authoritative placement.
    Confirmed,
}

impl AssignmentStatus {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

/// A class session placed in the grid for one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Storage identifier.
    pub id: AssignmentId,
    /// Session placed.
    pub session: ClassSession,
    /// Class-group row the placement is stored under.
    pub class_group_id: ClassGroupId,
    /// First occupied period.
    pub start_period_index: PeriodIndex,
    /// Semester the placement belongs to.
    pub semester_id: SemesterId,
    /// Approval state.
    pub status: AssignmentStatus,
}

impl Assignment {
    /// Periods occupied by this assignment.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<PeriodIndex> {
        self.session.span(self.start_period_index)
    }

    /// Whether the assignment occupies `period`.
    #[must_use]
    pub fn covers(&self, period: PeriodIndex) -> bool {
        self.span().contains(&period)
    }

    /// Pending placements are locked until the approval workflow settles them.
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.status == AssignmentStatus::Confirmed
    }
}

/// Data needed to persist a new assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    /// Session placed.
    pub session: ClassSession,
    /// Class-group row to store under.
    pub class_group_id: ClassGroupId,
    /// First occupied period.
    pub start_period_index: PeriodIndex,
    /// Semester.
    pub semester_id: SemesterId,
    /// Initial approval state.
    pub status: AssignmentStatus,
}

impl NewAssignment {
    /// Attach a storage identifier.
    #[must_use]
    pub fn into_assignment(self, id: AssignmentId) -> Assignment {
        Assignment {
            id,
            session: self.session,
            class_group_id: self.class_group_id,
            start_period_index: self.start_period_index,
            semester_id: self.semester_id,
            status: self.status,
        }
    }
}

/// Shared resource kinds that can clash or need cross-department approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// An instructor.
    Instructor,
    /// A classroom.
    Classroom,
}

impl ResourceKind {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instructor => "instructor",
            Self::Classroom => "classroom",
        }
    }
}
