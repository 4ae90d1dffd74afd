//! Placement conflict detection.
//!
//! Rules run in a fixed order and the first failing rule decides the report:
//!
//! 1. boundary (empty span, week end, day end)
//! 2. row identity, for moves (and pool drops when configured strictly)
//! 3. occupancy of the target class-group row
//! 4. instructor/classroom sharing with every other class-group row
//!
//! Sessions with the same course, instructor and classroom are one teaching
//! block and never clash with each other under rule 4.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::core::grid::{Grid, RowKeyKind};
use crate::core::model::{ClassSession, Program, ResourceKind};
use crate::util::{ClassGroupId, PeriodIndex, RowId};

/// Broad category of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Placement runs off the week or across a day boundary.
    PlacementBoundary,
    /// Moved session dropped on a row it is not bound to.
    ResourceRowMismatch,
    /// Target class group is busy.
    GroupConflict,
    /// Instructor or classroom is busy elsewhere.
    ResourceConflict,
}

/// Why a placement does not fit the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryViolation {
    /// The session occupies no periods.
    EmptySpan {
        /// Course name.
        course_name: String,
    },
    /// The run ends after the last period of the week.
    ExceedsWeek {
        /// Course name.
        course_name: String,
        /// Requested start.
        start: PeriodIndex,
        /// Periods needed.
        period_count: u32,
        /// Periods in the week.
        total_periods: u32,
    },
    /// The run starts on one day and ends on the next.
    CrossesDay {
        /// Course name.
        course_name: String,
        /// Label of the requested start period.
        start_label: String,
        /// Periods needed.
        period_count: u32,
        /// One-based day the run starts on.
        day: u32,
    },
}

/// An instructor or classroom already in use by another group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceClash {
    /// Which resource clashes.
    pub kind: ResourceKind,
    /// Resource identifier.
    pub resource_id: String,
    /// Resource display name (full name for instructors).
    pub resource_name: String,
    /// Group holding the resource.
    pub group_id: ClassGroupId,
    /// Group display name.
    pub group_name: String,
    /// Label of the first clashing period.
    pub period_label: String,
    /// Owning program of the clashing session, when it is not the
    /// candidate's program.
    pub program_name: Option<String>,
}

impl fmt::Display for ResourceClash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ResourceKind::Instructor => write!(
                f,
                "Instructor {} is already teaching {} at {}",
                self.resource_name, self.group_name, self.period_label
            )?,
            ResourceKind::Classroom => write!(
                f,
                "Classroom {} is already used by {} at {}",
                self.resource_name, self.group_name, self.period_label
            )?,
        }
        if let Some(program) = &self.program_name {
            write!(f, " (program {program})")?;
        }
        Ok(())
    }
}

/// A rejected placement, formatted for display as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictReport {
    /// See [`BoundaryViolation`].
    PlacementBoundary(BoundaryViolation),
    /// A moved session was dropped on the wrong resource row.
    ResourceRowMismatch {
        /// View the drop happened in.
        view: RowKeyKind,
        /// Name of the resource the session is bound to.
        resource_name: String,
        /// Row the session belongs on.
        expected_row_id: RowId,
        /// Row it was dropped on.
        target_row_id: RowId,
    },
    /// The target group already has another session in the span.
    GroupConflict {
        /// Occupied group.
        group_id: ClassGroupId,
        /// Group display name.
        group_name: String,
        /// Course occupying the slot.
        course_name: String,
        /// Label of the first occupied period.
        period_label: String,
    },
    /// Shared instructor and/or classroom clashes. Never empty.
    ResourceConflict(Vec<ResourceClash>),
}

impl ConflictReport {
    /// Category of this report.
    #[must_use]
    pub const fn kind(&self) -> ConflictKind {
        match self {
            Self::PlacementBoundary(_) => ConflictKind::PlacementBoundary,
            Self::ResourceRowMismatch { .. } => ConflictKind::ResourceRowMismatch,
            Self::GroupConflict { .. } => ConflictKind::GroupConflict,
            Self::ResourceConflict(_) => ConflictKind::ResourceConflict,
        }
    }

    /// Resource clashes of the given kind.
    pub fn clashes(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceClash> {
        let all: &[ResourceClash] = match self {
            Self::ResourceConflict(clashes) => clashes.as_slice(),
            _ => &[],
        };
        all.iter().filter(move |c| c.kind == kind)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacementBoundary(BoundaryViolation::EmptySpan { course_name }) => write!(
                f,
                "{course_name} has no periods to schedule; it must occupy at least one period"
            ),
            Self::PlacementBoundary(BoundaryViolation::ExceedsWeek {
                course_name,
                start,
                period_count,
                total_periods,
            }) => write!(
                f,
                "{course_name} needs {period_count} periods but only {} remain in the week from period {}",
                total_periods.saturating_sub(*start),
                start.saturating_add(1)
            ),
            Self::PlacementBoundary(BoundaryViolation::CrossesDay {
                course_name,
                start_label,
                period_count,
                day,
            }) => write!(
                f,
                "{course_name} needs {period_count} consecutive periods and cannot start at {start_label}: it would run past the end of day {day}"
            ),
            Self::ResourceRowMismatch {
                view,
                resource_name,
                expected_row_id,
                ..
            } => write!(
                f,
                "This session belongs to {} {resource_name} and can only be moved within row {expected_row_id}",
                view.noun()
            ),
            Self::GroupConflict {
                group_name,
                course_name,
                period_label,
                ..
            } => write!(
                f,
                "{group_name} already has {course_name} scheduled at {period_label}"
            ),
            Self::ResourceConflict(clashes) => {
                for (i, clash) in clashes.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{clash}")?;
                }
                Ok(())
            }
        }
    }
}

/// A candidate placement to validate.
#[derive(Debug, Clone, Copy)]
pub struct ConflictCheck<'a> {
    /// Session being placed.
    pub session: &'a ClassSession,
    /// Row the session was dropped on, in the grid's view.
    pub target_row_id: &'a str,
    /// First period of the candidate span.
    pub target_period: PeriodIndex,
    /// Relocation of an existing assignment rather than a pool drop.
    pub is_move: bool,
    /// Apply the row-identity rule to pool drops as well.
    pub strict_pool_drops: bool,
    /// Class group the relocated assignment is stored under.
    pub stored_group_id: Option<&'a str>,
}

impl<'a> ConflictCheck<'a> {
    /// A new placement dropped from the unassigned pool.
    #[must_use]
    pub const fn placement(session: &'a ClassSession, target_row_id: &'a str, target_period: PeriodIndex) -> Self {
        Self {
            session,
            target_row_id,
            target_period,
            is_move: false,
            strict_pool_drops: false,
            stored_group_id: None,
        }
    }

    /// A relocation of an existing assignment.
    #[must_use]
    pub const fn relocation(session: &'a ClassSession, target_row_id: &'a str, target_period: PeriodIndex) -> Self {
        Self {
            is_move: true,
            ..Self::placement(session, target_row_id, target_period)
        }
    }

    /// Enforce row identity on pool drops.
    #[must_use]
    pub const fn with_strict_pool_drops(mut self, strict: bool) -> Self {
        self.strict_pool_drops = strict;
        self
    }

    /// Keep the relocated assignment under `group_id` in views that do not
    /// address class groups.
    #[must_use]
    pub const fn stored_under(mut self, group_id: &'a str) -> Self {
        self.stored_group_id = Some(group_id);
        self
    }

    /// Class-group row the candidate would be stored under.
    #[must_use]
    pub fn target_group_id(&self, view: RowKeyKind) -> &'a str {
        match (view, self.stored_group_id) {
            (RowKeyKind::ClassGroup, _) => self.target_row_id,
            (_, Some(group_id)) => group_id,
            (_, None) => &self.session.group.id,
        }
    }
}

/// Validate a candidate placement against the current grid.
///
/// Returns `None` when the placement is valid.
#[must_use]
pub fn check_conflict(
    grid: &Grid,
    check: &ConflictCheck<'_>,
    settings: &ScheduleConfig,
    programs: &[Program],
) -> Option<ConflictReport> {
    check_boundary(check, settings)
        .or_else(|| check_row_identity(grid.view(), check))
        .or_else(|| check_group_row(grid, check, settings))
        .or_else(|| check_shared_resources(grid, check, settings, programs))
}

fn check_boundary(check: &ConflictCheck<'_>, settings: &ScheduleConfig) -> Option<ConflictReport> {
    let session = check.session;
    let count = session.period_count;
    let start = check.target_period;
    if count == 0 {
        return Some(ConflictReport::PlacementBoundary(
            BoundaryViolation::EmptySpan {
                course_name: session.course.name.clone(),
            },
        ));
    }
    let total = settings.total_periods();

    if start.saturating_add(count) > total {
        return Some(ConflictReport::PlacementBoundary(
            BoundaryViolation::ExceedsWeek {
                course_name: session.course.name.clone(),
                start,
                period_count: count,
                total_periods: total,
            },
        ));
    }
    let last = start + count - 1;
    if settings.day_of(start) != settings.day_of(last) {
        return Some(ConflictReport::PlacementBoundary(
            BoundaryViolation::CrossesDay {
                course_name: session.course.name.clone(),
                start_label: settings.period_label(start),
                period_count: count,
                day: settings.day_of(start) + 1,
            },
        ));
    }
    None
}

fn check_row_identity(view: RowKeyKind, check: &ConflictCheck<'_>) -> Option<ConflictReport> {
    if !check.is_move && !check.strict_pool_drops {
        return None;
    }
    let expected = view.row_of(check.session);
    if expected == check.target_row_id {
        return None;
    }
    Some(ConflictReport::ResourceRowMismatch {
        view,
        resource_name: view.resource_name(check.session),
        expected_row_id: expected.to_string(),
        target_row_id: check.target_row_id.to_string(),
    })
}

fn check_group_row(
    grid: &Grid,
    check: &ConflictCheck<'_>,
    settings: &ScheduleConfig,
) -> Option<ConflictReport> {
    let group_id = check.target_group_id(grid.view());
    check.session.span(check.target_period).find_map(|p| {
        let occupant = grid.group_cell(group_id, p)?;
        if occupant.session.id == check.session.id {
            return None;
        }
        Some(ConflictReport::GroupConflict {
            group_id: group_id.to_string(),
            group_name: occupant.session.group.name.clone(),
            course_name: occupant.session.course.name.clone(),
            period_label: settings.period_label(p),
        })
    })
}

fn check_shared_resources(
    grid: &Grid,
    check: &ConflictCheck<'_>,
    settings: &ScheduleConfig,
    programs: &[Program],
) -> Option<ConflictReport> {
    let candidate = check.session;
    let target_group = check.target_group_id(grid.view());
    let mut seen: BTreeSet<(ResourceKind, &str)> = BTreeSet::new();
    let mut clashes = Vec::new();

    for p in candidate.span(check.target_period) {
        for (group_id, row) in grid.group_rows() {
            if group_id == target_group {
                continue;
            }
            let Some(occupant) = row.get(p as usize).and_then(Option::as_deref) else {
                continue;
            };
            let other = &occupant.session;
            if other.id == candidate.id || other.is_merge_of(candidate) {
                continue;
            }
            let program_name = foreign_program_name(other, candidate, programs);
            if other.instructor.id == candidate.instructor.id
                && seen.insert((ResourceKind::Instructor, group_id.as_str()))
            {
                clashes.push(ResourceClash {
                    kind: ResourceKind::Instructor,
                    resource_id: other.instructor.id.clone(),
                    resource_name: other.instructor.full_name(),
                    group_id: group_id.clone(),
                    group_name: other.group.name.clone(),
                    period_label: settings.period_label(p),
                    program_name: program_name.clone(),
                });
            }
            if other.classroom.id == candidate.classroom.id
                && seen.insert((ResourceKind::Classroom, group_id.as_str()))
            {
                clashes.push(ResourceClash {
                    kind: ResourceKind::Classroom,
                    resource_id: other.classroom.id.clone(),
                    resource_name: other.classroom.name.clone(),
                    group_id: group_id.clone(),
                    group_name: other.group.name.clone(),
                    period_label: settings.period_label(p),
                    program_name,
                });
            }
        }
    }

    if clashes.is_empty() {
        None
    } else {
        Some(ConflictReport::ResourceConflict(clashes))
    }
}

fn foreign_program_name(
    other: &ClassSession,
    candidate: &ClassSession,
    programs: &[Program],
) -> Option<String> {
    if other.program_id == candidate.program_id {
        return None;
    }
    Some(
        programs
            .iter()
            .find(|p| p.id == other.program_id)
            .map_or_else(|| other.program_id.clone(), |p| p.name.clone()),
    )
}
