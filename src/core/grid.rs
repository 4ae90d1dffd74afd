//! Period grid construction.
//!
//! A [`Grid`] re-keys the flat assignment list of a semester into rows of
//! period slots. Which entity a row stands for depends on the active
//! [`RowKeyKind`]; independently of the view, every grid also keeps the
//! class-group rows that assignments are stored under, so conflict checks can
//! always reason about groups.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::model::{
    Assignment, AssignmentStatus, ClassGroup, ClassSession, Classroom, Instructor,
};
use crate::util::{AssignmentId, ClassGroupId, PeriodIndex, RowId, SessionId};

/// Entity a grid row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKeyKind {
    /// One row per class group.
    ClassGroup,
    /// One row per classroom.
    Classroom,
    /// One row per instructor.
    Instructor,
}

impl RowKeyKind {
    /// Row a session is bound to under this view.
    #[must_use]
    pub fn row_of(self, session: &ClassSession) -> &str {
        match self {
            Self::ClassGroup => &session.group.id,
            Self::Classroom => &session.classroom.id,
            Self::Instructor => &session.instructor.id,
        }
    }

    /// Display name of the resource a session is bound to under this view.
    #[must_use]
    pub fn resource_name(self, session: &ClassSession) -> String {
        match self {
            Self::ClassGroup => session.group.name.clone(),
            Self::Classroom => session.classroom.name.clone(),
            Self::Instructor => session.instructor.full_name(),
        }
    }

    /// Lowercase noun for messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::ClassGroup => "class group",
            Self::Classroom => "classroom",
            Self::Instructor => "instructor",
        }
    }
}

/// A renderable row header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResource {
    /// Row identifier.
    pub id: RowId,
    /// Row label.
    pub name: String,
}

impl From<&ClassGroup> for RowResource {
    fn from(group: &ClassGroup) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
        }
    }
}

impl From<&Classroom> for RowResource {
    fn from(room: &Classroom) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
        }
    }
}

impl From<&Instructor> for RowResource {
    fn from(instructor: &Instructor) -> Self {
        Self {
            id: instructor.id.clone(),
            name: instructor.full_name(),
        }
    }
}

/// What a non-empty slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedSession {
    /// Assignment that put the session here.
    pub assignment_id: AssignmentId,
    /// Session occupying the slot.
    pub session: ClassSession,
    /// Class-group row the assignment is stored under.
    pub class_group_id: ClassGroupId,
    /// First period of the assignment.
    pub start_period_index: PeriodIndex,
    /// Approval state.
    pub status: AssignmentStatus,
}

impl From<&Assignment> for PlacedSession {
    fn from(a: &Assignment) -> Self {
        Self {
            assignment_id: a.id,
            session: a.session.clone(),
            class_group_id: a.class_group_id.clone(),
            start_period_index: a.start_period_index,
            status: a.status,
        }
    }
}

/// One slot of a row.
pub type Slot = Option<Arc<PlacedSession>>;

/// Per-view mapping from row id to `total_periods` slots.
#[derive(Debug, Clone)]
pub struct Grid {
    view: RowKeyKind,
    total_periods: u32,
    order: Vec<RowResource>,
    rows: HashMap<RowId, Vec<Slot>>,
    group_rows: BTreeMap<ClassGroupId, Vec<Slot>>,
}

impl Grid {
    /// Active view.
    #[must_use]
    pub const fn view(&self) -> RowKeyKind {
        self.view
    }

    /// Number of periods per row.
    #[must_use]
    pub const fn total_periods(&self) -> u32 {
        self.total_periods
    }

    /// Row headers in caller order.
    #[must_use]
    pub fn row_resources(&self) -> &[RowResource] {
        &self.order
    }

    /// Slots of a view row.
    #[must_use]
    pub fn row(&self, row_id: &str) -> Option<&[Slot]> {
        self.rows.get(row_id).map(Vec::as_slice)
    }

    /// Session shown in a view cell.
    #[must_use]
    pub fn cell(&self, row_id: &str, period: PeriodIndex) -> Option<&PlacedSession> {
        self.rows
            .get(row_id)
            .and_then(|row| row.get(period as usize))
            .and_then(|slot| slot.as_deref())
    }

    /// Session stored under a class group at a period, regardless of view.
    #[must_use]
    pub fn group_cell(&self, group_id: &str, period: PeriodIndex) -> Option<&PlacedSession> {
        self.group_rows
            .get(group_id)
            .and_then(|row| row.get(period as usize))
            .and_then(|slot| slot.as_deref())
    }

    /// Class-group storage rows, ordered by group id.
    pub fn group_rows(&self) -> impl Iterator<Item = (&ClassGroupId, &[Slot])> {
        self.group_rows.iter().map(|(id, row)| (id, row.as_slice()))
    }

    /// Sessions awaiting approval anywhere in the grid.
    #[must_use]
    pub fn pending_session_ids(&self) -> BTreeSet<SessionId> {
        self.group_rows
            .values()
            .flatten()
            .flatten()
            .filter(|placed| placed.status == AssignmentStatus::Pending)
            .map(|placed| placed.session.id.clone())
            .collect()
    }
}

/// Build the grid for one view.
///
/// Rows are created for `row_resources` only; placements on rows outside
/// that list are dropped from the view. Class-group storage rows are built
/// for every assignment.
#[must_use]
pub fn build_grid(
    assignments: &[Assignment],
    view: RowKeyKind,
    row_resources: &[RowResource],
    total_periods: u32,
) -> Grid {
    let empty_row = || vec![None; total_periods as usize];
    let mut rows: HashMap<RowId, Vec<Slot>> = row_resources
        .iter()
        .map(|r| (r.id.clone(), empty_row()))
        .collect();
    let mut group_rows: BTreeMap<ClassGroupId, Vec<Slot>> = BTreeMap::new();

    for assignment in assignments {
        let placed = Arc::new(PlacedSession::from(assignment));
        let periods: Vec<PeriodIndex> = assignment
            .span()
            .filter(|p| *p < total_periods)
            .collect();
        if periods.len() < assignment.session.period_count as usize {
            tracing::debug!(
                assignment = %assignment.id,
                "assignment extends past the grid; trailing periods dropped"
            );
        }

        let group_row = group_rows
            .entry(assignment.class_group_id.clone())
            .or_insert_with(empty_row);
        fill(group_row, &periods, &placed);

        let mut keys = vec![match view {
            RowKeyKind::ClassGroup => assignment.class_group_id.as_str(),
            other => other.row_of(&assignment.session),
        }];
        if view != RowKeyKind::ClassGroup {
            keys.push(assignment.class_group_id.as_str());
        }
        for key in keys {
            match rows.get_mut(key) {
                Some(row) => fill(row, &periods, &placed),
                None => tracing::debug!(
                    assignment = %assignment.id,
                    row = key,
                    "row not in view; placement not rendered"
                ),
            }
        }
    }

    Grid {
        view,
        total_periods,
        order: row_resources.to_vec(),
        rows,
        group_rows,
    }
}

fn fill(row: &mut [Slot], periods: &[PeriodIndex], placed: &Arc<PlacedSession>) {
    for &p in periods {
        let slot = &mut row[p as usize];
        if let Some(existing) = slot.as_ref() {
            // Merged teaching blocks share a classroom/instructor row.
            if existing.session.id != placed.session.id {
                tracing::debug!(
                    period = p,
                    kept = %existing.session.id,
                    skipped = %placed.session.id,
                    "slot already occupied"
                );
            }
            continue;
        }
        *slot = Some(Arc::clone(placed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{assignment, session};

    #[test]
    fn test_builds_group_rows() {
        let s = session("S1", "C1", "I1", "R1", "G1", 2);
        let a = assignment(&s, 1);
        let rows = vec![RowResource {
            id: "G1".into(),
            name: "Group 1".into(),
        }];
        let grid = build_grid(&[a], RowKeyKind::ClassGroup, &rows, 20);

        assert!(grid.cell("G1", 0).is_none());
        assert_eq!(grid.cell("G1", 1).map(|c| c.session.id.as_str()), Some("S1"));
        assert_eq!(grid.cell("G1", 2).map(|c| c.session.id.as_str()), Some("S1"));
        assert!(grid.cell("G1", 3).is_none());
        assert_eq!(grid.row("G1").map(<[Slot]>::len), Some(20));
    }

    #[test]
    fn test_classroom_view_rekeys_rows() {
        let s = session("S1", "C1", "I1", "R1", "G1", 1);
        let rows = vec![
            RowResource {
                id: "R1".into(),
                name: "Room 1".into(),
            },
            RowResource {
                id: "R2".into(),
                name: "Room 2".into(),
            },
        ];
        let grid = build_grid(&[assignment(&s, 4)], RowKeyKind::Classroom, &rows, 20);

        assert!(grid.cell("R1", 4).is_some());
        assert!(grid.cell("R2", 4).is_none());
        assert!(grid.row("G1").is_none());
        assert!(grid.group_cell("G1", 4).is_some());
    }

    #[test]
    fn test_drops_rows_outside_view() {
        let s = session("S1", "C1", "I1", "R1", "G9", 1);
        let rows = vec![RowResource {
            id: "G1".into(),
            name: "Group 1".into(),
        }];
        let grid = build_grid(&[assignment(&s, 0)], RowKeyKind::ClassGroup, &rows, 20);

        assert!(grid.row("G9").is_none());
        assert!(grid.row("G1").unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_merged_sessions_keep_one_session_per_slot() {
        let a = session("S1", "C1", "I1", "R1", "G1", 1);
        let b = session("S2", "C1", "I1", "R1", "G2", 1);
        let rows = vec![RowResource {
            id: "R1".into(),
            name: "Room 1".into(),
        }];
        let grid = build_grid(
            &[assignment(&a, 0), assignment(&b, 0)],
            RowKeyKind::Classroom,
            &rows,
            20,
        );

        assert_eq!(grid.cell("R1", 0).map(|c| c.session.id.as_str()), Some("S1"));
        assert!(grid.group_cell("G2", 0).is_some());
    }

    #[test]
    fn test_pending_session_ids() {
        let a = session("S1", "C1", "I1", "R1", "G1", 1);
        let b = session("S2", "C2", "I2", "R2", "G2", 1);
        let mut pending = assignment(&b, 3);
        pending.status = AssignmentStatus::Pending;
        let grid = build_grid(&[assignment(&a, 0), pending], RowKeyKind::ClassGroup, &[], 20);

        let ids: Vec<_> = grid.pending_session_ids().into_iter().collect();
        assert_eq!(ids, vec!["S2".to_string()]);
    }
}
