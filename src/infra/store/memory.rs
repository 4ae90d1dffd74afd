//! In-memory assignment store with change notifications.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::core::{
    settle, ApprovalDecision, Assignment, AssignmentChange, AssignmentStore, ChangeKind,
    EngineError, NewAssignment,
};
use crate::util::AssignmentId;

const CHANGE_FEED_CAPACITY: usize = 256;

/// Shared store for development, tests and single-process deployments.
///
/// Enforces one assignment per `(class group, period, semester)` and
/// publishes every change on a broadcast channel.
pub struct InMemoryAssignmentStore {
    assignments: Mutex<Vec<Assignment>>,
    changes: broadcast::Sender<AssignmentChange>,
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAssignmentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            assignments: Mutex::new(Vec::new()),
            changes,
        }
    }

    /// Create a store seeded with existing assignments. Seeds are not checked
    /// for overlaps.
    #[must_use]
    pub fn with_assignments(assignments: Vec<Assignment>) -> Self {
        let store = Self::new();
        *store.assignments.lock() = assignments;
        store
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AssignmentChange> {
        self.changes.subscribe()
    }

    /// All stored assignments, across semesters.
    #[must_use]
    pub fn all(&self) -> Vec<Assignment> {
        self.assignments.lock().clone()
    }

    /// Apply an approval decision to a pending assignment. Approval confirms
    /// it; rejection deletes it.
    pub fn apply_decision(
        &self,
        assignment_id: AssignmentId,
        decision: ApprovalDecision,
    ) -> Result<Option<Assignment>, EngineError> {
        let mut assignments = self.assignments.lock();
        let idx = assignments
            .iter()
            .position(|a| a.id == assignment_id)
            .ok_or_else(|| EngineError::NotFound(format!("assignment {assignment_id}")))?;
        let next = settle(assignments[idx].status, decision).map_err(EngineError::Persistence)?;
        let semester_id = assignments[idx].semester_id.clone();
        let (result, kind) = match next {
            Some(status) => {
                assignments[idx].status = status;
                (Some(assignments[idx].clone()), ChangeKind::StatusChanged)
            }
            None => {
                assignments.remove(idx);
                (None, ChangeKind::Deleted)
            }
        };
        drop(assignments);
        self.publish(semester_id, assignment_id, kind);
        Ok(result)
    }

    fn publish(&self, semester_id: String, assignment_id: AssignmentId, kind: ChangeKind) {
        // No subscribers is fine.
        let _ = self.changes.send(AssignmentChange {
            semester_id,
            assignment_id,
            kind,
        });
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn list(&self, semester_id: &str) -> Result<Vec<Assignment>, EngineError> {
        Ok(self
            .assignments
            .lock()
            .iter()
            .filter(|a| a.semester_id == semester_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewAssignment) -> Result<Assignment, EngineError> {
        let assignment = new.into_assignment(uuid::Uuid::new_v4());
        {
            let mut assignments = self.assignments.lock();
            ensure_free(&assignments, &assignment, None)?;
            assignments.push(assignment.clone());
        }
        self.publish(
            assignment.semester_id.clone(),
            assignment.id,
            ChangeKind::Created,
        );
        Ok(assignment)
    }

    async fn replace(
        &self,
        old: AssignmentId,
        new: NewAssignment,
    ) -> Result<Option<Assignment>, EngineError> {
        let assignment = new.into_assignment(uuid::Uuid::new_v4());
        let old_semester = {
            let mut assignments = self.assignments.lock();
            let idx = assignments
                .iter()
                .position(|a| a.id == old)
                .ok_or_else(|| EngineError::NotFound(format!("assignment {old}")))?;
            ensure_free(&assignments, &assignment, Some(old))?;
            let removed = assignments.remove(idx);
            assignments.push(assignment.clone());
            removed.semester_id
        };
        self.publish(
            assignment.semester_id.clone(),
            assignment.id,
            ChangeKind::Created,
        );
        self.publish(old_semester, old, ChangeKind::Deleted);
        Ok(Some(assignment))
    }

    async fn delete(&self, assignment_id: AssignmentId) -> Result<(), EngineError> {
        let removed = {
            let mut assignments = self.assignments.lock();
            let idx = assignments
                .iter()
                .position(|a| a.id == assignment_id)
                .ok_or_else(|| EngineError::NotFound(format!("assignment {assignment_id}")))?;
            assignments.remove(idx)
        };
        self.publish(removed.semester_id, assignment_id, ChangeKind::Deleted);
        Ok(())
    }
}

fn ensure_free(
    assignments: &[Assignment],
    candidate: &Assignment,
    replacing: Option<AssignmentId>,
) -> Result<(), EngineError> {
    let taken = assignments
        .iter()
        .filter(|a| Some(a.id) != replacing)
        .filter(|a| {
            a.semester_id == candidate.semester_id && a.class_group_id == candidate.class_group_id
        })
        .find_map(|a| candidate.span().find(|p| a.covers(*p)));
    match taken {
        Some(period) => Err(EngineError::StaleConflict(format!(
            "class group {} already has an assignment at period {period} in semester {}; the timetable changed since it was loaded",
            candidate.class_group_id, candidate.semester_id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{assignment, session};
    use crate::core::AssignmentStatus;

    fn new_assignment(start: u32) -> NewAssignment {
        let s = session("S1", "C1", "I1", "R1", "G1", 2);
        NewAssignment {
            class_group_id: s.group.id.clone(),
            session: s,
            start_period_index: start,
            semester_id: "2026-fall".into(),
            status: AssignmentStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn test_rejects_overlapping_group_periods() {
        let store = InMemoryAssignmentStore::new();
        store.create(new_assignment(0)).await.unwrap();
        let err = store.create(new_assignment(1)).await.unwrap_err();
        assert!(matches!(err, EngineError::StaleConflict(_)));
        assert!(err.is_user_actionable());
        store.create(new_assignment(2)).await.unwrap();
        assert_eq!(store.list("2026-fall").await.unwrap().len(), 2);
        assert!(store.list("2027-spring").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_allows_overlap_with_itself() {
        let store = InMemoryAssignmentStore::new();
        let first = store.create(new_assignment(0)).await.unwrap();
        let moved = store.replace(first.id, new_assignment(1)).await.unwrap().unwrap();
        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, moved.id);
        assert_eq!(all[0].start_period_index, 1);
    }

    #[tokio::test]
    async fn test_publishes_changes() {
        let store = InMemoryAssignmentStore::new();
        let mut rx = store.subscribe();
        let created = store.create(new_assignment(0)).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Created);
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Deleted);
    }

    #[tokio::test]
    async fn test_apply_decision() {
        let s = session("S1", "C1", "I1", "R1", "G1", 1);
        let mut pending = assignment(&s, 0);
        pending.status = AssignmentStatus::Pending;
        let id = pending.id;
        let store = InMemoryAssignmentStore::with_assignments(vec![pending]);

        let approved = store.apply_decision(id, ApprovalDecision::Approve).unwrap().unwrap();
        assert_eq!(approved.status, AssignmentStatus::Confirmed);
        assert!(store.apply_decision(id, ApprovalDecision::Reject).is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = InMemoryAssignmentStore::new();
        let err = store.delete(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
