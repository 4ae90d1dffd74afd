//! Postgres-backed assignment store (schema and interface stubs).

use async_trait::async_trait;

use crate::core::{Assignment, AssignmentStore, EngineError, NewAssignment};
use crate::util::AssignmentId;

/// Postgres store adapter placeholder.
///
/// The schema stores one row per occupied period so the database enforces
/// `(class_group_id, period_index, semester_id)` uniqueness directly.
/// A violation of that constraint is reported as
/// [`EngineError::StaleConflict`].
#[derive(Debug, Default)]
pub struct PostgresAssignmentStore;

impl PostgresAssignmentStore {
    /// Create a new adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Migration statements for assignment storage.
    #[must_use]
    pub fn migrations() -> &'static [&'static str] {
        &[
            r"
CREATE TABLE IF NOT EXISTS tt_assignments (
    id UUID PRIMARY KEY,
    class_session_id TEXT NOT NULL,
    class_group_id TEXT NOT NULL,
    start_period_index INT NOT NULL,
    period_count INT NOT NULL CHECK (period_count >= 1),
    semester_id TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_tt_assignments_semester ON tt_assignments (semester_id);
",
            r"
CREATE TABLE IF NOT EXISTS tt_assignment_periods (
    assignment_id UUID NOT NULL REFERENCES tt_assignments (id) ON DELETE CASCADE,
    class_group_id TEXT NOT NULL,
    period_index INT NOT NULL,
    semester_id TEXT NOT NULL,
    UNIQUE (class_group_id, period_index, semester_id)
);
",
        ]
    }
}

#[async_trait]
impl AssignmentStore for PostgresAssignmentStore {
    async fn list(&self, _semester_id: &str) -> Result<Vec<Assignment>, EngineError> {
        Err(EngineError::Persistence(
            "postgres store not wired to database client".into(),
        ))
    }

    async fn create(&self, _assignment: NewAssignment) -> Result<Assignment, EngineError> {
        Err(EngineError::Persistence(
            "postgres store not wired to database client".into(),
        ))
    }

    async fn delete(&self, _assignment_id: AssignmentId) -> Result<(), EngineError> {
        Err(EngineError::Persistence(
            "postgres store not wired to database client".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_period_uniqueness() {
        let schema = PostgresAssignmentStore::migrations().join("\n");
        assert!(schema.contains("UNIQUE (class_group_id, period_index, semester_id)"));
    }

    #[tokio::test]
    async fn test_unwired_store_reports_persistence_error() {
        let store = PostgresAssignmentStore::new();
        let err = store.list("2026-fall").await.unwrap_err();
        assert!(matches!(err, EngineError::Persistence(_)));
    }
}
