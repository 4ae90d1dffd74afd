//! Audit trail of timetable mutations.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;

/// Mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A session was placed.
    Assign,
    /// An assignment was relocated.
    Move,
    /// A relocation was sent for approval instead of applied.
    MoveRequested,
    /// An assignment was removed.
    Remove,
    /// An approval request could not be raised after a placement.
    ApprovalRequestFailed,
}

impl AuditAction {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Move => "move",
            Self::MoveRequested => "move_requested",
            Self::Remove => "remove",
            Self::ApprovalRequestFailed => "approval_request_failed",
        }
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Semester affected.
    pub semester_id: String,
    /// Session affected.
    pub session_id: String,
    /// User who triggered the mutation.
    pub requester_id: String,
    /// Mutation.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink keeping the most recent events.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Build an audit event stamped with the current time and a fresh id.
pub fn build_audit_event(
    semester_id: impl Into<String>,
    session_id: impl Into<String>,
    requester_id: impl Into<String>,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        semester_id: semester_id.into(),
        session_id: session_id.into(),
        requester_id: requester_id.into(),
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
