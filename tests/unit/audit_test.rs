//! Tests for audit sink

use timetable_engine::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let event = build_audit_event("2026-fall", "S1", "u1", AuditAction::Assign, Some("confirmed".into()));

    sink.record(event.clone());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], event);
    assert_eq!(events[0].action.as_str(), "assign");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);
    sink.record(build_audit_event("2026-fall", "S1", "u1", AuditAction::Assign, None));
    sink.record(build_audit_event("2026-fall", "S2", "u1", AuditAction::Move, None));
    sink.record(build_audit_event("2026-fall", "S3", "u1", AuditAction::Remove, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].session_id, "S2"); // First one popped
    assert_eq!(events[1].session_id, "S3");
}

#[test]
fn test_zero_capacity_sink_records_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("2026-fall", "S1", "u1", AuditAction::Assign, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event("2026-fall", "S1", "u1", AuditAction::MoveRequested, Some("0 -> G1:2".into()));
    let b = build_audit_event("2026-fall", "S1", "u1", AuditAction::MoveRequested, None);

    assert_eq!(a.semester_id, "2026-fall");
    assert_eq!(a.requester_id, "u1");
    assert_eq!(a.detail.as_deref(), Some("0 -> G1:2"));
    assert!(a.created_at_ms > 0);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_audit_action_wire_names() {
    let json = serde_json::to_string(&AuditAction::ApprovalRequestFailed).unwrap();
    assert_eq!(json, "\"approval_request_failed\"");
    assert_eq!(AuditAction::ApprovalRequestFailed.as_str(), "approval_request_failed");
}
