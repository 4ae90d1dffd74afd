//! Tests for utility functions

use timetable_engine::util::{init_tracing_with, now_ms, AssignmentId, PeriodIndex};

#[test]
fn test_now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing_with("debug");
    init_tracing_with("info");
    tracing::info!("tracing initialized twice without panicking");
}

#[test]
fn test_identifier_types() {
    let id: AssignmentId = uuid::Uuid::new_v4();
    assert_eq!(id.get_version_num(), 4);
    let period: PeriodIndex = 19;
    assert_eq!(period, 19);
}
