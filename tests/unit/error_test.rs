//! Tests for error types

use timetable_engine::core::{
    BoundaryViolation, ConflictReport, EngineError, OperationContext, Precondition,
};
use timetable_engine::config::ScheduleConfig;

#[test]
fn test_precondition_messages() {
    assert_eq!(
        EngineError::from(Precondition::MissingScheduleConfig).to_string(),
        "schedule settings are not configured"
    );
    assert_eq!(
        EngineError::from(Precondition::MissingSemester).to_string(),
        "no active semester is selected"
    );
    assert_eq!(
        EngineError::from(Precondition::Unauthenticated).to_string(),
        "you must be signed in to edit the timetable"
    );
}

#[test]
fn test_persistence_error() {
    let err = EngineError::Persistence("connection failed".to_string());
    assert_eq!(format!("{err}"), "persistence error: connection failed");
    assert!(!err.is_user_actionable());
    assert!(err.conflict().is_none());
}

#[test]
fn test_stale_conflict_is_user_actionable() {
    let err = EngineError::StaleConflict("slot taken".to_string());
    assert_eq!(err.to_string(), "slot taken");
    assert!(err.is_user_actionable());
    assert!(err.is_stale());
    assert!(err.conflict().is_none());
    assert!(!EngineError::Persistence("x".into()).is_stale());
}

#[test]
fn test_conflict_is_user_actionable() {
    let report = ConflictReport::PlacementBoundary(BoundaryViolation::ExceedsWeek {
        course_name: "Algebra".into(),
        start: 18,
        period_count: 3,
        total_periods: 20,
    });
    let err = EngineError::from(report.clone());
    assert!(err.is_user_actionable());
    assert_eq!(err.conflict(), Some(&report));
    assert_eq!(
        err.to_string(),
        "Algebra needs 3 periods but only 2 remain in the week from period 19"
    );
}

#[test]
fn test_invalid_schedule_is_reported_as_config_error() {
    let ctx = OperationContext {
        schedule: Some(ScheduleConfig::new(0, 5)),
        ..OperationContext::default()
    };
    let err = ctx.ensure_ready().unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
    assert_eq!(
        err.to_string(),
        "invalid configuration: periods_per_day must be greater than 0"
    );
}

#[test]
fn test_anyhow_context() {
    fn load() -> timetable_engine::core::AppResult<()> {
        Err(EngineError::NotFound("assignment 42".into()).into())
    }
    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "not found: assignment 42");
    assert!(err.downcast_ref::<EngineError>().is_some());
}
