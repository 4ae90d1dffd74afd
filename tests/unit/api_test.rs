//! Tests for API response models

use timetable_engine::core::{
    Assignment, AssignOutcome, AssignmentStatus, ClassGroup, ClassSession, Classroom,
    ConflictReport, Course, EngineError, Instructor, MoveOutcome, Precondition, RemoveOutcome,
};
use timetable_engine::runtime::{OperationKind, OperationResponse, OperationStatus};

fn assignment(status: AssignmentStatus) -> Assignment {
    Assignment {
        id: uuid::Uuid::new_v4(),
        session: ClassSession {
            id: "S1".into(),
            course: Course {
                id: "C1".into(),
                name: "Algebra".into(),
                code: "MAT101".into(),
                color_hint: None,
            },
            instructor: Instructor {
                id: "I1".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                department_id: None,
            },
            classroom: Classroom {
                id: "R1".into(),
                name: "Room 1".into(),
                capacity: 30,
                preferred_department_id: None,
            },
            group: ClassGroup {
                id: "G1".into(),
                name: "Group 1".into(),
                student_count: 25,
            },
            period_count: 1,
            program_id: "P1".into(),
        },
        class_group_id: "G1".into(),
        start_period_index: 0,
        semester_id: "2026-fall".into(),
        status,
    }
}

#[test]
fn test_assign_success_reports_status() {
    let result = Ok(AssignOutcome {
        assignment: assignment(AssignmentStatus::Pending),
        requests: vec![uuid::Uuid::new_v4()],
        approval_failures: Vec::new(),
    });
    let response = OperationResponse::from_assign(&result);
    assert!(response.ok);
    assert_eq!(response.message, None);
    assert_eq!(response.status, OperationStatus::Pending);
    assert!(response.approval_warnings.is_empty());
}

#[test]
fn test_conflicts_and_preconditions_are_verbatim() {
    let report = ConflictReport::GroupConflict {
        group_id: "G1".into(),
        group_name: "Group 1".into(),
        course_name: "Algebra".into(),
        period_label: "Day 1, 08:00-08:50".into(),
    };
    let response = OperationResponse::from_assign(&Err(EngineError::from(report)));
    assert!(!response.ok);
    assert_eq!(response.status, OperationStatus::Rejected);
    assert_eq!(
        response.message.as_deref(),
        Some("Group 1 already has Algebra scheduled at Day 1, 08:00-08:50")
    );

    let response =
        OperationResponse::from_remove(&Err(EngineError::from(Precondition::Unauthenticated)));
    assert_eq!(
        response.message.as_deref(),
        Some("you must be signed in to edit the timetable")
    );
}

#[test]
fn test_slot_taken_by_another_editor_is_verbatim() {
    let err = EngineError::StaleConflict(
        "class group G1 already has an assignment at period 3 in semester 2026-fall; the timetable changed since it was loaded".into(),
    );
    let response = OperationResponse::failure(OperationKind::Assign, &err);
    assert_eq!(response.status, OperationStatus::Rejected);
    assert_eq!(
        response.message.as_deref(),
        Some("class group G1 already has an assignment at period 3 in semester 2026-fall; the timetable changed since it was loaded")
    );
}

#[test]
fn test_collaborator_failures_name_the_operation() {
    let err = EngineError::Persistence("timeout".into());
    assert_eq!(
        OperationResponse::failure(OperationKind::Move, &err).message.as_deref(),
        Some("move failed: timeout")
    );
    let err = EngineError::Approval("gateway down".into());
    assert_eq!(
        OperationResponse::failure(OperationKind::Remove, &err).message.as_deref(),
        Some("remove failed: approval request failed: gateway down")
    );
}

#[test]
fn test_move_and_remove_statuses() {
    assert_eq!(
        OperationResponse::from_move(&Ok(MoveOutcome::Unchanged)).status,
        OperationStatus::Unchanged
    );
    assert_eq!(
        OperationResponse::from_move(&Ok(MoveOutcome::Moved(assignment(
            AssignmentStatus::Confirmed
        ))))
        .status,
        OperationStatus::Confirmed
    );
    let awaiting = MoveOutcome::AwaitingApproval {
        assignment_id: uuid::Uuid::new_v4(),
        request_id: uuid::Uuid::new_v4(),
    };
    assert_eq!(
        OperationResponse::from_move(&Ok(awaiting)).status,
        OperationStatus::AwaitingApproval
    );
    let removed = RemoveOutcome {
        assignment_id: uuid::Uuid::new_v4(),
        session_id: "S1".into(),
        cancelled_requests: 0,
    };
    assert_eq!(
        OperationResponse::from_remove(&Ok(removed)).status,
        OperationStatus::Removed
    );
}

#[test]
fn test_response_serializes_snake_case() {
    let response = OperationResponse::from_move(&Ok(MoveOutcome::Unchanged));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "unchanged");
    assert_eq!(json["ok"], true);
    assert!(json.get("approval_warnings").is_none());
}
