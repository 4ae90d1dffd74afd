//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use timetable_engine::builders::SchedulerBuilder;
use timetable_engine::config::{EngineConfig, ScheduleConfig};
use timetable_engine::core::{
    ApprovalGateway, Assignment, AssignmentStatus, AssignmentStore, ClassGroup, ClassSession,
    Classroom, Course, Department, Instructor, OperationContext, Program, Requester, Scheduler,
    Timetable,
};
use timetable_engine::infra::{InMemoryApprovalGateway, InMemoryAssignmentStore, InMemoryCatalog};

pub const SEMESTER: &str = "2026-fall";

/// 4 periods a day, 5 days, 50-minute periods from 08:00.
pub fn schedule() -> ScheduleConfig {
    ScheduleConfig::new(4, 5)
}

pub fn requester(id: &str) -> Requester {
    Requester {
        id: id.to_string(),
        role: Some("scheduler".to_string()),
    }
}

pub fn context() -> OperationContext {
    OperationContext::new(schedule(), SEMESTER, requester("u1"))
}

/// Instructor I1 belongs to D1, I2 to D2, anything else to no department.
pub fn instructor(id: &str) -> Instructor {
    let department_id = match id {
        "I1" => Some("D1".to_string()),
        "I2" => Some("D2".to_string()),
        _ => None,
    };
    Instructor {
        id: id.to_string(),
        first_name: "Ada".to_string(),
        last_name: id.to_string(),
        department_id,
    }
}

/// Classroom R2 belongs to D2, anything else to no department.
pub fn classroom(id: &str) -> Classroom {
    Classroom {
        id: id.to_string(),
        name: format!("Room {id}"),
        capacity: 40,
        preferred_department_id: (id == "R2").then(|| "D2".to_string()),
    }
}

pub fn group(id: &str) -> ClassGroup {
    ClassGroup {
        id: id.to_string(),
        name: format!("Group {id}"),
        student_count: 30,
    }
}

/// Session owned by program P1 (department D1).
pub fn session(
    id: &str,
    course: &str,
    instructor_id: &str,
    classroom_id: &str,
    group_id: &str,
    period_count: u32,
) -> ClassSession {
    ClassSession {
        id: id.to_string(),
        course: Course {
            id: course.to_string(),
            name: format!("Course {course}"),
            code: course.to_lowercase(),
            color_hint: None,
        },
        instructor: instructor(instructor_id),
        classroom: classroom(classroom_id),
        group: group(group_id),
        period_count,
        program_id: "P1".to_string(),
    }
}

pub fn seeded(session: &ClassSession, start: u32, status: AssignmentStatus) -> Assignment {
    Assignment {
        id: uuid::Uuid::new_v4(),
        session: session.clone(),
        class_group_id: session.group.id.clone(),
        start_period_index: start,
        semester_id: SEMESTER.to_string(),
        status,
    }
}

pub fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new()
        .with_program(Program {
            id: "P1".into(),
            name: "Computing".into(),
            department_id: Some("D1".into()),
        })
        .with_program(Program {
            id: "P2".into(),
            name: "Physics".into(),
            department_id: Some("D2".into()),
        })
        .with_department(Department {
            id: "D1".into(),
            name: "Computer Science".into(),
        })
        .with_department(Department {
            id: "D2".into(),
            name: "Physics".into(),
        });
    for id in ["G1", "G2", "G3"] {
        catalog = catalog.with_class_group(group(id));
    }
    for id in ["R1", "R2", "R3"] {
        catalog = catalog.with_classroom(classroom(id));
    }
    for id in ["I1", "I2", "I3"] {
        catalog = catalog.with_instructor(instructor(id));
    }
    catalog
}

pub fn scheduler_with<S, A>(store: S, approvals: A) -> Arc<Scheduler<InMemoryCatalog, S, A>>
where
    S: AssignmentStore,
    A: ApprovalGateway,
{
    Arc::new(
        SchedulerBuilder::new(EngineConfig::default())
            .build(catalog(), store, approvals)
            .expect("valid config"),
    )
}

pub type MemoryScheduler =
    Scheduler<InMemoryCatalog, InMemoryAssignmentStore, InMemoryApprovalGateway>;
pub type MemoryEditor = Timetable<InMemoryCatalog, InMemoryAssignmentStore, InMemoryApprovalGateway>;

/// Scheduler over in-memory adapters plus a refreshed editor.
pub async fn memory_editor(seed: Vec<Assignment>) -> (Arc<MemoryScheduler>, MemoryEditor) {
    let scheduler = scheduler_with(
        InMemoryAssignmentStore::with_assignments(seed),
        InMemoryApprovalGateway::new(),
    );
    let editor = Timetable::new(Arc::clone(&scheduler), context());
    editor.refresh().await.expect("refresh");
    (scheduler, editor)
}
