//! Fixture builders shared by unit tests.

use crate::core::model::{
    Assignment, AssignmentStatus, ClassGroup, ClassSession, Classroom, Course, Instructor, Program,
};

pub fn session(
    id: &str,
    course: &str,
    instructor: &str,
    classroom: &str,
    group: &str,
    period_count: u32,
) -> ClassSession {
    ClassSession {
        id: id.into(),
        course: Course {
            id: course.into(),
            name: format!("Course {course}"),
            code: course.into(),
            color_hint: None,
        },
        instructor: Instructor {
            id: instructor.into(),
            first_name: "Ada".into(),
            last_name: instructor.into(),
            department_id: None,
        },
        classroom: Classroom {
            id: classroom.into(),
            name: format!("Room {classroom}"),
            capacity: 40,
            preferred_department_id: None,
        },
        group: ClassGroup {
            id: group.into(),
            name: format!("Group {group}"),
            student_count: 30,
        },
        period_count,
        program_id: "P1".into(),
    }
}

pub fn assignment(session: &ClassSession, start: u32) -> Assignment {
    Assignment {
        id: uuid::Uuid::new_v4(),
        session: session.clone(),
        class_group_id: session.group.id.clone(),
        start_period_index: start,
        semester_id: "2026-fall".into(),
        status: AssignmentStatus::Confirmed,
    }
}

pub fn program(id: &str, name: &str, department: Option<&str>) -> Program {
    Program {
        id: id.into(),
        name: name.into(),
        department_id: department.map(Into::into),
    }
}
