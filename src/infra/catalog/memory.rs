//! In-memory catalog preloaded by the caller.

use async_trait::async_trait;

use crate::core::{
    ClassGroup, Classroom, Department, EngineError, Instructor, Program, ResourceCatalog,
};

/// Catalog holding pre-fetched entity lists.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    programs: Vec<Program>,
    class_groups: Vec<ClassGroup>,
    classrooms: Vec<Classroom>,
    instructors: Vec<Instructor>,
    departments: Vec<Department>,
}

impl InMemoryCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program.
    #[must_use]
    pub fn with_program(mut self, program: Program) -> Self {
        self.programs.push(program);
        self
    }

    /// Add a class group.
    #[must_use]
    pub fn with_class_group(mut self, group: ClassGroup) -> Self {
        self.class_groups.push(group);
        self
    }

    /// Add a classroom.
    #[must_use]
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    /// Add an instructor.
    #[must_use]
    pub fn with_instructor(mut self, instructor: Instructor) -> Self {
        self.instructors.push(instructor);
        self
    }

    /// Add a department.
    #[must_use]
    pub fn with_department(mut self, department: Department) -> Self {
        self.departments.push(department);
        self
    }
}

#[async_trait]
impl ResourceCatalog for InMemoryCatalog {
    async fn get_programs(&self) -> Result<Vec<Program>, EngineError> {
        Ok(self.programs.clone())
    }

    async fn class_groups(&self) -> Result<Vec<ClassGroup>, EngineError> {
        Ok(self.class_groups.clone())
    }

    async fn classrooms(&self) -> Result<Vec<Classroom>, EngineError> {
        Ok(self.classrooms.clone())
    }

    async fn instructors(&self) -> Result<Vec<Instructor>, EngineError> {
        Ok(self.instructors.clone())
    }

    async fn departments(&self) -> Result<Vec<Department>, EngineError> {
        Ok(self.departments.clone())
    }
}
