//! Builders that assemble a scheduler from configuration and adapters.

pub mod scheduler_builder;

pub use scheduler_builder::{build_in_memory, InMemoryScheduler, SchedulerBuilder};
