//! Configuration models for the period grid and engine options.

pub mod engine;
pub mod schedule;

pub use engine::EngineConfig;
pub use schedule::ScheduleConfig;
