//! Assignment store backends.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAssignmentStore;
pub use postgres::PostgresAssignmentStore;
