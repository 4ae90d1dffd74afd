//! Infrastructure adapters for the catalog, assignment storage and approval
//! workflow.

pub mod approval;
pub mod catalog;
pub mod store;

pub use approval::InMemoryApprovalGateway;
pub use catalog::InMemoryCatalog;
pub use store::{InMemoryAssignmentStore, PostgresAssignmentStore};
