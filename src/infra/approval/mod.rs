//! Approval gateway backends.

pub mod memory;

pub use memory::{InMemoryApprovalGateway, RequestKind, StoredRequest};
