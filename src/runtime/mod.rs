//! Caller-facing API surface.

pub mod api;

pub use api::{OperationKind, OperationResponse, OperationStatus};
