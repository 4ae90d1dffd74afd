//! Catalog backends.

pub mod memory;

pub use memory::InMemoryCatalog;
