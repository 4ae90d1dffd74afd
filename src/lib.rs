//! # Timetable Engine
//!
//! Conflict-checked placement of class sessions on a weekly period grid.
//!
//! A semester timetable is a grid of rows (class groups, classrooms or
//! instructors) by periods laid out day-major. The engine builds that grid
//! from stored assignments, rejects placements that would double-book a
//! group, instructor or classroom or run past the end of a day, and tracks
//! whether a placement is confirmed or still waiting for another department
//! to approve the use of its resources.
//!
//! ## Key Features
//!
//! - **Grid views**: the same assignments rendered per class group,
//!   classroom or instructor
//! - **Conflict detection**: boundary, row identity, group occupancy and
//!   shared-resource rules, with an allowance for merged lectures
//! - **Approval lifecycle**: cross-department placements start pending and
//!   raise one request per borrowed resource
//! - **Optimistic editing**: moves and removals show immediately and roll
//!   back if the store rejects them
//! - **Pluggable collaborators**: catalog, store and approval gateway are
//!   async traits with in-memory adapters
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use timetable_engine::builders::build_in_memory;
//! use timetable_engine::config::{EngineConfig, ScheduleConfig};
//! use timetable_engine::core::{CellRef, OperationContext, Requester, RowKeyKind, Timetable};
//!
//! let scheduler = Arc::new(build_in_memory(EngineConfig::default(), catalog)?);
//! let ctx = OperationContext::new(ScheduleConfig::new(4, 5), "2026-fall", requester);
//! let editor = Timetable::new(scheduler, ctx);
//! editor.refresh().await?;
//! editor.assign(RowKeyKind::ClassGroup, &CellRef::new("G1", 0), &session).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: grid, conflicts, approvals and operations.
pub mod core;
/// Configuration models for the period grid and engine options.
pub mod config;
/// Builders to construct a scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for the catalog, storage and approvals.
pub mod infra;
/// Caller-facing API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
