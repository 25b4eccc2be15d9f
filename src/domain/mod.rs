//! Domain layer containing the chart model and the engines that drive it.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, events)
//! - `model` - Chart aggregate: objectives, alternatives, users, preferences
//! - `rendering` - Reconciliation of the chart into per-row view data
//! - `history` - Undo/redo of preference and ordering changes
//! - `sorting` - Alternative ordering (drag and automatic sorts)
//! - `maintenance` - Structure updates and preference repair

pub mod foundation;
pub mod history;
pub mod maintenance;
pub mod model;
pub mod rendering;
pub mod sorting;
