//! Rendering view model - reconciliation of the preference model into rows.
//!
//! # Components
//!
//! - `RendererDataUtility` - Full rebuild and in-place offset refresh
//! - `RowData` / `CellData` / `UserScoreData` - Derived view records
//! - `LabelData` - Objective label tree with summed weights
//! - `RendererConfig` / `RendererUpdate` - What adapters receive
//! - `ScoreTotals` - Per-alternative totals for the summary chart
//!
//! Everything here is pure and deterministic.

mod errors;
mod label_data;
mod renderer_config;
mod renderer_data;
mod row_data;
mod score_totals;

pub use errors::ReconcileError;
pub use label_data::LabelData;
pub use renderer_config::{Dimension, LinearScale, Orientation, RendererConfig, RendererUpdate};
pub use renderer_data::{ReconciledView, RendererDataUtility};
pub use row_data::{CellData, RowData, UserScoreData};
pub use score_totals::{AlternativeTotals, ScoreTotals, UserTotal};
