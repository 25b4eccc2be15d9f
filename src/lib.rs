//! ValueCharts - Interactive multi-criteria preference engine
//!
//! This crate keeps a value chart (objectives, alternatives and per-user
//! weights and score functions) in sync with the stacked-bar view drawn
//! from it. It reconciles the model into row/cell/bar records, undoes and
//! redoes preference changes, and reorders alternatives by drag or sort.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
