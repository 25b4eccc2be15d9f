//! Maintenance - keeping a chart consistent when its structure is edited.
//!
//! `StructureDiff` swaps in a new structure and reports what changed;
//! `PreferenceRepair` then realigns alternatives and every user's
//! preferences with the new objectives.

mod preference_repair;
mod structure_diff;

pub use preference_repair::PreferenceRepair;
pub use structure_diff::StructureDiff;
