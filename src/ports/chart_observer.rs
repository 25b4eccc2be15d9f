//! ChartObserver port - Interface for hearing about chart changes.
//!
//! The session calls observers synchronously, in registration order, after
//! every committed change and every undo/redo.

use crate::domain::model::ChartNotification;

/// Port for receiving chart notifications.
///
/// Implementations must not call back into the session that notifies them.
pub trait ChartObserver: Send + Sync {
    /// Called once per committed change.
    fn notify(&self, notification: &ChartNotification);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ChartObserver) {}
}
