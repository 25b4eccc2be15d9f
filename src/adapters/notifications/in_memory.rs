//! In-memory recording adapters for testing.
//!
//! Both adapters capture what the session hands them so tests can assert
//! on it.
//!
//! # Security Note
//!
//! These adapters are for **testing only**. They use `.expect()` on lock
//! operations which will panic if locks are poisoned.

use std::sync::RwLock;

use crate::domain::foundation::EventEnvelope;
use crate::domain::model::ChartNotification;
use crate::domain::rendering::RendererUpdate;
use crate::ports::{ChartObserver, RenderSink};

/// Observer that records every notification it receives.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned.
///
/// # Example
///
/// ```ignore
/// let observer = Arc::new(InMemoryChartObserver::new());
/// session.subscribe(observer.clone());
///
/// session.undo()?;
/// assert!(observer.has_event("chart.undo_redo_applied.v1"));
/// ```
#[derive(Default)]
pub struct InMemoryChartObserver {
    received: RwLock<Vec<ChartNotification>>,
}

impl InMemoryChartObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all received notifications, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn notifications(&self) -> Vec<ChartNotification> {
        self.received
            .read()
            .expect("InMemoryChartObserver: lock poisoned")
            .clone()
    }

    /// Returns the event types received, oldest first.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.notifications().iter().map(|n| n.event_type()).collect()
    }

    /// Returns the received notifications wrapped in transport envelopes.
    ///
    /// Notifications that fail to serialize are skipped.
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.notifications()
            .iter()
            .filter_map(|n| n.to_envelope().ok())
            .collect()
    }

    /// Checks if a notification of the given type was received.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.notifications()
            .iter()
            .any(|n| n.event_type() == event_type)
    }

    /// Returns count of received notifications.
    pub fn count(&self) -> usize {
        self.received
            .read()
            .expect("InMemoryChartObserver: lock poisoned")
            .len()
    }

    /// Forgets everything received so far.
    pub fn clear(&self) {
        self.received
            .write()
            .expect("InMemoryChartObserver: write lock poisoned")
            .clear();
    }
}

impl ChartObserver for InMemoryChartObserver {
    fn notify(&self, notification: &ChartNotification) {
        self.received
            .write()
            .expect("InMemoryChartObserver: write lock poisoned")
            .push(notification.clone());
    }
}

/// Render sink that keeps every update it is given.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned.
#[derive(Default)]
pub struct InMemoryRenderSink {
    updates: RwLock<Vec<RendererUpdate>>,
}

impl InMemoryRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent update, if any.
    pub fn last_update(&self) -> Option<RendererUpdate> {
        self.updates
            .read()
            .expect("InMemoryRenderSink: lock poisoned")
            .last()
            .cloned()
    }

    /// Number of updates rendered.
    pub fn render_count(&self) -> usize {
        self.updates
            .read()
            .expect("InMemoryRenderSink: lock poisoned")
            .len()
    }
}

impl RenderSink for InMemoryRenderSink {
    fn render(&self, update: &RendererUpdate) {
        self.updates
            .write()
            .expect("InMemoryRenderSink: write lock poisoned")
            .push(update.clone());
    }
}
