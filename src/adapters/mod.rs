//! Adapters - Implementations of port interfaces.
//!
//! - `notifications` - Chart observers (tracing, in-memory recording) and
//!   an in-memory render sink

pub mod notifications;

pub use notifications::{InMemoryChartObserver, InMemoryRenderSink, TracingObserver};
