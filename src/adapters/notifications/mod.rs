//! Notification adapters - observers and render sinks.

mod in_memory;
mod tracing_observer;

pub use in_memory::{InMemoryChartObserver, InMemoryRenderSink};
pub use tracing_observer::TracingObserver;
