use crate::contracts::BusEvent;

/// Sink for events flowing over the session bus.
pub trait Observer: Send + Sync {
    /// Record a bus event
    fn record_event(&self, event: &BusEvent);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
