use super::traits::Observer;
use crate::bus::summarize;
use crate::contracts::{BusEvent, EventType, MessageEvent, StateChangeEvent, ToolEvent};
use tracing::{debug, info};

/// Mirrors bus events into tracing.
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &BusEvent) {
        let summary = summarize(event);
        match event.kind {
            EventType::MessageSubmitted => {
                let sender = event
                    .payload_as::<MessageEvent>()
                    .map(|m| m.sender.to_string())
                    .unwrap_or_default();
                info!(id = %event.id, sender = %sender, summary = %summary, "bus.message");
            }
            EventType::StateChanged => {
                let key = event
                    .payload_as::<StateChangeEvent>()
                    .map(|s| s.key)
                    .unwrap_or_default();
                info!(id = %event.id, key = %key, summary = %summary, "bus.state_changed");
            }
            EventType::ToolResult => {
                let (tool, duration_ms) = event
                    .payload_as::<ToolEvent>()
                    .map(|t| (t.tool, t.duration))
                    .unwrap_or_default();
                info!(id = %event.id, tool = %tool, duration_ms = ?duration_ms, "bus.tool_result");
            }
            EventType::Tick => {
                debug!(id = %event.id, "bus.tick");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
