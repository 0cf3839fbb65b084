use crate::contracts::{BusEvent, EventType};
use crate::utils::text::truncate_with_ellipsis;
use serde_json::Value;

const FEED_TEXT_CHARS: usize = 30;

/// One-line description of an event for activity feeds.
pub fn summarize(event: &BusEvent) -> String {
    let field = |name: &str| event.payload.get(name);

    match event.kind {
        EventType::MessageSubmitted => {
            let sender = field("sender").map(plain).unwrap_or_default();
            let text = field("text").and_then(Value::as_str).unwrap_or_default();
            format!(
                "{sender}: \"{}\"",
                truncate_with_ellipsis(text, FEED_TEXT_CHARS)
            )
        }
        EventType::StateChanged => {
            let key = field("key").map(plain).unwrap_or_default();
            let old = field("oldValue").map_or_else(|| "undefined".to_string(), plain);
            let new = field("newValue").map_or_else(|| "undefined".to_string(), plain);
            format!("{key}: {old} → {new}")
        }
        EventType::ToolResult => {
            let tool = field("tool").map(plain).unwrap_or_default();
            let duration = field("duration").and_then(Value::as_u64).unwrap_or(0);
            format!("{tool} ({duration}ms)")
        }
        EventType::Tick => "System heartbeat".to_string(),
    }
}

/// Strings without quotes, everything else as compact JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: EventType, payload: Value) -> BusEvent {
        BusEvent {
            id: "x".into(),
            timestamp: String::new(),
            kind,
            payload: payload.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn long_messages_are_cut_at_thirty_chars() {
        let e = event(
            EventType::MessageSubmitted,
            json!({ "sender": "user", "text": "Please create a rollout checklist for our feature deployment" }),
        );
        assert_eq!(summarize(&e), "user: \"Please create a rollout checkl...\"");

        let short = event(
            EventType::MessageSubmitted,
            json!({ "sender": "assistant", "text": "Done." }),
        );
        assert_eq!(summarize(&short), "assistant: \"Done.\"");
    }

    #[test]
    fn state_change_shows_transition() {
        let e = event(
            EventType::StateChanged,
            json!({ "key": "featureFlags.evalMode", "oldValue": true, "newValue": false }),
        );
        assert_eq!(summarize(&e), "featureFlags.evalMode: true → false");

        let unset = event(
            EventType::StateChanged,
            json!({ "key": "featureFlags.beta", "newValue": true }),
        );
        assert_eq!(summarize(&unset), "featureFlags.beta: undefined → true");
    }

    #[test]
    fn tool_result_defaults_duration_to_zero() {
        let timed = event(
            EventType::ToolResult,
            json!({ "tool": "create_checklist", "duration": 850 }),
        );
        assert_eq!(summarize(&timed), "create_checklist (850ms)");

        let untimed = event(EventType::ToolResult, json!({ "tool": "prefill_form" }));
        assert_eq!(summarize(&untimed), "prefill_form (0ms)");
    }

    #[test]
    fn tick_is_heartbeat() {
        assert_eq!(
            summarize(&event(EventType::Tick, json!({}))),
            "System heartbeat"
        );
    }
}
