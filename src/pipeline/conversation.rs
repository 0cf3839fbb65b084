//! Conversation stage: picks the assistant's next message from keyword
//! intents, gated by the affordances the observer made available.

use super::tools::{Tool, mock_call};
use crate::bus::EventBus;
use crate::contracts::{ContextPack, EventType, Message, ToolCallRecord, ToolEvent, to_payload};
use crate::error::PromptError;
use crate::prompt::{Reply, ReplyBook};
use regex::Regex;
use indexmap::IndexMap;
use std::sync::{Arc, LazyLock};
use tracing::info;

static CHECKLIST_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)checklist|rollout|safety").unwrap());
static OUTLINE_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)outline|pitch|slides").unwrap());
static FORM_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)form|medicare|prefill").unwrap());

const NO_OBJECTIVE: &str = "Continue the conversation";

/// Reported latencies of the mock tools, in milliseconds.
const CHECKLIST_MS: u64 = 850;
const OUTLINE_MS: u64 = 1200;
const FORM_MS: u64 = 650;

/// Produces assistant turns and reports mock tool runs on the bus.
pub struct Conversation {
    bus: Arc<EventBus>,
    replies: ReplyBook,
}

impl Conversation {
    pub fn new(bus: Arc<EventBus>) -> Result<Self, PromptError> {
        Ok(Self {
            bus,
            replies: ReplyBook::new()?,
        })
    }

    /// Answer `user_text` under `ctx`.
    ///
    /// Branches are tried in order (checklist, outline, form); the first one
    /// whose keyword matches and whose affordance is present runs its mock
    /// tool, emits `tool_result`, and returns the matching narrative reply.
    /// Otherwise the generic reply echoes the hypothesis and first objective.
    pub fn turn(&self, user_text: &str, ctx: &ContextPack) -> Result<Message, PromptError> {
        let derived = &ctx.derived;

        let planned = if derived.has_affordance("create_checklist")
            && CHECKLIST_INTENT.is_match(user_text)
        {
            Some((checklist_call(&derived.task_hypothesis), CHECKLIST_MS, Reply::Checklist))
        } else if derived.has_affordance("generate_outline") && OUTLINE_INTENT.is_match(user_text)
        {
            Some((outline_call(), OUTLINE_MS, Reply::Outline))
        } else if derived.has_affordance("prefill_form") && FORM_INTENT.is_match(user_text) {
            Some((form_call(), FORM_MS, Reply::Form))
        } else {
            None
        };

        let Some((tool, duration, reply)) = planned else {
            let next_action = ctx
                .objectives
                .first()
                .map_or(NO_OBJECTIVE, String::as_str);
            let text = self.replies.fallback(&derived.task_hypothesis, next_action)?;
            return Ok(Message::assistant(text, Vec::new()));
        };

        let args = tool.args();
        let result = mock_call(&tool);
        let _ = self.bus.emit(
            EventType::ToolResult,
            to_payload(&ToolEvent {
                tool: tool.name().to_string(),
                args: Some(args.clone()),
                result: result.clone(),
                duration: Some(duration),
            }),
        );
        info!(tool = tool.name(), duration_ms = duration, "ce.tool_call");

        let record = ToolCallRecord {
            tool: tool.name().to_string(),
            args: Some(args),
            result: Some(result),
        };
        Ok(Message::assistant(
            self.replies.tool_reply(reply)?,
            vec![record],
        ))
    }
}

fn checklist_call(task_hypothesis: &str) -> Tool {
    Tool::CreateChecklist {
        context: task_hypothesis.to_string(),
        items: ["Canary 5%", "Rollback plan", "Comms template", "Metrics monitoring"]
            .map(String::from)
            .to_vec(),
    }
}

fn outline_call() -> Tool {
    Tool::GenerateOutline {
        topic: "Company Pitch".to_string(),
        audience: "Angel investors".to_string(),
    }
}

fn form_call() -> Tool {
    Tool::PrefillForm {
        form_id: "medicare-B".to_string(),
        fields: IndexMap::from([
            ("name".to_string(), "Sample User".to_string()),
            ("dob".to_string(), "1950-01-01".to_string()),
            ("medicareNumber".to_string(), "XXXX-XXXX-XXXX".to_string()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{Sender, ToolEvent};
    use crate::pipeline::{conductor, observer};
    use crate::seed;

    fn pack_for(ms: &crate::contracts::MachineState) -> ContextPack {
        let ps = seed::persistent();
        let derived = observer::run(ms, &ps);
        conductor::build_context_pack(ms, &ps, &derived)
    }

    fn conversation() -> (Arc<EventBus>, Conversation) {
        let bus = EventBus::new();
        let ce = Conversation::new(Arc::clone(&bus)).unwrap();
        (bus, ce)
    }

    #[test]
    fn checklist_request_runs_tool_and_reports_it() {
        let (bus, ce) = conversation();
        let ctx = pack_for(&seed::machine_slack());

        let msg = ce.turn("Please create a rollout checklist", &ctx).unwrap();

        assert_eq!(msg.sender, Sender::Assistant);
        assert_eq!(msg.tool_calls().len(), 1);
        let call = &msg.tool_calls()[0];
        assert_eq!(call.tool, "create_checklist");
        assert_eq!(
            call.args.as_ref().unwrap()["context"],
            "Feature rollout planning in Slack context"
        );
        assert!(msg.text.starts_with("I've created a rollout checklist"));

        let events = bus.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventType::ToolResult);
        let reported: ToolEvent = events[0].payload_as().unwrap();
        assert_eq!(reported.tool, "create_checklist");
        assert_eq!(reported.duration, Some(850));
        assert_eq!(reported.result["checklist"][0], "Set canary rollout to 5%");
    }

    #[test]
    fn missing_affordance_falls_back() {
        let (bus, ce) = conversation();
        let mut ctx = pack_for(&seed::machine_slack());
        ctx.derived.affordances.retain(|a| a != "create_checklist");

        let msg = ce.turn("Please create a rollout checklist", &ctx).unwrap();

        assert!(msg.tool_calls.is_none());
        assert!(msg.text.starts_with(
            "Based on your current context (Feature rollout planning in Slack context)"
        ));
        assert!(msg.text.contains("Deliver one concrete user action"));
        assert!(bus.events().is_empty());
    }

    #[test]
    fn intent_matching_ignores_case() {
        let (_bus, ce) = conversation();
        let ctx = pack_for(&seed::machine_pitch());

        let msg = ce.turn("Draft my PITCH deck", &ctx).unwrap();
        assert_eq!(msg.tool_calls()[0].tool, "generate_outline");
        assert!(msg.text.contains("6-slide pitch outline"));
    }

    #[test]
    fn checklist_branch_wins_over_form_on_medicare() {
        let (_bus, ce) = conversation();
        let ctx = pack_for(&seed::machine_medicare());

        let msg = ce.turn("Safety steps for the medicare form", &ctx).unwrap();
        assert_eq!(msg.tool_calls()[0].tool, "create_checklist");

        let msg = ce.turn("Help me pre-fill the Medicare Part B form", &ctx).unwrap();
        let call = &msg.tool_calls()[0];
        assert_eq!(call.tool, "prefill_form");
        assert_eq!(call.result.as_ref().unwrap()["form_url"], "/forms/medicare-B");
    }

    #[test]
    fn prefill_reports_fields_in_the_order_they_were_given() {
        let (_bus, ce) = conversation();
        let ctx = pack_for(&seed::machine_medicare());

        let msg = ce.turn("prefill my form", &ctx).unwrap();
        let call = &msg.tool_calls()[0];
        assert_eq!(
            call.result.as_ref().unwrap()["fields_filled"],
            serde_json::json!(["name", "dob", "medicareNumber"])
        );
    }

    #[test]
    fn unmatched_text_uses_first_objective() {
        let (_bus, ce) = conversation();
        let mut ctx = pack_for(&seed::machine_pitch());

        let msg = ce.turn("hello there", &ctx).unwrap();
        assert!(msg.text.contains("here's what I recommend: Deliver one concrete user action."));

        ctx.objectives.clear();
        let msg = ce.turn("hello there", &ctx).unwrap();
        assert!(msg.text.contains("here's what I recommend: Continue the conversation."));
    }
}
