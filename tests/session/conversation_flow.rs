use salience::bus::EventBus;
use salience::config::ReplyDelay;
use salience::contracts::{EventType, MessageEvent, Sender};
use salience::session::DemoSession;

fn session(route: &str) -> DemoSession {
    DemoSession::seeded(EventBus::new(), route, ReplyDelay::none()).unwrap()
}

#[tokio::test]
async fn outline_request_on_pitch_uses_tool() {
    let mut s = session("/pitch");
    let reply = s.send_message("Can you draft the slides?").await.unwrap();

    assert_eq!(reply.tool_calls().len(), 1);
    assert_eq!(reply.tool_calls()[0].tool, "generate_outline");
    let result = reply.tool_calls()[0].result.as_ref().unwrap();
    assert_eq!(result["outline"][0], "Problem & Opportunity");
}

#[tokio::test]
async fn checklist_keyword_without_affordance_falls_back() {
    let mut s = session("/pitch");
    let reply = s.send_message("make a checklist").await.unwrap();

    assert!(reply.tool_calls().is_empty());
    assert!(reply.text.contains("Fundraising narrative drafting"));
    assert!(reply.text.contains("Deliver one concrete user action"));
}

#[tokio::test]
async fn route_change_clears_history_and_changes_behaviour() {
    let mut s = session("/pitch");
    s.send_message("outline please").await.unwrap();
    assert_eq!(s.messages().len(), 2);

    s.change_route("/medicare");
    assert!(s.messages().is_empty());

    let reply = s.run_action("prefill_form").await.unwrap();
    assert_eq!(reply.tool_calls()[0].tool, "prefill_form");
    assert!(
        s.actions()
            .iter()
            .any(|a| a.id == "call-script" && !a.primary)
    );
}

#[tokio::test]
async fn message_events_carry_text_and_sender() {
    let mut s = session("/medicare");
    let reply = s.send_message("hello").await.unwrap();

    let messages: Vec<MessageEvent> = s
        .bus()
        .events()
        .iter()
        .rev()
        .filter(|e| e.kind == EventType::MessageSubmitted)
        .filter_map(|e| e.payload_as())
        .collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "hello");
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[1].text, reply.text);
    assert_eq!(messages[1].sender, Sender::Assistant);
}
