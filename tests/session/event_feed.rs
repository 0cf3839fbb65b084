use salience::bus::{EventBus, Topic, summarize};
use salience::config::ReplyDelay;
use salience::contracts::EventType;
use salience::session::DemoSession;
use std::sync::{Arc, Mutex};

#[test]
fn feed_lines_for_a_session() {
    let bus = EventBus::new();
    let mut s = DemoSession::seeded(Arc::clone(&bus), "/pitch", ReplyDelay::none()).unwrap();

    s.change_route("/slack");
    s.toggle_feature_flag("evalMode", false);
    s.heartbeat();

    let lines: Vec<String> = bus.events().iter().map(summarize).collect();
    assert_eq!(
        lines,
        [
            "System heartbeat",
            "featureFlags.evalMode: true → false",
            "route: /pitch → /slack",
        ]
    );
}

#[test]
fn wildcard_subscriber_sees_session_events() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = bus.subscribe(Topic::All, move |event| {
        sink.lock().unwrap().push(event.kind);
    });

    let mut s = DemoSession::seeded(Arc::clone(&bus), "/pitch", ReplyDelay::none()).unwrap();
    s.toggle_feature_flag("darkMode", true);
    s.heartbeat();
    assert!(subscription.unsubscribe());
    s.heartbeat();

    assert_eq!(
        *seen.lock().unwrap(),
        [EventType::StateChanged, EventType::Tick]
    );
}

#[test]
fn watchers_receive_events_after_subscribing() {
    let bus = EventBus::new();
    let mut rx = bus.watch();
    let s = DemoSession::seeded(Arc::clone(&bus), "/pitch", ReplyDelay::none()).unwrap();
    let tick = s.heartbeat();

    let received = tokio_test::block_on(rx.recv()).unwrap();
    assert_eq!(received, tick);
}
