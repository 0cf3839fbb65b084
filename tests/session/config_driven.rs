use salience::Config;
use salience::bus::EventBus;
use salience::session::DemoSession;
use std::time::{Duration, Instant};

#[test]
fn config_file_drives_session_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[demo]\ndefault_route = \"/medicare\"\nreply_delay_min_ms = 0\nreply_delay_max_ms = 0\nevent_history_limit = 2\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let bus = EventBus::with_capacity(config.demo.event_history_limit);
    let s = DemoSession::seeded(bus, &config.demo.default_route, config.demo.reply_delay())
        .unwrap();

    assert_eq!(s.machine().route, "/medicare");
    for _ in 0..3 {
        s.heartbeat();
    }
    assert_eq!(s.bus().events().len(), 2);
}

#[tokio::test]
async fn reply_waits_for_configured_delay() {
    let mut config = Config::default();
    config.apply_overrides_from(|key| (key == "SALIENCE_REPLY_DELAY_MS").then(|| "30".to_string()));

    let mut s = DemoSession::seeded(
        EventBus::new(),
        "/pitch",
        config.demo.reply_delay(),
    )
    .unwrap();

    let started = Instant::now();
    s.send_message("hi").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}
