pub mod log;
pub mod noop;
pub mod traits;

pub use self::log::LogObserver;
pub use noop::NoopObserver;
pub use traits::Observer;

use crate::bus::{EventBus, Subscription, Topic};
use crate::config::ObservabilityConfig;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Factory: create the right observer from config
pub fn create_observer(config: &ObservabilityConfig) -> Arc<dyn Observer> {
    match config.backend.as_str() {
        "log" => Arc::new(LogObserver::new()),
        "none" | "noop" => Arc::new(NoopObserver),
        _ => {
            tracing::warn!(
                "Unknown observability backend '{}', falling back to noop",
                config.backend
            );
            Arc::new(NoopObserver)
        }
    }
}

/// Feed every event on `bus` to `observer` until the subscription is dropped
/// via [`Subscription::unsubscribe`].
pub fn attach(bus: &Arc<EventBus>, observer: Arc<dyn Observer>) -> Subscription {
    bus.subscribe(Topic::All, move |event| observer.record_event(event))
}

/// Install the global fmt subscriber at `level` (e.g. "info", "debug").
pub fn init_tracing(level: &str) -> Result<()> {
    let level = Level::from_str(level)
        .with_context(|| format!("Invalid log level '{level}'"))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}
