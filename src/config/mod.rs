mod env_overrides;
mod loader;
mod types;

pub use types::{Config, DemoConfig, MAX_HEARTBEAT_SECS, ObservabilityConfig, ReplyDelay};
