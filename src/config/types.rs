use crate::bus::DEFAULT_HISTORY_LIMIT;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// "log" mirrors bus events into tracing; "none" disables that.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_backend() -> String {
    "log".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_route")]
    pub default_route: String,
    #[serde(default = "default_reply_delay_min_ms")]
    pub reply_delay_min_ms: u64,
    #[serde(default = "default_reply_delay_max_ms")]
    pub reply_delay_max_ms: u64,
    #[serde(default = "default_event_history_limit")]
    pub event_history_limit: usize,
    /// Seconds between `tick` events in the REPL; 0 disables them.
    #[serde(default)]
    pub heartbeat_secs: u64,
}

/// Longest accepted heartbeat period (one day).
pub const MAX_HEARTBEAT_SECS: u64 = 86_400;

fn default_route() -> String {
    "/slack/rollout".into()
}

fn default_reply_delay_min_ms() -> u64 {
    1000
}

fn default_reply_delay_max_ms() -> u64 {
    2000
}

fn default_event_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            default_route: default_route(),
            reply_delay_min_ms: default_reply_delay_min_ms(),
            reply_delay_max_ms: default_reply_delay_max_ms(),
            event_history_limit: default_event_history_limit(),
            heartbeat_secs: 0,
        }
    }
}

impl DemoConfig {
    pub fn reply_delay(&self) -> ReplyDelay {
        ReplyDelay::between(
            Duration::from_millis(self.reply_delay_min_ms),
            Duration::from_millis(self.reply_delay_max_ms),
        )
    }

    pub fn heartbeat(&self) -> Option<Duration> {
        (self.heartbeat_secs > 0).then(|| Duration::from_secs(self.heartbeat_secs))
    }
}

/// Artificial thinking time before an assistant reply is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelay {
    pub min: Duration,
    pub max: Duration,
}

impl ReplyDelay {
    pub fn between(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn none() -> Self {
        Self::between(Duration::ZERO, Duration::ZERO)
    }

    /// Uniform sample in `[min, max]`.
    pub fn sample(&self) -> Duration {
        use rand::Rng;

        if self.max <= self.min {
            return self.min;
        }
        let min = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let demo = &self.demo;
        if demo.reply_delay_min_ms > demo.reply_delay_max_ms {
            return Err(ConfigError::Validation(format!(
                "demo.reply_delay_min_ms ({}) exceeds demo.reply_delay_max_ms ({})",
                demo.reply_delay_min_ms, demo.reply_delay_max_ms
            )));
        }
        if demo.event_history_limit == 0 {
            return Err(ConfigError::Validation(
                "demo.event_history_limit must be at least 1".into(),
            ));
        }
        if demo.heartbeat_secs > MAX_HEARTBEAT_SECS {
            return Err(ConfigError::Validation(format!(
                "demo.heartbeat_secs ({}) exceeds {MAX_HEARTBEAT_SECS}",
                demo.heartbeat_secs
            )));
        }
        if !demo.default_route.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "demo.default_route must start with '/': {}",
                demo.default_route
            )));
        }
        Ok(())
    }
}
