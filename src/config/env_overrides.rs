use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `SALIENCE_*` overrides read through `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("SALIENCE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }

        if let Some(route) = lookup("SALIENCE_ROUTE")
            && !route.is_empty()
        {
            self.demo.default_route = route;
        }

        if let Some(delay) = lookup("SALIENCE_REPLY_DELAY_MS")
            && let Ok(ms) = delay.parse::<u64>()
        {
            self.demo.reply_delay_min_ms = ms;
            self.demo.reply_delay_max_ms = ms;
        }

        if let Some(secs) = lookup("SALIENCE_HEARTBEAT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
        {
            self.demo.heartbeat_secs = secs;
        }
    }
}
