use super::traits::Observer;
use crate::contracts::BusEvent;

/// Zero-overhead observer
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline(always)]
    fn record_event(&self, _event: &BusEvent) {}

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_name() {
        assert_eq!(NoopObserver.name(), "noop");
    }
}
