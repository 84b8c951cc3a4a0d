use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Probe timing and the marker values it writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// How long the delayed write waits, in milliseconds.
    pub delay_ms: u64,
    /// Written synchronously before the background task starts.
    pub first_marker: String,
    /// Written by the delayed task (and by single-delay mode).
    pub delayed_marker: String,
    /// Written after the background task has completed.
    pub last_marker: String,
}

impl ProbeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Same markers, different delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            delay_ms: 10_000,
            first_marker: "I".into(),
            delayed_marker: "love".into(),
            last_marker: "you".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ProbeConfig::default();
        assert_eq!(c.delay(), Duration::from_secs(10));
        assert_eq!(c.first_marker, "I");
        assert_eq!(c.delayed_marker, "love");
        assert_eq!(c.last_marker, "you");
    }

    #[test]
    fn with_delay_keeps_markers() {
        let c = ProbeConfig::default().with_delay(Duration::from_secs(50));
        assert_eq!(c.delay_ms, 50_000);
        assert_eq!(c.delayed_marker, "love");
    }
}
