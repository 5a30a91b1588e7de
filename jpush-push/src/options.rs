//! Delivery options.

use serde::Serialize;

use crate::notification::non_empty;

/// Longest offline retention accepted by the service, in seconds (10 days).
pub const MAX_TIME_TO_LIVE: i64 = 86_400 * 10;

/// Longest rate-limited ("big push") delivery window, in minutes.
pub const MAX_BIG_PUSH_DURATION: i64 = 1_400;

/// Delivery options of a push.
///
/// Values handed to [`Options::sanitize`] that fall outside the accepted
/// ranges are dropped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    /// Caller-chosen sequence number echoed back by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sendno: Option<i64>,
    /// Offline retention in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<i64>,
    /// ID of a previous message to override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_msg_id: Option<String>,
    /// Target the APNs production environment.
    pub apns_production: bool,
    /// Rate-limited delivery window in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_push_duration: Option<i64>,
}

impl Options {
    /// Create options with only `apns_production` set.
    pub fn new() -> Self {
        Self {
            sendno: None,
            time_to_live: None,
            override_msg_id: None,
            apns_production: true,
            big_push_duration: None,
        }
    }

    /// Set the sequence number.
    pub fn sendno(mut self, sendno: i64) -> Self {
        self.sendno = Some(sendno);
        self
    }

    /// Set the offline retention.
    pub fn time_to_live(mut self, seconds: i64) -> Self {
        self.time_to_live = Some(seconds);
        self
    }

    /// Set the message to override.
    pub fn override_msg_id(mut self, msg_id: impl Into<String>) -> Self {
        self.override_msg_id = Some(msg_id.into());
        self
    }

    /// Select the APNs environment.
    pub fn apns_production(mut self, production: bool) -> Self {
        self.apns_production = production;
        self
    }

    /// Set the rate-limited delivery window.
    pub fn big_push_duration(mut self, minutes: i64) -> Self {
        self.big_push_duration = Some(minutes);
        self
    }

    /// Drop zero, empty and out-of-range values.
    pub fn sanitize(self) -> Self {
        Self {
            sendno: self.sendno.filter(|n| *n != 0),
            time_to_live: self
                .time_to_live
                .filter(|ttl| *ttl > 0 && *ttl <= MAX_TIME_TO_LIVE),
            override_msg_id: self.override_msg_id.and_then(non_empty),
            apns_production: self.apns_production,
            big_push_duration: self
                .big_push_duration
                .filter(|d| *d > 0 && *d <= MAX_BIG_PUSH_DURATION),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_to_live_range() {
        assert_eq!(Options::new().time_to_live(864_000).sanitize().time_to_live, Some(864_000));
        assert_eq!(Options::new().time_to_live(864_001).sanitize().time_to_live, None);
        assert_eq!(Options::new().time_to_live(0).sanitize().time_to_live, None);
        assert_eq!(Options::new().time_to_live(-5).sanitize().time_to_live, None);
    }

    #[test]
    fn test_big_push_duration_range() {
        assert_eq!(Options::new().big_push_duration(1).sanitize().big_push_duration, Some(1));
        assert_eq!(Options::new().big_push_duration(1_400).sanitize().big_push_duration, Some(1_400));
        assert_eq!(Options::new().big_push_duration(1_401).sanitize().big_push_duration, None);
    }

    #[test]
    fn test_apns_production_always_written() {
        let value = serde_json::to_value(Options::new().sanitize()).unwrap();
        assert_eq!(value, json!({"apns_production": true}));

        let value = serde_json::to_value(
            Options::new()
                .sendno(0)
                .override_msg_id("")
                .apns_production(false)
                .sanitize(),
        )
        .unwrap();
        assert_eq!(value, json!({"apns_production": false}));
    }
}
