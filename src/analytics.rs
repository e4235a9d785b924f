//! Server-side analytics events.
//!
//! Events are a side channel: building or emitting one never changes a
//! response. Payloads are written to the `analytics` tracing target when
//! enabled, so any subscriber (log drain, collector) can forward them.

use chrono::Utc;
use serde_json::{Map, Value};

/// Path events are reported under by the hosting platform.
pub const EVENT_ENDPOINT: &str = "/_vercel/insights/event";

/// Summary of one orchestrated profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub username: String,
    pub found: bool,
    pub html_fetch_success: bool,
    pub api_fetch_success: bool,
    pub duration_ms: u64,
}

/// Notified once per profile fetch, after the merge. Must not block.
pub trait FetchObserver: Send + Sync {
    fn on_fetch_complete(&self, report: &FetchReport);
}

#[derive(Debug, Clone)]
pub struct Analytics {
    enabled: bool,
}

impl Analytics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Builds an event payload and emits it when analytics is enabled.
    ///
    /// Only string, number and boolean values from `data` are kept.
    pub fn track_event(
        &self,
        event_name: &str,
        data: Option<&Map<String, Value>>,
        url: &str,
        referrer: Option<&str>,
        timezone: Option<&str>,
    ) -> Value {
        let mut payload = Map::new();
        payload.insert("name".to_string(), Value::from(event_name));
        payload.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()),
        );
        payload.insert("url".to_string(), Value::from(url));

        if let Some(data) = data {
            for (key, value) in data {
                if matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
                    payload.insert(key.clone(), value.clone());
                }
            }
        }

        if let Some(referrer) = referrer.filter(|r| !r.is_empty()) {
            payload.insert("referrer".to_string(), Value::from(referrer));
        }
        if let Some(timezone) = timezone {
            payload.insert("timezone".to_string(), Value::from(timezone));
        }

        let payload = Value::Object(payload);
        if self.enabled {
            tracing::info!(target: "analytics", endpoint = EVENT_ENDPOINT, "{}", payload);
        }
        payload
    }
}

impl FetchObserver for Analytics {
    fn on_fetch_complete(&self, report: &FetchReport) {
        let mut data = Map::new();
        data.insert("username".to_string(), Value::from(report.username.as_str()));
        data.insert(
            "status".to_string(),
            Value::from(if report.found { "success" } else { "not_found" }),
        );
        data.insert(
            "html_fetch_success".to_string(),
            Value::from(report.html_fetch_success),
        );
        data.insert(
            "api_fetch_success".to_string(),
            Value::from(report.api_fetch_success),
        );
        data.insert("duration_ms".to_string(), Value::from(report.duration_ms));

        let url = format!("/gfg/{}", report.username);
        self.track_event("profile_fetch", Some(&data), &url, None, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_event_filters_non_scalar_values() {
        let analytics = Analytics::new(false);
        let data = json!({
            "method": "GET",
            "status": 200,
            "cached": false,
            "nested": {"a": 1},
            "list": [1, 2],
            "missing": null
        });
        let payload = analytics.track_event(
            "api_request",
            data.as_object(),
            "/gfg/alice",
            None,
            None,
        );

        assert_eq!(payload["name"], "api_request");
        assert_eq!(payload["url"], "/gfg/alice");
        assert_eq!(payload["method"], "GET");
        assert_eq!(payload["status"], 200);
        assert_eq!(payload["cached"], false);
        assert!(payload.get("nested").is_none());
        assert!(payload.get("list").is_none());
        assert!(payload.get("missing").is_none());
        assert!(payload.get("referrer").is_none());
        assert!(payload["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_track_event_optional_fields() {
        let analytics = Analytics::new(true);
        let payload = analytics.track_event("x", None, "/", Some("https://ref"), Some("UTC"));
        assert_eq!(payload["referrer"], "https://ref");
        assert_eq!(payload["timezone"], "UTC");

        let payload = analytics.track_event("x", None, "/", Some(""), None);
        assert!(payload.get("referrer").is_none());
    }

    #[test]
    fn test_observer_does_not_panic_when_disabled() {
        let analytics = Analytics::new(false);
        analytics.on_fetch_complete(&FetchReport {
            username: "alice".to_string(),
            found: true,
            html_fetch_success: true,
            api_fetch_success: false,
            duration_ms: 12,
        });
        assert!(!analytics.is_enabled());
    }
}
