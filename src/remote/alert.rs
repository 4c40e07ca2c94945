//! Human alerts for failed scans
//!
//! The scan loop reports problems it cannot resolve on its own (an unknown
//! product, a rejected list update) through an [`AlertSink`]. Sinks are
//! fire-and-forget: a failing sink logs and carries on.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};

/// Destination for alerts
pub trait AlertSink {
    fn notify(&self, title: &str, body: &str);
}

/// Writes alerts to the log only
#[derive(Debug, Default)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn notify(&self, title: &str, body: &str) {
        warn!(title, body, "Alert");
    }
}

/// Sends alerts as Pushbullet notes
pub struct PushbulletAlerts {
    http: Client,
    pushes_url: String,
    access_key: String,
    channel_tag: Option<String>,
}

impl PushbulletAlerts {
    pub const PUSHES_URL: &'static str = "https://api.pushbullet.com/v2/pushes";

    pub fn new(access_key: impl Into<String>, channel_tag: Option<String>) -> Self {
        Self::with_url(Self::PUSHES_URL, access_key, channel_tag)
    }

    /// Builds a sink posting to a custom endpoint
    pub fn with_url(
        pushes_url: impl Into<String>,
        access_key: impl Into<String>,
        channel_tag: Option<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            pushes_url: pushes_url.into(),
            access_key: access_key.into(),
            channel_tag,
        }
    }

    fn note(&self, title: &str, body: &str) -> serde_json::Value {
        let mut note = serde_json::json!({
            "type": "note",
            "title": title,
            "body": body,
        });
        if let Some(tag) = &self.channel_tag {
            note["channel_tag"] = serde_json::json!(tag);
        }
        note
    }
}

impl AlertSink for PushbulletAlerts {
    fn notify(&self, title: &str, body: &str) {
        let result = self
            .http
            .post(&self.pushes_url)
            .header("Access-Token", &self.access_key)
            .json(&self.note(title, body))
            .send();

        match result {
            Ok(response) if response.status().is_success() => {
                info!(title, "Alert pushed");
            }
            Ok(response) => {
                warn!(title, status = response.status().as_u16(), "Alert push rejected");
            }
            Err(e) => {
                warn!(title, error = %e, "Alert push failed");
            }
        }
    }
}
