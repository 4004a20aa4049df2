use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const SERVER_URL_ENV: &str = "TEACHER_PORTAL_URL";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub server_url: String,
    pub last_username: String,
    pub dark_mode: bool,
    pub toast_seconds: u64,
    pub request_timeout_secs: u64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_username: String::new(),
            dark_mode: true,
            toast_seconds: 5,
            request_timeout_secs: 30,
        }
    }
}

impl PortalSettings {
    /// Applies `TEACHER_PORTAL_URL` when it is set to something non-blank.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.server_url = url;
        }
        self
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
