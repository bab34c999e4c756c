use serde::{Deserialize, Serialize};

/// App identity stamped onto every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "Browser".to_string(),
            version: "0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hitType", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TelemetryEvent {
    Exception {
        description: String,
        fatal: bool,
        app_name: String,
        app_version: String,
    },

    Screenview {
        name: String,
        app_name: String,
        app_version: String,
    },

    #[serde(rename = "event")]
    ActionEvent {
        category: String,
        action: String,
        label: String,
        value: i64,
        app_name: String,
        app_version: String,
    },
}

impl TelemetryEvent {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TelemetryEvent::Exception { fatal: true, .. })
    }
}
