use serde::{Deserialize, Serialize};

/// Platform capabilities, resolved once at startup and passed to the
/// components that branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// A native text decoder exists; the manual state machine is skipped.
    pub native_text_decoder: bool,
    /// An analytics sink is initialized. When false telemetry is a no-op.
    pub analytics: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            native_text_decoder: false,
            analytics: true,
        }
    }
}

impl Capabilities {
    pub fn none() -> Self {
        Self {
            native_text_decoder: false,
            analytics: false,
        }
    }
}
