use std::sync::{Arc, RwLock};

use tracing::debug;

use super::describe::{describe, ErrorReport};
use super::event::{AppInfo, TelemetryEvent};
use super::sink::TelemetrySink;
use crate::kernel::capabilities::Capabilities;

/// Stamps events with app identity and forwards them to the sink.
///
/// Clones share the sink and app identity. Without the analytics
/// capability, or without a sink, every call is a no-op.
#[derive(Clone)]
pub struct TelemetryReporter {
    sink: Option<Arc<dyn TelemetrySink>>,
    app: Arc<RwLock<AppInfo>>,
}

impl std::fmt::Debug for TelemetryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryReporter")
            .field("enabled", &self.is_enabled())
            .field("app", &self.app())
            .finish()
    }
}

impl TelemetryReporter {
    pub fn new(sink: Option<Arc<dyn TelemetrySink>>, capabilities: &Capabilities) -> Self {
        Self {
            sink: sink.filter(|_| capabilities.analytics),
            app: Arc::new(RwLock::new(AppInfo::default())),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, &Capabilities::none())
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn app(&self) -> AppInfo {
        self.app.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_app(&self, app: AppInfo) {
        *self.app.write().unwrap_or_else(|e| e.into_inner()) = app;
    }

    pub fn report(&self, event: TelemetryEvent) {
        match &self.sink {
            Some(sink) => sink.send(event),
            None => debug!("Telemetry disabled, dropping {:?}", event),
        }
    }

    pub fn exception(&self, err: &ErrorReport, fatal: bool) {
        if !self.is_enabled() {
            return;
        }
        let app = self.app();
        self.report(TelemetryEvent::Exception {
            description: describe(err),
            fatal,
            app_name: app.name,
            app_version: app.version,
        });
    }

    pub fn screen(&self, name: &str) {
        if !self.is_enabled() {
            return;
        }
        let app = self.app();
        self.report(TelemetryEvent::Screenview {
            name: name.to_string(),
            app_name: app.name,
            app_version: app.version,
        });
    }

    pub fn event(&self, category: &str, action: &str, label: &str, value: i64) {
        if !self.is_enabled() {
            return;
        }
        let app = self.app();
        self.report(TelemetryEvent::ActionEvent {
            category: category.to_string(),
            action: action.to_string(),
            label: label.to_string(),
            value,
            app_name: app.name,
            app_version: app.version,
        });
    }

    /// Reports panics as fatal exceptions, then runs the previous hook so
    /// the panic continues as it would have.
    pub fn install_panic_hook(&self) {
        let reporter = self.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            reporter.exception(&ErrorReport::from_panic(info), true);
            previous(info);
        }));
    }
}
