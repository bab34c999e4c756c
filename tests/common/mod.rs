#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use model_host::kernel::error::ConsumerError;
use model_host::kernel::loader::{ResponseMode, Transport, TransportError, TransportResponse};
use model_host::kernel::shortcut::Shortcut;
use model_host::kernel::telemetry::recorder::TelemetryRecorder;
use model_host::kernel::telemetry::{TelemetryReporter, TelemetrySink};
use model_host::kernel::capabilities::Capabilities;
use model_host::{Screen, View};

#[derive(Clone)]
struct Route {
    response: Result<TransportResponse, TransportError>,
    delay: Duration,
}

/// Canned responses keyed by URL. Unknown URLs fail at the transport level.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, Route>,
    pub requests: Mutex<Vec<(String, ResponseMode)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, url: &str, body: &[u8]) -> Self {
        self.status(url, 200, body)
    }

    pub fn status(self, url: &str, status: u16, body: &[u8]) -> Self {
        self.route(url, Ok(TransportResponse { status, body: body.to_vec() }), Duration::ZERO)
    }

    pub fn delayed(self, url: &str, body: &[u8], delay: Duration) -> Self {
        self.route(url, Ok(TransportResponse { status: 200, body: body.to_vec() }), delay)
    }

    fn route(mut self, url: &str, response: Result<TransportResponse, TransportError>, delay: Duration) -> Self {
        self.routes.insert(url.to_string(), Route { response, delay });
        self
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, mode: ResponseMode) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push((url.to_string(), mode));
        let route = self.routes.get(url).cloned();
        match route {
            Some(route) => {
                if !route.delay.is_zero() {
                    tokio::time::sleep(route.delay).await;
                }
                route.response
            }
            None => Err(TransportError {
                status: None,
                message: format!("connection refused: {}", url),
            }),
        }
    }
}

pub fn recording_reporter() -> (TelemetryReporter, Arc<TelemetryRecorder>) {
    let recorder = Arc::new(TelemetryRecorder::new());
    let sink: Arc<dyn TelemetrySink> = recorder.clone();
    (TelemetryReporter::new(Some(sink), &Capabilities::default()), recorder)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Show(Option<Screen>),
    Open(String, usize),
    Alert(String),
    Title(String),
    Shortcut(Shortcut),
}

/// Records every call. `open_buffer` fails for buffers starting with `0xFF`.
#[derive(Default)]
pub struct RecordingView {
    pub calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Alert(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl View for RecordingView {
    type Model = Vec<u8>;

    fn show(&self, screen: Option<Screen>) {
        self.push(ViewCall::Show(screen));
    }

    async fn open_buffer(&self, bytes: Vec<u8>, name: &str) -> Result<Option<Vec<u8>>, ConsumerError> {
        self.push(ViewCall::Open(name.to_string(), bytes.len()));
        if bytes.first() == Some(&0xFF) {
            return Err(ConsumerError::new("ModelError", "Unsupported file content."));
        }
        Ok(Some(bytes))
    }

    fn alert(&self, text: &str) {
        self.push(ViewCall::Alert(text.to_string()));
    }

    fn confirm(&self, _text: &str) -> bool {
        true
    }

    fn set_title(&self, title: &str) {
        self.push(ViewCall::Title(title.to_string()));
    }

    fn shortcut(&self, action: Shortcut) {
        self.push(ViewCall::Shortcut(action));
    }
}
