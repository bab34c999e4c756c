use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::TelemetryEvent;

/// External analytics sink. Owns events once handed over; delivery
/// failures stay inside the sink.
pub trait TelemetrySink: Send + Sync {
    fn send(&self, event: TelemetryEvent);
}

/// Forwards events to a channel consumer, dropping them when the channel
/// is full or closed.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<TelemetryEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<TelemetryEvent>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TelemetryEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl TelemetrySink for ChannelSink {
    fn send(&self, event: TelemetryEvent) {
        if let Err(e) = self.tx.try_send(event) {
            debug!("Telemetry event dropped: {}", e);
        }
    }
}

/// Writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn send(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::Exception { description, fatal: true, .. } => {
                warn!("[TELEMETRY] fatal exception: {}", description)
            }
            TelemetryEvent::Exception { description, .. } => {
                info!("[TELEMETRY] exception: {}", description)
            }
            TelemetryEvent::Screenview { name, .. } => info!("[TELEMETRY] screen: {}", name),
            TelemetryEvent::ActionEvent { category, action, label, value, .. } => {
                info!("[TELEMETRY] event: {}/{}/{} = {}", category, action, label, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(name: &str) -> TelemetryEvent {
        TelemetryEvent::Screenview {
            name: name.into(),
            app_name: "Browser".into(),
            app_version: "0.0.0".into(),
        }
    }

    #[tokio::test]
    async fn channel_sink_drops_when_full() {
        let (sink, mut rx) = ChannelSink::channel(1);
        sink.send(screen("Welcome"));
        sink.send(screen("Spinner"));

        assert_eq!(rx.recv().await, Some(screen("Welcome")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::channel(4);
        drop(rx);
        sink.send(screen("Welcome"));
    }
}
