use std::collections::VecDeque;
use std::sync::Mutex;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};
use super::sink::TelemetrySink;

const MAX_EVENTS: usize = 10_000;

/// Bounded in-memory sink. Oldest events are dropped first.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: Mutex<VecDeque<TelemetryEvent>>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(MAX_EVENTS)),
        }
    }

    pub fn record(&self, event: TelemetryEvent) {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.len() >= MAX_EVENTS {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        compute_snapshot(&buffer)
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl TelemetrySink for TelemetryRecorder {
    fn send(&self, event: TelemetryEvent) {
        self.record(event);
    }
}
