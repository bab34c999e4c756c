use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use regex::Regex;

use crate::kernel::error::{ConsumerError, DecodeError, LoadError};

const SEPARATOR: &str = " @ ";

/// The parts of an error that telemetry cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub name: Option<String>,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
            stack: None,
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Box<dyn Any>".to_string());
        let mut report = Self::named("panic", message);
        if let Some(location) = info.location() {
            report.stack = Some(format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ));
        }
        report
    }
}

impl From<&LoadError> for ErrorReport {
    fn from(err: &LoadError) -> Self {
        let message = match err.status_code() {
            Some(status) => format!("{} ({})", err, status),
            None => err.to_string(),
        };
        Self::named(err.kind(), message)
    }
}

impl From<&ConsumerError> for ErrorReport {
    fn from(err: &ConsumerError) -> Self {
        Self::named(err.name.clone(), err.message.clone())
    }
}

impl From<&DecodeError> for ErrorReport {
    fn from(err: &DecodeError) -> Self {
        Self::named("DecodeAmbiguity", err.to_string())
    }
}

fn frame_pattern() -> &'static Regex {
    static FRAME: OnceLock<Regex> = OnceLock::new();
    FRAME.get_or_init(|| Regex::new(r"\n    at (.*)\((.*)\)").expect("static frame pattern"))
}

/// `"<name>: <message>"`, then either the first `at fn(path)` frame reduced
/// to its file basename or the first stack line, joined by `" @ "`.
pub fn describe(report: &ErrorReport) -> String {
    let mut parts = Vec::with_capacity(2);
    parts.push(match &report.name {
        Some(name) if !name.is_empty() => format!("{}: {}", name, report.message),
        _ => report.message.clone(),
    });

    if let Some(stack) = report.stack.as_deref().filter(|s| !s.is_empty()) {
        match frame_pattern().captures(stack) {
            Some(frame) => {
                let file = frame[2].rsplit('/').next().unwrap_or(&frame[2]);
                parts.push(format!("{}({})", &frame[1], file));
            }
            None => parts.push(stack.lines().next().unwrap_or_default().to_string()),
        }
    }

    parts.join(SEPARATOR)
}
