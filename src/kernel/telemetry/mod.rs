//! Telemetry shaping and forwarding.
//!
//! # DELIVERY INVARIANT
//! Reporting is fire-and-forget. A missing or failing sink must **NEVER**
//! change the behavior of the loader or host; nothing here returns an error.
//!
//! # SCHEMA
//! Every event carries the app name and version stamped by the reporter.
//! Exception descriptions come from [`describe::describe`].

pub mod describe;
pub mod event;
pub mod metrics;
pub mod recorder;
pub mod reporter;
pub mod sink;

pub use describe::ErrorReport;
pub use event::TelemetryEvent;
pub use reporter::TelemetryReporter;
pub use sink::TelemetrySink;
