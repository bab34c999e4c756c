pub mod capabilities;
pub mod decoder;
pub mod error;
pub mod host;
pub mod loader;
pub mod origin;
pub mod query;
pub mod resolver;
pub mod shortcut;
pub mod telemetry;
