pub mod config;
pub mod kernel;
pub mod services;

// Re-export specific items for convenient access
pub use config::HostConfig;
pub use kernel::decoder::{EncodingName, TextDecoder};
pub use kernel::host::{Host, Screen, Startup, View};
pub use kernel::loader::{LoadResult, LoadedBuffer, ResourceLoader};
pub use kernel::origin::{FileHandle, LoadOrigin};
pub use services::http::client::HttpTransport;
