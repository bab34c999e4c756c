use std::collections::HashMap;

use tracing::debug;

use super::origin::{last_segment, FileHandle, LoadOrigin};
use super::query::QueryParams;

/// Locator used for a file embedded by the serving page.
pub const EMBEDDED_DATA_LOCATOR: &str = "/data";

/// Page metadata as name -> contents, in document order.
#[derive(Debug, Clone, Default)]
pub struct PageMetadata {
    entries: HashMap<String, Vec<String>>,
}

impl PageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries with empty content are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut meta = Self::new();
        for (name, content) in pairs {
            meta.insert(name, content);
        }
        meta
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let content = content.into();
        if content.is_empty() {
            return;
        }
        self.entries.entry(name.into()).or_default().push(content);
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.first()).map(String::as_str)
    }
}

/// Decides which input produced a load request.
///
/// Startup sources are checked in order: embedded file, then `url` query
/// parameter. File-pick and drop are separate entry points invoked by user
/// action; each accepts exactly one file.
pub struct SourceResolver;

impl SourceResolver {
    pub fn resolve(metadata: &PageMetadata, query: &QueryParams) -> Option<LoadOrigin> {
        if let Some(file) = metadata.first("file") {
            debug!("Resolved embedded file reference: {}", file);
            return Some(LoadOrigin::network_named(
                EMBEDDED_DATA_LOCATOR,
                last_segment(file),
            ));
        }

        if let Some(url) = query.non_empty("url") {
            let identifier = query
                .non_empty("identifier")
                .unwrap_or_else(|| last_segment(&url).to_string());
            debug!("Resolved url query parameter: {} as {}", url, identifier);
            return Some(LoadOrigin::network_named(url, identifier));
        }

        None
    }

    pub fn file_picked(files: Vec<FileHandle>) -> Option<LoadOrigin> {
        Self::single_file(files, "file pick")
    }

    pub fn file_dropped(files: Vec<FileHandle>) -> Option<LoadOrigin> {
        Self::single_file(files, "drop")
    }

    fn single_file(mut files: Vec<FileHandle>, action: &str) -> Option<LoadOrigin> {
        if files.len() != 1 {
            debug!("Ignoring {} carrying {} files", action, files.len());
            return None;
        }
        files.pop().map(LoadOrigin::local)
    }
}
