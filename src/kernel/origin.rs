use std::fmt;
use std::path::{Path, PathBuf};

/// A local file chosen by the user. Not `Clone`: a handle is consumed by
/// exactly one load.
#[derive(Debug, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    path: PathBuf,
}

impl FileHandle {
    /// Reported name is the path's final component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where a load reads its bytes from.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    Network { url: String, identifier: String },
    LocalFile { handle: FileHandle },
}

impl LoadOrigin {
    /// Network origin named after the locator's last path segment.
    pub fn network(url: impl Into<String>) -> Self {
        let url = url.into();
        let identifier = last_segment(&url).to_string();
        LoadOrigin::Network { url, identifier }
    }

    pub fn network_named(url: impl Into<String>, identifier: impl Into<String>) -> Self {
        LoadOrigin::Network {
            url: url.into(),
            identifier: identifier.into(),
        }
    }

    pub fn local(handle: FileHandle) -> Self {
        LoadOrigin::LocalFile { handle }
    }

    pub fn identifier(&self) -> &str {
        match self {
            LoadOrigin::Network { identifier, .. } => identifier,
            LoadOrigin::LocalFile { handle } => handle.name(),
        }
    }
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOrigin::Network { url, .. } => write!(f, "network:{}", url),
            LoadOrigin::LocalFile { handle } => write!(f, "file:{}", handle.path().display()),
        }
    }
}

/// Text after the final `/`, or the whole input when there is none.
pub fn last_segment(locator: &str) -> &str {
    locator.rsplit('/').next().unwrap_or(locator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_identifier_is_last_segment() {
        let origin = LoadOrigin::network("http://x/models/model.bin");
        assert_eq!(origin.identifier(), "model.bin");
        assert_eq!(last_segment("plain"), "plain");
        assert_eq!(last_segment("http://x/dir/"), "");
    }

    #[test]
    fn local_identifier_is_reported_name() {
        let origin = LoadOrigin::local(FileHandle::new("/tmp/squeezenet.onnx"));
        assert_eq!(origin.identifier(), "squeezenet.onnx");

        let renamed = LoadOrigin::local(FileHandle::with_name("/tmp/blob", "graph.pb"));
        assert_eq!(renamed.identifier(), "graph.pb");
    }
}
