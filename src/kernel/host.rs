//! The shell driver: wires resolution, retrieval, telemetry and the
//! external view together.
//!
//! Every failure that reaches this layer has already been reported to
//! telemetry and displayed through [`View::alert`] by the time the method
//! returns; the returned [`HostError`] is informational.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{info, warn};

use super::capabilities::Capabilities;
use super::decoder::TextDecoder;
use super::error::{ConsumerError, HostError, LoadError};
use super::loader::{LoadResult, ResourceLoader, Transport};
use super::origin::{FileHandle, LoadOrigin};
use super::query::QueryParams;
use super::resolver::{PageMetadata, SourceResolver};
use super::shortcut::{KeyInput, Shortcut};
use super::telemetry::event::AppInfo;
use super::telemetry::{ErrorReport, TelemetryReporter, TelemetrySink};
use crate::config::HostConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Spinner,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Welcome => "Welcome",
            Screen::Spinner => "Spinner",
        }
    }
}

/// Presentation layer and model consumer.
#[async_trait]
pub trait View: Send + Sync {
    type Model: Send;

    /// `None` hides any full-page screen and shows the model.
    fn show(&self, screen: Option<Screen>);

    /// Called once per successfully retrieved buffer.
    async fn open_buffer(&self, bytes: Vec<u8>, name: &str) -> Result<Option<Self::Model>, ConsumerError>;

    /// Synchronous user-facing message.
    fn alert(&self, text: &str);

    fn confirm(&self, text: &str) -> bool;

    fn set_title(&self, title: &str);

    fn shortcut(&self, action: Shortcut);
}

pub type OpenResult<M> = Result<Option<M>, HostError>;

/// What `initialize` did.
#[derive(Debug)]
pub enum Startup<M> {
    /// A startup source resolved and was opened.
    Opened(OpenResult<M>),
    /// Nothing to open; the welcome screen is up.
    AwaitingUser,
}

pub struct Host<V: View, T: Transport> {
    view: Arc<V>,
    loader: ResourceLoader<T>,
    telemetry: TelemetryReporter,
    capabilities: Capabilities,
    location: Option<String>,
    default_app: AppInfo,
    pending: AtomicUsize,
}

impl<V: View, T: Transport> Host<V, T> {
    pub fn new(
        config: &HostConfig,
        view: Arc<V>,
        transport: T,
        sink: Option<Arc<dyn TelemetrySink>>,
    ) -> Self {
        let telemetry = TelemetryReporter::new(sink, &config.capabilities);
        let default_app = AppInfo {
            name: config.app_type.clone(),
            version: config.app_version.clone(),
        };
        telemetry.set_app(default_app.clone());

        let loader = ResourceLoader::new(transport, telemetry.clone())
            .with_binary_suffixes(config.binary_suffixes.iter().cloned());

        Self {
            view,
            loader,
            telemetry,
            capabilities: config.capabilities,
            location: config.location.clone(),
            default_app,
            pending: AtomicUsize::new(0),
        }
    }

    pub fn telemetry(&self) -> &TelemetryReporter {
        &self.telemetry
    }

    pub fn loader(&self) -> &ResourceLoader<T> {
        &self.loader
    }

    /// True while any open is in flight. The loader itself admits
    /// concurrent loads; callers gate their triggers on this.
    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn decoder(&self, label: &str) -> TextDecoder {
        TextDecoder::new(label, &self.capabilities)
    }

    /// Stamps telemetry from page metadata, then opens the startup source
    /// or shows the welcome screen.
    pub async fn initialize(&self, metadata: &PageMetadata, query: &QueryParams) -> Startup<V::Model> {
        self.telemetry.set_app(AppInfo {
            name: metadata
                .first("type")
                .map(str::to_string)
                .unwrap_or_else(|| self.default_app.name.clone()),
            version: metadata
                .first("version")
                .map(str::to_string)
                .unwrap_or_else(|| self.default_app.version.clone()),
        });

        match SourceResolver::resolve(metadata, query) {
            Some(origin) => Startup::Opened(self.open(origin).await),
            None => {
                info!("No startup source, waiting for user");
                self.view.show(Some(Screen::Welcome));
                Startup::AwaitingUser
            }
        }
    }

    pub async fn open_model(&self, url: &str, identifier: &str) -> OpenResult<V::Model> {
        self.open(LoadOrigin::network_named(url, identifier)).await
    }

    pub async fn open_file(&self, handle: FileHandle) -> OpenResult<V::Model> {
        self.open(LoadOrigin::local(handle)).await
    }

    /// `None` when the selection did not carry exactly one file.
    pub async fn file_picked(&self, files: Vec<FileHandle>) -> Option<OpenResult<V::Model>> {
        let origin = SourceResolver::file_picked(files)?;
        Some(self.open(origin).await)
    }

    pub async fn file_dropped(&self, files: Vec<FileHandle>) -> Option<OpenResult<V::Model>> {
        let origin = SourceResolver::file_dropped(files)?;
        Some(self.open(origin).await)
    }

    /// Fetches an auxiliary resource relative to the page location. The
    /// body is read in the mode the locator's suffix selects.
    pub async fn request(&self, file: &str) -> LoadResult {
        self.loader.load(LoadOrigin::network(self.resolve_locator(file))).await
    }

    /// Resolves a model locator the way a browser resolves a link on the
    /// page: relative to the location's directory, or to its host root for
    /// `/`-prefixed locators. Unparseable input passes through unchanged.
    pub fn resolve_model_locator(&self, locator: &str) -> String {
        if locator.contains("://") {
            return locator.to_string();
        }
        let Some(location) = &self.location else {
            return locator.to_string();
        };
        match Url::parse(location).and_then(|base| base.join(locator)) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Cannot resolve '{}' against '{}': {}", locator, location, e);
                locator.to_string()
            }
        }
    }

    /// Page location without its query and trailing `/`, followed by
    /// `file`. Used for auxiliary requests, whose locators are written
    /// against the page directory. Absolute locators and a missing
    /// location pass through.
    pub fn resolve_locator(&self, file: &str) -> String {
        if file.contains("://") {
            return file.to_string();
        }
        match &self.location {
            Some(location) => {
                let base = QueryParams::from_location(location.as_str()).base().to_string();
                let base = base.strip_suffix('/').unwrap_or(&base);
                format!("{}{}", base, file)
            }
            None => file.to_string(),
        }
    }

    /// True if the key was consumed and its default action should be
    /// suppressed.
    pub fn handle_key(&self, key: KeyInput) -> bool {
        match Shortcut::from_key(key) {
            Some(action) => {
                self.view.shortcut(action);
                true
            }
            None => false,
        }
    }

    pub fn error(&self, message: &str, detail: &str) {
        warn!("{} {}", message, detail);
        self.view.alert(&format!("{} {}", message, detail));
    }

    pub fn confirm(&self, message: &str, detail: &str) -> bool {
        self.view.confirm(&format!("{} {}", message, detail))
    }

    pub fn exception(&self, err: &ErrorReport, fatal: bool) {
        self.telemetry.exception(err, fatal);
    }

    pub fn screen(&self, name: &str) {
        self.telemetry.screen(name);
    }

    pub fn event(&self, category: &str, action: &str, label: &str, value: i64) {
        self.telemetry.event(category, action, label, value);
    }

    async fn open(&self, origin: LoadOrigin) -> OpenResult<V::Model> {
        let origin = match origin {
            LoadOrigin::Network { url, identifier } => LoadOrigin::Network {
                url: self.resolve_model_locator(&url),
                identifier,
            },
            local => local,
        };

        let _pending = PendingGuard::enter(&self.pending);
        self.view.show(Some(Screen::Spinner));

        let buffer = match self.loader.load_binary(origin).await {
            Ok(buffer) => buffer,
            Err(err) => {
                self.view.show(None);
                self.display_load_error(&err);
                return Err(err.into());
            }
        };

        let name = buffer.name;
        let opened = self.view.open_buffer(buffer.bytes, &name).await;
        self.view.show(None);

        match opened {
            Ok(model) => {
                if model.is_some() {
                    self.view.set_title(&name);
                }
                Ok(model)
            }
            Err(err) => {
                self.telemetry.exception(&ErrorReport::from(&err), false);
                self.error(&err.name, &err.message);
                Err(err.into())
            }
        }
    }

    // Telemetry for load failures is recorded by the loader.
    fn display_load_error(&self, err: &LoadError) {
        match err {
            LoadError::Retrieval { status_code: Some(status) } => {
                self.error("Model load request failed.", &status.to_string())
            }
            LoadError::Retrieval { status_code: None } => {
                self.error("Error while requesting model.", "No response.")
            }
            LoadError::Read { message } => self.error("Error while reading file.", message),
        }
    }
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
