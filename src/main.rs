use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use model_host::kernel::error::ConsumerError;
use model_host::kernel::origin::last_segment;
use model_host::kernel::query::QueryParams;
use model_host::kernel::resolver::PageMetadata;
use model_host::kernel::shortcut::Shortcut;
use model_host::kernel::telemetry::sink::TracingSink;
use model_host::kernel::telemetry::{ErrorReport, TelemetrySink};
use model_host::{FileHandle, Host, HostConfig, HttpTransport, Screen, Startup, View};

#[derive(Debug, Parser)]
#[command(name = "model-host", about = "Fetch a model artifact and hand it to a consumer")]
struct Args {
    /// URL or local path. Omit to resolve from --location and --meta.
    source: Option<String>,

    /// Display name override.
    #[arg(long)]
    identifier: Option<String>,

    /// Decode the payload as text with this encoding label.
    #[arg(long)]
    encoding: Option<String>,

    /// Fail on malformed input instead of decoding leniently.
    #[arg(long, requires = "encoding")]
    strict: bool,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page location, including any `?url=` / `&identifier=` query.
    #[arg(long)]
    location: Option<String>,

    /// Page metadata entry as name=content. Repeatable.
    #[arg(long = "meta", value_name = "NAME=CONTENT")]
    meta: Vec<String>,
}

/// Stands in for a rendered model.
#[derive(Debug)]
struct Loaded {
    name: String,
    bytes: Vec<u8>,
}

struct ConsoleView;

#[async_trait]
impl View for ConsoleView {
    type Model = Loaded;

    fn show(&self, screen: Option<Screen>) {
        match screen {
            Some(screen) => tracing::debug!("[VIEW] {}", screen.name()),
            None => tracing::debug!("[VIEW] model"),
        }
    }

    async fn open_buffer(&self, bytes: Vec<u8>, name: &str) -> Result<Option<Loaded>, ConsumerError> {
        if bytes.is_empty() {
            return Err(ConsumerError::new("Error", format!("'{}' is empty.", name)));
        }
        Ok(Some(Loaded {
            name: name.to_string(),
            bytes,
        }))
    }

    fn alert(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn confirm(&self, _text: &str) -> bool {
        false
    }

    fn set_title(&self, title: &str) {
        tracing::info!("[VIEW] title: {}", title);
    }

    fn shortcut(&self, action: Shortcut) {
        tracing::debug!("[VIEW] shortcut {:?}", action);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let args = Args::parse();

    let mut config = HostConfig::load(args.config.as_deref())?;
    if let Some(location) = &args.location {
        config.location = Some(location.clone());
    }
    tracing::info!("{} starting (capabilities {:?})", config.app_name, config.capabilities);

    let sink: Arc<dyn TelemetrySink> = Arc::new(TracingSink);
    let host = Host::new(
        &config,
        Arc::new(ConsoleView),
        HttpTransport::new(&config.user_agent),
        Some(sink),
    );
    host.telemetry().install_panic_hook();

    let opened = match args.source {
        Some(source) if source.contains("://") => {
            let identifier = args
                .identifier
                .clone()
                .unwrap_or_else(|| last_segment(&source).to_string());
            host.open_model(&source, &identifier).await
        }
        Some(path) => {
            let handle = match &args.identifier {
                Some(name) => FileHandle::with_name(&path, name.as_str()),
                None => FileHandle::new(&path),
            };
            host.file_dropped(vec![handle])
                .await
                .ok_or_else(|| anyhow!("no file to open"))?
        }
        None => {
            let mut metadata = PageMetadata::new();
            for entry in &args.meta {
                let (name, content) = entry
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--meta expects NAME=CONTENT, got {:?}", entry))?;
                metadata.insert(name, content);
            }
            let query = QueryParams::from_location(config.location.clone().unwrap_or_default());
            match host.initialize(&metadata, &query).await {
                Startup::Opened(result) => result,
                Startup::AwaitingUser => {
                    return Err(anyhow!("nothing to open: pass a source or a location with ?url="));
                }
            }
        }
    };

    match opened {
        Ok(Some(loaded)) => {
            println!("{}\t{} bytes", loaded.name, loaded.bytes.len());
            let Some(label) = &args.encoding else {
                return Ok(());
            };
            let decoder = host.decoder(label);
            if !args.strict {
                println!("{}", decoder.decode(&loaded.bytes));
                return Ok(());
            }
            match decoder.decode_strict(&loaded.bytes) {
                Ok(text) => {
                    println!("{}", text);
                    Ok(())
                }
                Err(e) => {
                    host.exception(&ErrorReport::from(&e), false);
                    host.error("Error while decoding.", &e.to_string());
                    Err(anyhow!(e).context("decode failed"))
                }
            }
        }
        Ok(None) => Ok(()),
        Err(e) => Err(anyhow!(e).context("open failed")),
    }
}
