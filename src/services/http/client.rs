use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::kernel::loader::{ResponseMode, Transport, TransportError, TransportResponse};

/// `reqwest`-backed GET transport. No request timeout: a hung request
/// stays pending until the connection reports success or failure.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, mode: ResponseMode) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| TransportError {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status != 200 {
            debug!("GET {} returned {}", url, status);
            return Ok(TransportResponse { status, body: Vec::new() });
        }

        let body = match mode {
            ResponseMode::Binary => response.bytes().await.map(|b| b.to_vec()),
            ResponseMode::Text => response.text().await.map(String::into_bytes),
        }
        .map_err(|e| TransportError {
            status: None,
            message: e.to_string(),
        })?;

        Ok(TransportResponse { status, body })
    }
}
