use async_trait::async_trait;
use nudb_core::request::UPLOAD_FIELD;
use nudb_core::{HttpMethod, RequestDescriptor};
use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Failed to open upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends one request and returns the raw response body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RequestDescriptor) -> Result<String, TransportError>;
}

/// reqwest-backed transport
///
/// Every field travels in the query string, for POST as well as GET. File
/// uploads are streamed as the multipart `file` part.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }

    /// Reuse a preconfigured reqwest client (proxies, TLS roots, ...)
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The opened file moves into the request body and is closed with it
    async fn upload_form(path: &Path) -> Result<Form, TransportError> {
        let file = tokio::fs::File::open(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UPLOAD_FIELD.to_string());

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        Ok(Form::new().part(UPLOAD_FIELD, Part::stream(body).file_name(file_name)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<String, TransportError> {
        let timeout = request.timeout();
        let builder = match request.method() {
            HttpMethod::Get => self.client.get(request.url()),
            HttpMethod::Post => self.client.post(request.url()),
        };
        let mut builder = builder.query(request.params()).timeout(timeout);

        if let Some(path) = request.upload_path() {
            builder = builder.multipart(Self::upload_form(path).await?);
        }

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Request(e)
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
