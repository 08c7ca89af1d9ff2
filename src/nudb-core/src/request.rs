use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{Connection, Endpoint, HttpMethod};

/// Multipart form field carrying an uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// A fully validated request, built once per call and handed to the
/// transport by value.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    endpoint: Endpoint,
    url: String,
    params: BTreeMap<String, String>,
    upload: Option<PathBuf>,
    timeout: Duration,
    parse_json: bool,
}

impl RequestDescriptor {
    pub(crate) fn new(connection: &Connection, endpoint: Endpoint, timeout: Duration) -> Self {
        Self {
            endpoint,
            url: connection.url(endpoint),
            params: BTreeMap::new(),
            upload: None,
            timeout,
            parse_json: true,
        }
    }

    pub(crate) fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub(crate) fn upload(mut self, path: PathBuf) -> Self {
        self.upload = Some(path);
        self
    }

    pub(crate) fn parse_json(mut self, parse_json: bool) -> Self {
        self.parse_json = parse_json;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.endpoint.method()
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query string fields, sent for both GET and POST
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// File streamed as the multipart `file` field
    pub fn upload_path(&self) -> Option<&Path> {
        self.upload.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the response body should be decoded as JSON
    pub fn parses_json(&self) -> bool {
        self.parse_json
    }
}
