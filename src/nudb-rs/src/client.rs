use crate::transport::{HttpTransport, Transport};
use crate::{ClientError, Result};
use nudb_core::{
    ClientConfig, Connection, DatabaseInfo, DeleteRecord, GetRecord, Operation, PutFile,
    PutOptions, PutRecord, RecordOptions, RequestDefaults, RequestDescriptor, RequestOptions,
    Search, UpdateOptions, UpdateRecord,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(Value),
    Text(String),
}

impl Reply {
    pub fn into_json(self) -> Result<Value> {
        match self {
            Reply::Json(value) => Ok(value),
            Reply::Text(_) => Err(ClientError::InvalidResponse),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Json(_) => None,
        }
    }
}

/// NuDB HTTP API Client
pub struct Client {
    connection: Connection,
    defaults: RequestDefaults,
    transport: Arc<dyn Transport>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client for `http://localhost:5800/nudb/`, database `test`
    pub fn new() -> Self {
        Self::from_config(&ClientConfig::default())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client that sends through a custom transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            connection: config.connection(),
            defaults: config.defaults(),
            transport,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    /// Point the client at another server and default database.
    ///
    /// Requests already built keep the endpoint they were built with.
    pub fn connect(&mut self, host: &str, port: u16, db: impl Into<String>) {
        self.connection = Connection::new(host, port, db);
        tracing::info!(
            endpoint = %self.connection.base_endpoint,
            db = %self.connection.db,
            "Connected"
        );
    }

    /// Get database information
    #[tracing::instrument(skip(self, options))]
    pub async fn database_info(&self, db: &str, options: RequestOptions) -> Result<Value> {
        self.call(&DatabaseInfo::new(db).with_options(options))
            .await?
            .into_json()
    }

    /// Run a structured query.
    ///
    /// The reply is decoded only when the query asks for `out=json`.
    #[tracing::instrument(skip_all)]
    pub async fn search(&self, query: Value, options: RequestOptions) -> Result<Reply> {
        self.call(&Search::new(query).with_options(options)).await
    }

    /// Get a record by rid (or key, per `options.search_field`)
    #[tracing::instrument(skip(self, options))]
    pub async fn get_record(&self, id: &str, options: RecordOptions) -> Result<Value> {
        self.call(&GetRecord::new(id).with_options(options))
            .await?
            .into_json()
    }

    /// Store one record, or several when `format` is text and `rec_beg` splits them
    #[tracing::instrument(skip(self, data, options))]
    pub async fn put_record(
        &self,
        data: impl Into<Value>,
        format: &str,
        options: PutOptions,
    ) -> Result<Value> {
        self.call(&PutRecord::new(data, format).with_options(options))
            .await?
            .into_json()
    }

    /// Upload a file of records
    #[tracing::instrument(skip(self, path, options), fields(path = %path.as_ref().display()))]
    pub async fn put_file(
        &self,
        path: impl AsRef<Path>,
        format: &str,
        options: PutOptions,
    ) -> Result<Value> {
        self.call(&PutFile::new(path.as_ref(), format).with_options(options))
            .await?
            .into_json()
    }

    /// Delete a record by rid (or key)
    #[tracing::instrument(skip(self, options))]
    pub async fn delete_record(&self, id: &str, options: RecordOptions) -> Result<Value> {
        self.call(&DeleteRecord::new(id).with_options(options))
            .await?
            .into_json()
    }

    /// Replace a record, or the given fields when `update_method` is `ReplaceField`
    #[tracing::instrument(skip(self, data, options))]
    pub async fn update_record(
        &self,
        id: &str,
        data: impl Into<Value>,
        format: &str,
        options: UpdateOptions,
    ) -> Result<Value> {
        self.call(&UpdateRecord::new(id, data, format).with_options(options))
            .await?
            .into_json()
    }

    /// Validate an operation against the current connection and send it.
    ///
    /// Parameter errors are returned before anything reaches the transport.
    pub async fn call<O>(&self, operation: &O) -> Result<Reply>
    where
        O: Operation + Sync + ?Sized,
    {
        let request = operation.build(&self.connection, &self.defaults)?;
        self.execute(request).await
    }

    /// Hand a built request to the transport and decode the reply
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Reply> {
        let endpoint = request.endpoint();
        let parse_json = request.parses_json();
        tracing::debug!(
            method = %request.method(),
            endpoint = endpoint.path(),
            url = request.url(),
            timeout_ms = request.timeout().as_millis() as u64,
            "Sending request"
        );

        let body = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(endpoint = endpoint.path(), error = %e, "Request failed");
            ClientError::Transport {
                message: e.to_string(),
            }
        })?;

        if parse_json {
            Ok(Reply::Json(serde_json::from_str(&body)?))
        } else {
            Ok(Reply::Text(body))
        }
    }
}
