//! One type per remote operation.
//!
//! Each operation carries its positional fields plus a trailing options
//! struct, and knows how to turn itself into a [`RequestDescriptor`] against
//! a [`Connection`] snapshot.

use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::RequestDefaults;
use crate::error::ParameterError;
use crate::models::{Connection, Endpoint, Format, OutputFormat, SearchField, UpdateMethod};
use crate::params;
use crate::request::RequestDescriptor;

/// Builds the request for a single remote call
pub trait Operation {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError>;
}

/// Options shared by `getDBInfo` and `query`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub db: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Options for calls addressing one record (`rget`, `rdel`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOptions {
    pub db: Option<String>,
    pub search_field: Option<SearchField>,
    pub timeout: Option<Duration>,
}

impl RecordOptions {
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn search_field(mut self, search_field: SearchField) -> Self {
        self.search_field = Some(search_field);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Options for ingestion calls (`rput`, `fput`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOptions {
    pub db: Option<String>,
    pub rec_beg: Option<String>,
    pub timeout: Option<Duration>,
}

impl PutOptions {
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn rec_beg(mut self, rec_beg: impl Into<String>) -> Self {
        self.rec_beg = Some(rec_beg.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub db: Option<String>,
    pub search_field: Option<SearchField>,
    pub update_method: Option<UpdateMethod>,
    pub timeout: Option<Duration>,
}

impl UpdateOptions {
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn search_field(mut self, search_field: SearchField) -> Self {
        self.search_field = Some(search_field);
        self
    }

    pub fn update_method(mut self, update_method: UpdateMethod) -> Self {
        self.update_method = Some(update_method);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Explicit override first, then the connection's database
fn resolve_db(db: Option<&str>, connection: &Connection) -> Result<String, ParameterError> {
    let db = db.filter(|d| !d.is_empty()).unwrap_or(connection.db.as_str());
    params::require_str("db", db).map(str::to_string)
}

fn require_rec_beg(format: Format, rec_beg: Option<&str>) -> Result<Option<String>, ParameterError> {
    match (format, rec_beg) {
        (Format::Text, Some(r)) if !r.is_empty() => Ok(Some(r.to_string())),
        (Format::Text, _) => Err(ParameterError::MissingRecBeg),
        (Format::Json, _) => Ok(None),
    }
}

/// Query string form of a caller-supplied filter value
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `getDBInfo`
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    pub db: String,
    pub options: RequestOptions,
}

impl DatabaseInfo {
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for DatabaseInfo {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        // positional name wins, an options `db` may stand in for it
        let db = Some(self.db.as_str())
            .filter(|d| !d.is_empty())
            .or(self.options.db.as_deref())
            .unwrap_or_default();
        let db = params::require_str("db", db)?;
        let timeout = params::resolve_timeout(self.options.timeout, Some(defaults.timeout));

        Ok(RequestDescriptor::new(connection, Endpoint::DbInfo, timeout)
            .param("db", db)
            .param("out", OutputFormat::Json.as_str()))
    }
}

/// `query`
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub query: Value,
    pub options: RequestOptions,
}

impl Search {
    pub fn new(query: Value) -> Self {
        Self {
            query,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for Search {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        let query = params::require_query(&self.query)?;
        let timeout = params::resolve_timeout(self.options.timeout, Some(defaults.timeout));

        let mut request = RequestDescriptor::new(connection, Endpoint::Query, timeout);
        for (name, value) in query {
            if let Some(value) = query_value(value) {
                request = request.param(name.as_str(), value);
            }
        }

        if request.get("db").map_or(true, str::is_empty) {
            let db = resolve_db(self.options.db.as_deref(), connection)?;
            request = request.param("db", db);
        }

        // Only an explicit out=json turns on decoding, the server answers in text otherwise
        let decode = request.get("out") == Some(OutputFormat::Json.as_str());
        Ok(request.parse_json(decode))
    }
}

/// `rget`
#[derive(Debug, Clone, PartialEq)]
pub struct GetRecord {
    pub id: String,
    pub options: RecordOptions,
}

impl GetRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: RecordOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RecordOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for GetRecord {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        record_request(
            Endpoint::RecordGet,
            &self.id,
            &self.options,
            connection,
            defaults,
        )
    }
}

/// `rdel`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRecord {
    pub id: String,
    pub options: RecordOptions,
}

impl DeleteRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: RecordOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RecordOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for DeleteRecord {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        record_request(
            Endpoint::RecordDelete,
            &self.id,
            &self.options,
            connection,
            defaults,
        )
    }
}

fn record_request(
    endpoint: Endpoint,
    id: &str,
    options: &RecordOptions,
    connection: &Connection,
    defaults: &RequestDefaults,
) -> Result<RequestDescriptor, ParameterError> {
    let id = params::require_str("id", id)?;
    let db = resolve_db(options.db.as_deref(), connection)?;
    let search_field = options.search_field.unwrap_or(defaults.search_field);
    let timeout = params::resolve_timeout(options.timeout, Some(defaults.timeout));

    Ok(RequestDescriptor::new(connection, endpoint, timeout)
        .param("db", db)
        .param(search_field.as_str(), id)
        .param("out", OutputFormat::Json.as_str()))
}

/// `rput`
#[derive(Debug, Clone, PartialEq)]
pub struct PutRecord {
    pub data: Value,
    pub format: String,
    pub options: PutOptions,
}

impl PutRecord {
    pub fn new(data: impl Into<Value>, format: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            format: format.into(),
            options: PutOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PutOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for PutRecord {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        params::require_value("data", &self.data)?;
        let format = params::parse_format(&self.format)?;
        let rec_beg = require_rec_beg(format, self.options.rec_beg.as_deref())?;
        let data = params::normalize_data(&self.data, format)?;
        let db = resolve_db(self.options.db.as_deref(), connection)?;
        let timeout = params::resolve_timeout(self.options.timeout, Some(defaults.timeout));

        let mut request = RequestDescriptor::new(connection, Endpoint::RecordPut, timeout)
            .param("db", db)
            .param("data", data)
            .param("format", format.as_str());
        if let Some(rec_beg) = rec_beg {
            request = request.param("recbeg", rec_beg);
        }
        Ok(request)
    }
}

/// `fput`
#[derive(Debug, Clone, PartialEq)]
pub struct PutFile {
    pub path: PathBuf,
    pub format: String,
    pub options: PutOptions,
}

impl PutFile {
    pub fn new(path: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: format.into(),
            options: PutOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PutOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for PutFile {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        let path = params::require_file(&self.path)?;
        let format = params::parse_format(&self.format)?;
        let rec_beg = require_rec_beg(format, self.options.rec_beg.as_deref())?;
        let db = resolve_db(self.options.db.as_deref(), connection)?;
        let timeout = params::resolve_timeout(self.options.timeout, Some(defaults.file_timeout));

        let mut request = RequestDescriptor::new(connection, Endpoint::FilePut, timeout)
            .param("db", db)
            .param("format", format.as_str())
            .param("out", OutputFormat::Json.as_str())
            .upload(path);
        if let Some(rec_beg) = rec_beg {
            request = request.param("recbeg", rec_beg);
        }
        Ok(request)
    }
}

/// `rupdate`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecord {
    pub id: String,
    pub data: Value,
    pub format: String,
    pub options: UpdateOptions,
}

impl UpdateRecord {
    pub fn new(id: impl Into<String>, data: impl Into<Value>, format: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            format: format.into(),
            options: UpdateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }
}

impl Operation for UpdateRecord {
    fn build(
        &self,
        connection: &Connection,
        defaults: &RequestDefaults,
    ) -> Result<RequestDescriptor, ParameterError> {
        let id = params::require_str("id", &self.id)?;
        params::require_value("data", &self.data)?;
        let format = params::parse_format(&self.format)?;
        let data = params::normalize_data(&self.data, format)?;
        let db = resolve_db(self.options.db.as_deref(), connection)?;
        let search_field = self.options.search_field.unwrap_or(defaults.search_field);
        let update_method = self.options.update_method.unwrap_or(defaults.update_method);
        let timeout = params::resolve_timeout(self.options.timeout, Some(defaults.timeout));

        Ok(RequestDescriptor::new(connection, Endpoint::RecordUpdate, timeout)
            .param("db", db)
            .param(search_field.as_str(), id)
            .param("format", format.as_str())
            .param(update_method.data_field().as_str(), data)
            .param("getrec", "n")
            .param("out", OutputFormat::Json.as_str()))
    }
}
