use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParameterError;

/// Payload encoding accepted by `rput`, `fput` and `rupdate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Text,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Text => "text",
        }
    }
}

/// Strict: only the exact strings `json` and `text` are accepted.
impl FromStr for Format {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "text" => Ok(Format::Text),
            other => Err(ParameterError::WrongFormatParameter(other.to_string())),
        }
    }
}

/// Which record identifier a request carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Rid,
    Key,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Rid => "rid",
            SearchField::Key => "key",
        }
    }
}

impl From<&str> for SearchField {
    fn from(value: &str) -> Self {
        crate::params::resolve_search_field(Some(value), None)
    }
}

/// How `rupdate` applies the new data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateMethod {
    #[default]
    ReplaceRecord,
    ReplaceField,
}

impl UpdateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMethod::ReplaceRecord => "replaceRecord",
            UpdateMethod::ReplaceField => "replaceField",
        }
    }

    /// Wire field the update payload travels under
    pub fn data_field(&self) -> DataField {
        crate::params::resolve_data_field(Some(self.as_str()), None)
    }
}

impl From<&str> for UpdateMethod {
    fn from(value: &str) -> Self {
        crate::params::resolve_update_method(Some(value), None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataField {
    Record,
    Field,
}

impl DataField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataField::Record => "record",
            DataField::Field => "field",
        }
    }
}

/// Response encoding requested through `out`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl From<&str> for OutputFormat {
    fn from(value: &str) -> Self {
        crate::params::resolve_out(Some(value), None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Server endpoints under `/nudb/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    DbInfo,
    Query,
    RecordGet,
    RecordPut,
    FilePut,
    RecordDelete,
    RecordUpdate,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::DbInfo => "getDBInfo",
            Endpoint::Query => "query",
            Endpoint::RecordGet => "rget",
            Endpoint::RecordPut => "rput",
            Endpoint::FilePut => "fput",
            Endpoint::RecordDelete => "rdel",
            Endpoint::RecordUpdate => "rupdate",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::DbInfo | Endpoint::Query | Endpoint::RecordGet => HttpMethod::Get,
            Endpoint::RecordPut
            | Endpoint::FilePut
            | Endpoint::RecordDelete
            | Endpoint::RecordUpdate => HttpMethod::Post,
        }
    }
}

/// Where requests go and which database they target by default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub base_endpoint: String,
    pub db: String,
}

impl Connection {
    pub fn new(host: &str, port: u16, db: impl Into<String>) -> Self {
        Self {
            base_endpoint: format!("http://{}:{}/nudb/", host, port),
            db: db.into(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_endpoint, endpoint.path())
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new("localhost", 5800, "test")
    }
}
