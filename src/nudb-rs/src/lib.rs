//! NuDB Client Library
//!
//! HTTP client for the NuDB record database (`/nudb/` REST endpoints).
//! Arguments are validated by `nudb-core` before anything is sent.

mod client;
pub mod transport;

pub use client::{Client, Reply};
pub use nudb_core::{
    ClientConfig, Connection, DatabaseInfo, DeleteRecord, GetRecord, Operation, ParameterError,
    PutFile, PutOptions, PutRecord, RecordOptions, RequestOptions, Search, SearchField,
    UpdateMethod, UpdateOptions, UpdateRecord,
};
pub use transport::{HttpTransport, Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid parameters: {0}")]
    Parameter(#[from] ParameterError),

    /// Any failure reported by the transport, reduced to its message
    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response from server")]
    InvalidResponse,
}

pub type Result<T> = std::result::Result<T, ClientError>;
