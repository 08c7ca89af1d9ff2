//! NuDB Core Library
//!
//! This crate provides everything a NuDB client needs before touching the
//! network:
//! - Parameter normalization (required fields, formats, soft defaults)
//! - Wire enums and endpoints
//! - Per-operation request construction
//! - Client configuration

pub mod config;
pub mod error;
pub mod models;
pub mod ops;
pub mod params;
pub mod request;

// Re-export commonly used types
pub use config::{ClientConfig, RequestDefaults};
pub use error::ParameterError;
pub use models::*;
pub use ops::*;
pub use request::RequestDescriptor;
