//! nudb - command line client for the NuDB record database
//!
//! The binary is a thin layer over `nudb-rs`; the pieces live here so they
//! can be tested without a terminal.
//!
//! ```bash
//! nudb --host localhost --port 5800 --db test get 42
//! nudb put '{"title":"hello"}' --format json
//! ```

pub use nudb_rs;

pub mod commands;
pub mod telemetry;
