//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, upload path checks, the MCP server
//! handler, and the transports that carry it.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};
pub use security::{PathSecurityError, validate_upload_path};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
