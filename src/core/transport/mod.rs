//! Transport layer for the MCP server.
//!
//! Two transports are available:
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **HTTP**: JSON-RPC over POST requests - feature: `http`
//!
//! Both hand every message to the same [`McpServer`](crate::core::McpServer),
//! so tools and prompts behave identically on either.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
