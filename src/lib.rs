//! Chatvolt MCP Server Library
//!
//! Exposes the Chatvolt REST API (agents, conversations, artifacts,
//! datastores, CRM) as Model Context Protocol tools, plus a few workflow
//! prompts that chain them.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler, transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: catalog-driven tools and the generic dispatch engine
//!   - **prompts**: workflow prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use chatvolt_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
