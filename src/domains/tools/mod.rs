//! Tools domain module.
//!
//! Tools are remote API operations exposed to MCP clients. None of them is
//! hand-written: each one is a row in a catalog, and a single generic engine
//! executes them all.
//!
//! ## Architecture
//!
//! - `catalog/` - Tool definitions (embedded JSON tables or OpenAPI documents)
//! - `routing.rs` - Splits arguments into path, query, body, and file upload
//! - `overrides.rs` - Per-tool exceptions to the routing policy
//! - `encoder.rs` - Builds the outbound HTTP request
//! - `dispatcher.rs` - Sends it and normalizes the response
//! - `registry.rs` - Façade used by the server and every transport
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! Add an entry to the matching file in `catalog/data/`. If the endpoint
//! breaks the method-based routing rule, add an entry to `overrides.rs`.

pub mod catalog;
mod dispatcher;
mod encoder;
mod error;
mod overrides;
mod registry;
pub mod router;
pub mod routing;

pub use catalog::{ToolCatalog, ToolDefinition, load_catalog};
pub use dispatcher::Dispatcher;
pub use encoder::{OutboundBody, OutboundRequest, RequestEncoder};
pub use error::{ArgumentError, CallResult, CatalogError, ToolError};
pub use registry::{ToolRegistry, envelope};
pub use router::{build_tool_router, call_until_cancelled};
pub use routing::{ArgumentRouter, FileUpload, RoutedCall};
