//! Tool Registry - the single entry point for listing and calling tools.
//!
//! A call flows through four stages:
//! catalog lookup, argument routing, request encoding, and dispatch.
//! Every failure is turned into a [`ToolError`]; nothing here panics or
//! aborts the serving loop.

use std::sync::Arc;

use reqwest::Client;
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::catalog::{ToolCatalog, load_catalog};
use super::dispatcher::Dispatcher;
use super::encoder::RequestEncoder;
use super::error::{ArgumentError, CallResult, CatalogError, ToolError};
use super::routing::ArgumentRouter;
use crate::core::config::{ApiConfig, Config, SecurityConfig};

/// Tool registry - catalog plus the machinery to execute its tools.
pub struct ToolRegistry {
    catalog: Arc<dyn ToolCatalog>,
    router: ArgumentRouter,
    encoder: RequestEncoder,
    dispatcher: Dispatcher,
}

impl ToolRegistry {
    /// Create a registry over an already loaded catalog.
    pub fn new(catalog: Arc<dyn ToolCatalog>, api: &ApiConfig, security: SecurityConfig) -> Self {
        Self {
            catalog,
            router: ArgumentRouter::new(security),
            encoder: RequestEncoder::new(api),
            dispatcher: Dispatcher::new(Client::new()),
        }
    }

    /// Load the configured catalog and build a registry around it.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let catalog = load_catalog(&config.catalog)?;
        Ok(Self::new(catalog, &config.api, config.security.clone()))
    }

    /// Get all tool names, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .catalog
            .all()
            .into_iter()
            .map(|def| def.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both the rmcp router and the HTTP transport list tools from here.
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.catalog.all().into_iter().map(|def| def.to_tool()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Execute a tool call.
    ///
    /// `arguments` must be a JSON object or `null`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallResult {
        let arguments = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ArgumentError::malformed(format!(
                    "expected an object, got {}",
                    other
                ))
                .into());
            }
        };
        self.call(name, &arguments).await
    }

    /// Execute a tool call with an argument map.
    pub async fn call(&self, name: &str, arguments: &Map<String, Value>) -> CallResult {
        let Some(definition) = self.catalog.lookup(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown_tool(name));
        };

        info!("Calling tool {} ({} {})", name, definition.method, definition.path);

        let routed = self.router.route(definition, arguments).inspect_err(|e| {
            warn!("Tool {} rejected its arguments: {}", name, e);
        })?;
        let request = self.encoder.encode(definition, routed)?;
        self.dispatcher.send(request).await
    }
}

/// Wrap a call outcome in the MCP result envelope.
///
/// Success carries the raw response text. Failures carry the prefixed
/// message with `isError` set.
pub fn envelope(result: CallResult) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => CallToolResult::error(vec![Content::text(err.envelope_text())]),
    }
}
