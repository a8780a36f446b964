//! MCP Server implementation and lifecycle management.
//!
//! The server handler delegates to two domains:
//!
//! - tools: one rmcp route per catalog entry, built in
//!   `domains/tools/router.rs` from the shared [`ToolRegistry`]
//! - prompts: the canned workflows served by [`PromptService`]
//!
//! Adding a tool is a catalog change and never touches this file.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::RequestContext,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result as CoreResult;
use crate::domains::{
    prompts::PromptService,
    tools::{ToolError, ToolRegistry, build_tool_router, envelope},
};

const INSTRUCTIONS: &str = "Tools call the Chatvolt API: agents, conversations, \
    artifacts, datastores, and the CRM. Failed calls return text starting with \
    'Error:' or 'API Error:'. Prompts describe multi-step workflows that chain tools.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Catalog and dispatch engine shared by every transport.
    registry: Arc<ToolRegistry>,

    /// Service for handling prompt-related requests.
    prompt_service: Arc<PromptService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server, loading the configured tool catalog.
    pub fn new(config: Config) -> CoreResult<Self> {
        let registry = Arc::new(ToolRegistry::from_config(&config)?);
        Ok(Self::with_registry(config, registry))
    }

    /// Create a new MCP server around an existing registry.
    pub fn with_registry(config: Config, registry: Arc<ToolRegistry>) -> Self {
        let config = Arc::new(config);
        let prompt_service = Arc::new(PromptService::new());

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config,
            registry,
            prompt_service,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Usage notes sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Tool failures are part of the result (`isError: true`); only a
    /// result that cannot be serialized is an `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let result = envelope(self.registry.call_tool(name, arguments).await);
        serde_json::to_value(result).map_err(|e| e.to_string())
    }

    /// List all available prompts (for HTTP transport).
    pub async fn list_prompts(&self) -> Vec<serde_json::Value> {
        let prompts = self.prompt_service.list_prompts().await;

        prompts
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "title": p.title,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    /// Get a prompt by name (for HTTP transport).
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| v.as_object().map(string_arguments));

        match self.prompt_service.get_prompt(name, args).await {
            Ok(result) => Ok(serde_json::json!({
                "description": result.description,
                "messages": result.messages
            })),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Keep the string-valued prompt arguments; other values are ignored.
fn string_arguments(map: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// ServerHandler implementation.
///
/// Tool calls go through the rmcp router. Names it does not know get the
/// same "not found" result as the HTTP transport rather than a protocol
/// error.
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, context))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            return Ok(envelope(Err(ToolError::unknown_tool(request.name.to_string()))));
        }
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        let prompts = self.prompt_service.list_prompts().await;
        Ok(ListPromptsResult {
            prompts,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.as_ref().map(string_arguments);
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .await
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}
