//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every catalog entry gets one dynamic route. All routes share the same
//! handler, [`call_until_cancelled`], which forwards to
//! [`ToolRegistry::call`] and races the call against the client's
//! cancellation.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::registry::{ToolRegistry, envelope};

/// Build the tool router with one route per catalog tool.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .list_tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(create_route(tool, registry.clone()))
        })
}

fn create_route<S>(tool: rmcp::model::Tool, registry: Arc<ToolRegistry>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = tool.name.to_string();
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let ct = ctx.request_context.ct.clone();
        let registry = registry.clone();
        let name = name.clone();
        async move { Ok::<_, McpError>(call_until_cancelled(&registry, &name, &args, &ct).await) }
            .boxed()
    })
}

/// Run one tool call, abandoning the in-flight request if `ct` fires first.
pub async fn call_until_cancelled(
    registry: &ToolRegistry,
    name: &str,
    args: &Map<String, Value>,
    ct: &CancellationToken,
) -> CallToolResult {
    tokio::select! {
        result = registry.call(name, args) => envelope(result),
        _ = ct.cancelled() => {
            info!("Tool call {} cancelled by client", name);
            CallToolResult::error(vec![Content::text(format!(
                "Error: call to {} was cancelled",
                name
            ))])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ApiConfig, Config, SecurityConfig};
    use crate::domains::tools::catalog::{EmbeddedCatalog, ToolCatalog};
    use axum::Router;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct TestServer {}

    #[test]
    fn test_registry_matches_router() {
        let registry = Arc::new(ToolRegistry::from_config(&Config::default()).unwrap());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(registry);
        let router_tools = router.list_all();
        let mut router_names: Vec<String> =
            router_tools.iter().map(|t| t.name.to_string()).collect();
        router_names.sort();

        assert_eq!(router_names, registry_names);
        assert!(router_names.contains(&"query_agent".to_string()));
        assert!(router_names.contains(&"move_conversation_to_step".to_string()));
    }

    #[test]
    fn test_route_schema_comes_from_catalog() {
        let registry = Arc::new(ToolRegistry::from_config(&Config::default()).unwrap());
        let router: ToolRouter<TestServer> = build_tool_router(registry);

        let tools = router.list_all();
        let get_agent = tools.iter().find(|t| t.name == "get_agent").unwrap();
        let required = get_agent.input_schema.get("required").unwrap();
        assert_eq!(required, &serde_json::json!(["id"]));
    }

    #[tokio::test]
    async fn test_cancel_abandons_slow_request() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let app = Router::new().fallback(move || {
            let flag = flag.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                flag.store(true, Ordering::SeqCst);
                r#"{"id":"123"}"#
            }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let catalog: Arc<dyn ToolCatalog> = Arc::new(EmbeddedCatalog::load().unwrap());
        let api = ApiConfig {
            base_url: format!("http://{}", addr),
            api_key: None,
        };
        let registry = ToolRegistry::new(catalog, &api, SecurityConfig::default());

        let ct = CancellationToken::new();
        let canceller = ct.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let args = serde_json::json!({"id": "123"}).as_object().cloned().unwrap();
        let started = std::time::Instant::now();
        let result = call_until_cancelled(&registry, "get_agent", &args, &ct).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.content[0].as_text().unwrap().text,
            "Error: call to get_agent was cancelled"
        );
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_finished_call_ignores_later_cancel() {
        let registry = ToolRegistry::from_config(&Config::default()).unwrap();
        let ct = CancellationToken::new();

        let result = call_until_cancelled(&registry, "nonexistent_tool", &Map::new(), &ct).await;
        ct.cancel();

        assert_eq!(result.content[0].as_text().unwrap().text, "Tool nonexistent_tool not found");
    }
}
