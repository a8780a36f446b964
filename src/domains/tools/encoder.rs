//! Request encoder - turns a routed call into a fully described HTTP request.
//!
//! Encoding performs no I/O. The resulting [`OutboundRequest`] is a plain
//! value the dispatcher sends, which keeps header and URL rules testable.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use super::catalog::{HttpMethod, ToolDefinition};
use super::error::ToolError;
use super::routing::{FileUpload, QueryParams, RoutedCall};
use crate::core::config::ApiConfig;

/// Timeout for ordinary JSON calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for multipart uploads.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    None,
    Json(Value),
    Multipart(FileUpload),
}

/// Everything needed to send one request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub query: QueryParams,
    pub body: OutboundBody,
    pub timeout: Duration,
}

/// Builds outbound requests against one API base URL.
#[derive(Debug, Clone)]
pub struct RequestEncoder {
    base_url: String,
    api_key: Option<String>,
}

impl RequestEncoder {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode a routed call.
    ///
    /// The JSON body is sent only when there are body fields. Multipart
    /// uploads leave `Content-Type` to the HTTP client so it can add the
    /// boundary.
    pub fn encode(
        &self,
        definition: &ToolDefinition,
        routed: RoutedCall,
    ) -> Result<OutboundRequest, ToolError> {
        let mut headers = HeaderMap::new();

        if definition.requires_auth {
            if let Some(key) = &self.api_key {
                let value = HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|_| ToolError::transport("API key contains invalid header characters"))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let (body, timeout) = match routed.file_upload {
            Some(upload) => (OutboundBody::Multipart(upload), UPLOAD_TIMEOUT),
            None => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                let body = if routed.body_fields.is_empty() {
                    OutboundBody::None
                } else {
                    OutboundBody::Json(Value::Object(routed.body_fields))
                };
                (body, REQUEST_TIMEOUT)
            }
        };

        Ok(OutboundRequest {
            method: definition.method,
            url: format!("{}{}", self.base_url, routed.resolved_path),
            headers,
            query: routed.query_params,
            body,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::catalog::{EmbeddedCatalog, ToolCatalog};
    use crate::domains::tools::routing::ArgumentRouter;
    use serde_json::{Map, json};
    use std::path::PathBuf;

    fn encoder(api_key: Option<&str>) -> RequestEncoder {
        RequestEncoder::new(&ApiConfig {
            base_url: "https://api.example.com/".to_string(),
            api_key: api_key.map(String::from),
        })
    }

    fn encode(tool: &str, arguments: Value, api_key: Option<&str>) -> OutboundRequest {
        let catalog = EmbeddedCatalog::load().unwrap();
        let definition = catalog.lookup(tool).unwrap();
        let routed = ArgumentRouter::default()
            .route(definition, arguments.as_object().unwrap())
            .unwrap();
        encoder(api_key).encode(definition, routed).unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(encoder(None).base_url(), "https://api.example.com");
    }

    #[test]
    fn test_get_has_no_body() {
        let request = encode("get_agent", json!({"id": "123"}), Some("secret"));

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://api.example.com/agents/123");
        assert_eq!(request.body, OutboundBody::None);
        assert_eq!(request.timeout, REQUEST_TIMEOUT);
        assert_eq!(request.headers[AUTHORIZATION], "Bearer secret");
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_post_carries_json_body() {
        let request = encode("create_agent", json!({"name": "Helper"}), Some("secret"));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.example.com/agents");
        assert_eq!(request.body, OutboundBody::Json(json!({"name": "Helper"})));
    }

    #[test]
    fn test_missing_key_sends_no_auth() {
        let request = encode("create_agent", json!({"name": "Helper"}), None);
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_public_tool_sends_no_auth() {
        let request = encode("get_models", json!({}), Some("secret"));
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_multipart_has_upload_timeout() {
        let catalog = EmbeddedCatalog::load().unwrap();
        let definition = catalog.lookup("upload_artifact_media").unwrap();
        let routed = RoutedCall {
            resolved_path: "/artifacts/media/upload".to_string(),
            query_params: QueryParams::new(),
            body_fields: Map::new(),
            file_upload: Some(FileUpload {
                field_name: "file".to_string(),
                local_path: PathBuf::from("/tmp/front.png"),
                file_name: "front.png".to_string(),
                metadata: vec![],
            }),
        };

        let request = encoder(Some("secret")).encode(definition, routed).unwrap();
        assert_eq!(request.timeout, UPLOAD_TIMEOUT);
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert!(matches!(request.body, OutboundBody::Multipart(_)));
    }

    #[test]
    fn test_invalid_key_is_reported() {
        let catalog = EmbeddedCatalog::load().unwrap();
        let definition = catalog.lookup("get_models").unwrap().clone();
        let definition = ToolDefinition {
            requires_auth: true,
            ..definition
        };
        let routed = RoutedCall {
            resolved_path: "/agents/models".to_string(),
            query_params: QueryParams::new(),
            body_fields: Map::new(),
            file_upload: None,
        };

        let err = encoder(Some("bad\nkey")).encode(&definition, routed).unwrap_err();
        assert!(matches!(err, ToolError::Transport(_)));
    }
}
