//! Tool definition types shared by every catalog backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::{Deserialize, Serialize};

/// HTTP methods a tool may be dispatched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a method key as it appears in an OpenAPI path item.
    pub fn from_openapi_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether arguments without an explicit location go to the query string.
    pub fn routes_to_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a declared parameter travels in the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

fn default_requires_auth() -> bool {
    true
}

/// One remote operation exposed as a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,

    /// HTTP method used for the call.
    pub method: HttpMethod,

    /// Path template with `{var}` placeholders.
    pub path: String,

    /// Description shown to clients.
    pub description: String,

    /// JSON-Schema object describing the arguments.
    pub input_schema: JsonObject,

    /// Explicit locations for parameters, when the source knows them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_locations: Option<BTreeMap<String, ParamLocation>>,

    /// Whether the bearer token is attached.
    #[serde(default = "default_requires_auth")]
    pub requires_auth: bool,
}

impl ToolDefinition {
    /// Declared location of a parameter, if any.
    pub fn location_of(&self, key: &str) -> Option<ParamLocation> {
        self.parameter_locations
            .as_ref()
            .and_then(|locations| locations.get(key).copied())
    }

    /// Create a Tool model for this definition (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema.clone()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults() {
        let json = r#"{
            "name": "get_agent",
            "method": "GET",
            "path": "/agents/{id}",
            "description": "Retrieve details of a specific agent.",
            "input_schema": {"type": "object", "properties": {"id": {"type": "string"}}}
        }"#;
        let def: ToolDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.method, HttpMethod::Get);
        assert!(def.requires_auth);
        assert!(def.parameter_locations.is_none());
        assert_eq!(def.location_of("id"), None);
    }

    #[test]
    fn test_to_tool_carries_schema() {
        let json = r#"{
            "name": "delete_crm_step",
            "method": "DELETE",
            "path": "/crm/step",
            "description": "Delete a CRM step.",
            "input_schema": {"type": "object", "required": ["id"]},
            "parameter_locations": {"id": "body"}
        }"#;
        let def: ToolDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.location_of("id"), Some(ParamLocation::Body));

        let tool = def.to_tool();
        assert_eq!(tool.name, "delete_crm_step");
        assert_eq!(tool.input_schema.get("required").unwrap(), &serde_json::json!(["id"]));
    }

    #[test]
    fn test_method_routing_policy() {
        assert!(HttpMethod::Get.routes_to_query());
        assert!(HttpMethod::Delete.routes_to_query());
        assert!(!HttpMethod::Post.routes_to_query());
        assert!(!HttpMethod::Put.routes_to_query());
        assert!(!HttpMethod::Patch.routes_to_query());
        assert_eq!(HttpMethod::from_openapi_key("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_openapi_key("options"), None);
    }
}
