//! OpenAPI catalog - tool definitions derived from API-description documents.
//!
//! Every `path` + `method` pair of every document becomes one tool named
//! `{service}_{method}_{normalized path}`. Path and query parameters and the
//! properties of a JSON request body are merged into one input schema, and
//! the location of each property is recorded for the argument router.
//! `operationId` is not used for naming.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::{HttpMethod, ParamLocation, ToolCatalog, ToolDefinition, ToolTable};
use crate::core::config::ApiDocument;
use crate::domains::tools::error::CatalogError;

/// How many `$ref` hops are followed inside one schema.
const MAX_REF_DEPTH: usize = 8;

/// Catalog built from OpenAPI 3 documents.
#[derive(Debug, Clone)]
pub struct OpenApiCatalog {
    table: ToolTable,
}

impl OpenApiCatalog {
    /// Load every configured document from disk.
    pub fn load(documents: &[ApiDocument]) -> Result<Self, CatalogError> {
        if documents.is_empty() {
            return Err(CatalogError::NoDocuments);
        }

        let mut parsed = Vec::with_capacity(documents.len());
        for document in documents {
            let value = read_document(&document.path)?;
            info!(
                "Loaded API description for '{}' from {}",
                document.service,
                document.path.display()
            );
            parsed.push((document.service.as_str(), value));
        }

        Self::from_documents(parsed.iter().map(|(service, value)| (*service, value)))
    }

    /// Build the catalog from already-parsed documents.
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = (&'a str, &'a Value)>,
    ) -> Result<Self, CatalogError> {
        let mut table = ToolTable::default();

        for (service, document) in documents {
            for definition in tools_from_document(service, document)? {
                table.insert(definition, service)?;
            }
        }

        Ok(Self { table })
    }
}

impl ToolCatalog for OpenApiCatalog {
    fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.table.get(name)
    }

    fn all(&self) -> Vec<&ToolDefinition> {
        self.table.values()
    }

    fn source(&self) -> &'static str {
        "openapi"
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}

/// Synthesize a tool name from the service identifier, method, and path.
///
/// `("conversations", GET, "/conversations/{id}/messages")` becomes
/// `conversations_get_conversations_id_messages`.
pub fn derive_tool_name(service: &str, method: HttpMethod, path: &str) -> String {
    let normalized = path
        .trim_matches('/')
        .replace('/', "_")
        .replace(['{', '}'], "");
    let method = method.as_str().to_lowercase();

    if normalized.is_empty() {
        format!("{}_{}", service, method)
    } else {
        format!("{}_{}_{}", service, method, normalized)
    }
}

fn read_document(path: &Path) -> Result<Value, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| CatalogError::parse(origin, e))
    } else {
        serde_json::from_str(&raw).map_err(|e| CatalogError::parse(origin, e))
    }
}

fn tools_from_document(service: &str, document: &Value) -> Result<Vec<ToolDefinition>, CatalogError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| CatalogError::parse(service, "document has no 'paths' object"))?;

    let mut tools = Vec::new();

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let shared_params = item.get("parameters").and_then(Value::as_array);

        for (key, operation) in item {
            let Some(method) = HttpMethod::from_openapi_key(key) else {
                continue;
            };
            let tool = build_tool(service, method, path, shared_params, operation, document);
            debug!("Derived tool {} ({} {})", tool.name, method, path);
            tools.push(tool);
        }
    }

    Ok(tools)
}

/// Accumulates the merged input schema of one operation.
#[derive(Default)]
struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
    locations: BTreeMap<String, ParamLocation>,
}

impl SchemaBuilder {
    fn add(&mut self, name: &str, schema: Value, location: ParamLocation, required: bool) {
        if !self.properties.contains_key(name) {
            self.properties.insert(name.to_string(), schema);
            self.locations.insert(name.to_string(), location);
        }
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }

    fn into_schema(self) -> (Map<String, Value>, BTreeMap<String, ParamLocation>) {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), json!(self.required));
        }
        (schema, self.locations)
    }
}

fn build_tool(
    service: &str,
    method: HttpMethod,
    path: &str,
    shared_params: Option<&Vec<Value>>,
    operation: &Value,
    document: &Value,
) -> ToolDefinition {
    let mut builder = SchemaBuilder::default();

    // Operation-level parameters override path-item ones with the same name.
    let operation_params = operation.get("parameters").and_then(Value::as_array);
    for param in operation_params
        .into_iter()
        .flatten()
        .chain(shared_params.into_iter().flatten())
    {
        add_parameter(&mut builder, param, document);
    }

    if let Some(body_schema) = json_body_schema(operation, document) {
        if let Some(properties) = body_schema.get("properties").and_then(Value::as_object) {
            let body_required: Vec<&str> = body_schema
                .get("required")
                .and_then(Value::as_array)
                .map(|r| r.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            for (name, schema) in properties {
                let required = body_required.contains(&name.as_str());
                builder.add(name, schema.clone(), ParamLocation::Body, required);
            }
        }
    }

    let description = ["summary", "description"]
        .iter()
        .find_map(|key| {
            operation
                .get(*key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", method, path));

    let requires_auth = !matches!(
        operation.get("security"),
        Some(Value::Array(requirements)) if requirements.is_empty()
    );

    let (input_schema, locations) = builder.into_schema();

    ToolDefinition {
        name: derive_tool_name(service, method, path),
        method,
        path: path.to_string(),
        description,
        input_schema,
        parameter_locations: Some(locations),
        requires_auth,
    }
}

fn add_parameter(builder: &mut SchemaBuilder, param: &Value, document: &Value) {
    let param = resolve_ref(param, document);
    let Some(name) = param.get("name").and_then(Value::as_str) else {
        return;
    };
    let location = match param.get("in").and_then(Value::as_str) {
        Some("path") => ParamLocation::Path,
        Some("query") => ParamLocation::Query,
        _ => return,
    };

    let mut schema = param
        .get("schema")
        .map(|s| resolve_schema(s, document, MAX_REF_DEPTH))
        .unwrap_or_else(|| json!({"type": "string"}));
    if let (Some(description), Some(object)) = (param.get("description"), schema.as_object_mut()) {
        object
            .entry("description")
            .or_insert_with(|| description.clone());
    }

    let required = location == ParamLocation::Path
        || param.get("required").and_then(Value::as_bool).unwrap_or(false);
    builder.add(name, schema, location, required);
}

/// Schema of the operation's JSON request body, if it has one.
fn json_body_schema(operation: &Value, document: &Value) -> Option<Value> {
    let body = resolve_ref(operation.get("requestBody")?, document);
    let content = body.get("content")?.as_object()?;

    let (_, media) = content
        .iter()
        .find(|(media_type, _)| is_json_media_type(media_type))?;

    media
        .get("schema")
        .map(|schema| resolve_schema(schema, document, MAX_REF_DEPTH))
}

fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or("").trim();
    essence == "application/json" || essence.ends_with("+json")
}

/// Follow a single local `$ref`, returning the value unchanged otherwise.
fn resolve_ref<'a>(value: &'a Value, document: &'a Value) -> &'a Value {
    value
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| reference.strip_prefix('#'))
        .and_then(|pointer| document.pointer(pointer))
        .unwrap_or(value)
}

/// Resolve local references throughout a schema, up to `depth` hops deep.
fn resolve_schema(schema: &Value, document: &Value, depth: usize) -> Value {
    if depth == 0 {
        return schema.clone();
    }

    match schema {
        Value::Object(object) if object.contains_key("$ref") => {
            let target = resolve_ref(schema, document);
            if std::ptr::eq(target, schema) {
                schema.clone()
            } else {
                resolve_schema(target, document, depth - 1)
            }
        }
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(k, v)| (k.clone(), resolve_schema(v, document, depth)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| resolve_schema(v, document, depth))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn agents_document() -> Value {
        json!({
            "openapi": "3.0.0",
            "paths": {
                "/agents": {
                    "post": {
                        "operationId": "createAgent",
                        "summary": "Create a new AI agent.",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/AgentInput"}
                                }
                            }
                        }
                    },
                    "get": {
                        "parameters": [
                            {"name": "limit", "in": "query", "schema": {"type": "integer"}},
                            {"name": "X-Trace", "in": "header", "schema": {"type": "string"}}
                        ]
                    }
                },
                "/agents/{id}/query": {
                    "parameters": [
                        {"name": "id", "in": "path", "description": "Agent ID", "schema": {"type": "string"}}
                    ],
                    "post": {
                        "description": "Query an agent.",
                        "parameters": [
                            {"$ref": "#/components/parameters/Streaming"}
                        ],
                        "requestBody": {
                            "content": {
                                "application/vnd.api+json; charset=utf-8": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {"query": {"type": "string"}},
                                        "required": ["query"]
                                    }
                                }
                            }
                        }
                    }
                },
                "/agents/models": {
                    "get": {"summary": "List models.", "security": []}
                }
            },
            "components": {
                "schemas": {
                    "AgentInput": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "model": {"$ref": "#/components/schemas/Model"}
                        },
                        "required": ["name"]
                    },
                    "Model": {"type": "string", "enum": ["gpt-4o"]}
                },
                "parameters": {
                    "Streaming": {"name": "streaming", "in": "query", "required": true, "schema": {"type": "boolean"}}
                }
            }
        })
    }

    #[test]
    fn test_derive_tool_name() {
        assert_eq!(
            derive_tool_name("agents", HttpMethod::Post, "/agents"),
            "agents_post_agents"
        );
        assert_eq!(
            derive_tool_name("conversations", HttpMethod::Get, "/conversations/{id}/messages"),
            "conversations_get_conversations_id_messages"
        );
        assert_eq!(
            derive_tool_name("whatsapp", HttpMethod::Post, "/zapi/{instanceId}/{contactPhone}/message/"),
            "whatsapp_post_zapi_instanceId_contactPhone_message"
        );
        assert_eq!(derive_tool_name("health", HttpMethod::Get, "/"), "health_get");
    }

    #[test]
    fn test_operations_become_tools() {
        let doc = agents_document();
        let catalog = OpenApiCatalog::from_documents([("agents", &doc)]).unwrap();

        assert_eq!(catalog.len(), 4);
        let names: Vec<_> = catalog.all().iter().map(|t| t.name.clone()).collect();
        assert!(names.contains(&"agents_post_agents".to_string()));
        assert!(names.contains(&"agents_get_agents".to_string()));
        assert!(names.contains(&"agents_post_agents_id_query".to_string()));
        assert!(names.contains(&"agents_get_agents_models".to_string()));
    }

    #[test]
    fn test_body_schema_is_merged_with_refs_resolved() {
        let doc = agents_document();
        let catalog = OpenApiCatalog::from_documents([("agents", &doc)]).unwrap();

        let create = catalog.lookup("agents_post_agents").unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.description, "Create a new AI agent.");
        assert_eq!(create.input_schema["required"], json!(["name"]));
        assert_eq!(
            create.input_schema["properties"]["model"],
            json!({"type": "string", "enum": ["gpt-4o"]})
        );
        assert_eq!(create.location_of("name"), Some(ParamLocation::Body));
    }

    #[test]
    fn test_parameters_and_body_union_required() {
        let doc = agents_document();
        let catalog = OpenApiCatalog::from_documents([("agents", &doc)]).unwrap();

        let query = catalog.lookup("agents_post_agents_id_query").unwrap();
        assert_eq!(query.description, "Query an agent.");
        assert_eq!(query.input_schema["required"], json!(["streaming", "id", "query"]));
        assert_eq!(
            query.input_schema["properties"]["id"]["description"],
            json!("Agent ID")
        );
        assert_eq!(query.location_of("id"), Some(ParamLocation::Path));
        assert_eq!(query.location_of("streaming"), Some(ParamLocation::Query));
        assert_eq!(query.location_of("query"), Some(ParamLocation::Body));
    }

    #[test]
    fn test_header_parameters_skipped_and_fallback_description() {
        let doc = agents_document();
        let catalog = OpenApiCatalog::from_documents([("agents", &doc)]).unwrap();

        let list = catalog.lookup("agents_get_agents").unwrap();
        assert_eq!(list.description, "GET /agents");
        let properties = list.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("limit"));
        assert!(!properties.contains_key("X-Trace"));
        assert!(list.input_schema.get("required").is_none());
    }

    #[test]
    fn test_empty_security_disables_auth() {
        let doc = agents_document();
        let catalog = OpenApiCatalog::from_documents([("agents", &doc)]).unwrap();

        assert!(!catalog.lookup("agents_get_agents_models").unwrap().requires_auth);
        assert!(catalog.lookup("agents_get_agents").unwrap().requires_auth);
    }

    #[test]
    fn test_duplicate_names_across_documents_fail() {
        let doc = agents_document();
        let result = OpenApiCatalog::from_documents([("agents", &doc), ("agents", &doc)]);

        assert!(matches!(result, Err(CatalogError::DuplicateTool { .. })));
    }

    #[test]
    fn test_document_without_paths_fails() {
        let doc = json!({"openapi": "3.0.0"});
        let result = OpenApiCatalog::from_documents([("empty", &doc)]);

        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_load_yaml_and_json_from_disk() {
        let dir = TempDir::new().unwrap();
        let yaml_path = dir.path().join("crm.yaml");
        fs::write(
            &yaml_path,
            "openapi: 3.0.0\npaths:\n  /crm/entries:\n    post:\n      summary: Log a CRM entry.\n",
        )
        .unwrap();
        let json_path = dir.path().join("agents.json");
        fs::write(&json_path, agents_document().to_string()).unwrap();

        let catalog = OpenApiCatalog::load(&[
            ApiDocument {
                service: "crm".to_string(),
                path: yaml_path,
            },
            ApiDocument {
                service: "agents".to_string(),
                path: json_path,
            },
        ])
        .unwrap();

        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.lookup("crm_post_crm_entries").unwrap().description,
            "Log a CRM entry."
        );
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let result = OpenApiCatalog::load(&[ApiDocument {
            service: "agents".to_string(),
            path: "/nonexistent/agents.json".into(),
        }]);

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
