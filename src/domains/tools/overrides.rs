//! Per-tool routing exceptions.
//!
//! A few remote endpoints do not follow the method-based routing policy.
//! They are listed here, keyed by tool name, and consulted by the argument
//! router before generic partitioning. Adding an exception means adding a
//! table entry.

use serde_json::{Map, Value};

use super::routing::{QueryParams, push_query};

/// Moves or rewrites arguments before generic partitioning.
pub type ArgumentOverride = fn(&mut Map<String, Value>, &mut QueryParams);

const ARGUMENT_OVERRIDES: &[(&str, ArgumentOverride)] = &[
    ("toggle_webhook", webhook_toggle_to_query),
    ("search_artifacts", join_search_lists),
];

/// List-valued filters the artifact search endpoint expects comma-joined.
const SEARCH_LIST_KEYS: &[&str] = &["ids", "categoryIds", "mediaTypes"];

/// Look up the argument override registered for a tool.
pub fn argument_override(tool: &str) -> Option<ArgumentOverride> {
    ARGUMENT_OVERRIDES
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, apply)| *apply)
}

/// The webhook toggle is a PATCH whose parameters live in the query string.
fn webhook_toggle_to_query(args: &mut Map<String, Value>, query: &mut QueryParams) {
    if let Some(kind) = args.shift_remove("type") {
        push_query(query, "type", &kind);
    }
    if let Some(enabled) = args.shift_remove("enabled") {
        let flag = match enabled {
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.to_lowercase(),
            other => other.to_string().to_lowercase(),
        };
        query.push(("enabled".to_string(), flag));
    }
}

fn join_search_lists(args: &mut Map<String, Value>, _query: &mut QueryParams) {
    for key in SEARCH_LIST_KEYS {
        let joined = match args.get(*key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            _ => continue,
        };
        args.insert((*key).to_string(), Value::String(joined));
    }
}

/// Argument carrying the local file path for uploads.
pub const FILE_ARGUMENT: &str = "file_path";

/// Name of the multipart part holding the file.
pub const FILE_FIELD: &str = "file";

/// A tool (or tool + argument value) that is sent as multipart form data.
pub struct UploadRule {
    pub tool: &'static str,
    /// Only applies when this argument has this string value.
    pub when: Option<(&'static str, &'static str)>,
    /// Builds the plain form fields sent next to the file part.
    pub companions: fn(&Map<String, Value>, &str) -> Vec<(String, String)>,
}

const UPLOAD_RULES: &[UploadRule] = &[
    UploadRule {
        tool: "upload_artifact_media",
        when: None,
        companions: artifact_media_fields,
    },
    UploadRule {
        tool: "create_datasource",
        when: Some(("type", "file")),
        companions: datasource_file_fields,
    },
];

/// Find the upload rule matching a call, if any.
pub fn upload_rule(tool: &str, args: &Map<String, Value>) -> Option<&'static UploadRule> {
    UPLOAD_RULES.iter().find(|rule| {
        rule.tool == tool
            && rule.when.is_none_or(|(key, expected)| {
                args.get(key).and_then(Value::as_str) == Some(expected)
            })
    })
}

fn text_of(args: &Map<String, Value>, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn artifact_media_fields(args: &Map<String, Value>, _file_name: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for key in ["artifact_id", "name"] {
        if let Some(value) = text_of(args, key) {
            fields.push((key.to_string(), value));
        }
    }
    fields.push((
        "alt_description".to_string(),
        text_of(args, "alt_description").unwrap_or_default(),
    ));
    fields
}

fn datasource_file_fields(args: &Map<String, Value>, file_name: &str) -> Vec<(String, String)> {
    let mut fields = vec![("type".to_string(), "file".to_string())];
    if let Some(datastore_id) = text_of(args, "datastoreId") {
        fields.push(("datastoreId".to_string(), datastore_id));
    }
    let name = text_of(args, "fileName")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| file_name.to_string());
    fields.push(("fileName".to_string(), name));
    fields.push((
        "custom_id".to_string(),
        text_of(args, "custom_id").unwrap_or_default(),
    ));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_only_named_tools_have_overrides() {
        assert!(argument_override("toggle_webhook").is_some());
        assert!(argument_override("search_artifacts").is_some());
        assert!(argument_override("get_agent").is_none());
    }

    #[test]
    fn test_webhook_toggle_moves_to_query() {
        let mut arguments = args(json!({"type": "whatsapp", "enabled": false}));
        let mut query = QueryParams::new();
        webhook_toggle_to_query(&mut arguments, &mut query);

        assert!(arguments.is_empty());
        assert_eq!(
            query,
            vec![
                ("type".to_string(), "whatsapp".to_string()),
                ("enabled".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_lists_are_comma_joined() {
        let mut arguments = args(json!({
            "ids": ["a", "b"],
            "mediaTypes": ["IMAGE"],
            "categoryIds": "already-joined",
            "limit": 5
        }));
        join_search_lists(&mut arguments, &mut QueryParams::new());

        assert_eq!(arguments["ids"], json!("a,b"));
        assert_eq!(arguments["mediaTypes"], json!("IMAGE"));
        assert_eq!(arguments["categoryIds"], json!("already-joined"));
        assert_eq!(arguments["limit"], json!(5));
    }

    #[test]
    fn test_upload_rule_matching() {
        assert!(upload_rule("upload_artifact_media", &Map::new()).is_some());
        assert!(upload_rule("create_datasource", &args(json!({"type": "file"}))).is_some());
        assert!(upload_rule("create_datasource", &args(json!({"type": "web_page"}))).is_none());
        assert!(upload_rule("create_artifact", &Map::new()).is_none());
    }

    #[test]
    fn test_datasource_companions_default_file_name() {
        let fields = datasource_file_fields(&args(json!({"datastoreId": "ds_1"})), "notes.pdf");
        assert_eq!(
            fields,
            vec![
                ("type".to_string(), "file".to_string()),
                ("datastoreId".to_string(), "ds_1".to_string()),
                ("fileName".to_string(), "notes.pdf".to_string()),
                ("custom_id".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_artifact_media_companions() {
        let fields = artifact_media_fields(
            &args(json!({"artifact_id": "art_1", "name": "Front"})),
            "front.png",
        );
        assert_eq!(
            fields,
            vec![
                ("artifact_id".to_string(), "art_1".to_string()),
                ("name".to_string(), "Front".to_string()),
                ("alt_description".to_string(), String::new()),
            ]
        );
    }
}
