//! Argument router - partitions call arguments into path, query, and body.
//!
//! Routing is deterministic: the same definition and arguments always
//! produce the same [`RoutedCall`]. The only outside state consulted is the
//! filesystem, to check that an upload file exists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use tracing::debug;

use super::catalog::{ParamLocation, ToolDefinition};
use super::error::ArgumentError;
use super::overrides::{self, FILE_ARGUMENT, FILE_FIELD};
use crate::core::config::SecurityConfig;
use crate::core::security::validate_upload_path;

/// Query pairs in the order they are appended to the URL.
pub type QueryParams = Vec<(String, String)>;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Arguments of one call, split by destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCall {
    /// Path template with every placeholder substituted.
    pub resolved_path: String,
    pub query_params: QueryParams,
    pub body_fields: Map<String, Value>,
    pub file_upload: Option<FileUpload>,
}

/// A local file sent as multipart form data.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    /// Name of the multipart part holding the file.
    pub field_name: String,
    pub local_path: PathBuf,
    /// File name reported in the part's content disposition.
    pub file_name: String,
    /// Plain form fields sent next to the file.
    pub metadata: Vec<(String, String)>,
}

/// Placeholders of a path template, in order of first appearance.
pub fn placeholders(path: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for capture in PLACEHOLDER.captures_iter(path) {
        if let Some(name) = capture.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Append a value to the query string.
///
/// `null` is dropped, arrays repeat the key once per element, objects are
/// sent as compact JSON.
pub fn push_query(query: &mut QueryParams, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                push_query(query, key, item);
            }
        }
        Value::String(s) => query.push((key.to_string(), s.clone())),
        other => query.push((key.to_string(), other.to_string())),
    }
}

/// Routes arguments for any catalog tool.
#[derive(Debug, Clone, Default)]
pub struct ArgumentRouter {
    security: SecurityConfig,
}

impl ArgumentRouter {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }

    /// Split `arguments` into the parts of an outbound request for `definition`.
    pub fn route(
        &self,
        definition: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<RoutedCall, ArgumentError> {
        let mut args = arguments.clone();
        let resolved_path = substitute_path(definition, &mut args)?;

        if let Some(rule) = overrides::upload_rule(&definition.name, &args) {
            let upload = self.prepare_upload(definition, &mut args, rule.companions)?;
            if !args.is_empty() {
                debug!(
                    "{}: arguments not sent with upload: {:?}",
                    definition.name,
                    args.keys().collect::<Vec<_>>()
                );
            }
            return Ok(RoutedCall {
                resolved_path,
                query_params: QueryParams::new(),
                body_fields: Map::new(),
                file_upload: Some(upload),
            });
        }

        let mut query_params = QueryParams::new();
        if let Some(apply) = overrides::argument_override(&definition.name) {
            apply(&mut args, &mut query_params);
        }

        let mut body_fields = Map::new();
        for (key, value) in args {
            let to_query = match definition.location_of(&key) {
                Some(location) => location == ParamLocation::Query,
                None => definition.method.routes_to_query(),
            };
            if to_query {
                push_query(&mut query_params, &key, &value);
            } else {
                body_fields.insert(key, value);
            }
        }

        Ok(RoutedCall {
            resolved_path,
            query_params,
            body_fields,
            file_upload: None,
        })
    }

    fn prepare_upload(
        &self,
        definition: &ToolDefinition,
        args: &mut Map<String, Value>,
        companions: fn(&Map<String, Value>, &str) -> Vec<(String, String)>,
    ) -> Result<FileUpload, ArgumentError> {
        let raw_path = match args.shift_remove(FILE_ARGUMENT) {
            Some(Value::String(path)) if !path.trim().is_empty() => path,
            _ => {
                return Err(ArgumentError::MissingFilePath {
                    tool: definition.name.clone(),
                    argument: FILE_ARGUMENT.to_string(),
                });
            }
        };

        let local_path = validate_upload_path(&raw_path, &self.security)?;
        let file_name = Path::new(&raw_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_FIELD.to_string());

        let metadata = companions(args, &file_name);
        for (key, _) in &metadata {
            args.shift_remove(key);
        }

        Ok(FileUpload {
            field_name: FILE_FIELD.to_string(),
            local_path,
            file_name,
            metadata,
        })
    }
}

/// Substitute every placeholder, consuming the matching arguments.
///
/// Values are collected first and the template is rewritten in one pass, so
/// a value that looks like a placeholder is never expanded again.
fn substitute_path(
    definition: &ToolDefinition,
    args: &mut Map<String, Value>,
) -> Result<String, ArgumentError> {
    let mut values: HashMap<&str, String> = HashMap::new();

    for name in placeholders(&definition.path) {
        let text = match args.shift_remove(name) {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Array(_) | Value::Object(_)) => {
                return Err(ArgumentError::UnsupportedPathValue {
                    name: name.to_string(),
                });
            }
            Some(Value::Null) | None => {
                return Err(ArgumentError::MissingPathParameter {
                    tool: definition.name.clone(),
                    name: name.to_string(),
                });
            }
        };
        values.insert(name, text);
    }

    let path = PLACEHOLDER.replace_all(&definition.path, |caps: &Captures<'_>| {
        values.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
    });
    Ok(path.into_owned())
}
