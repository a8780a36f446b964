//! Tool-specific error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Outcome of one tool call: the raw response body on success.
pub type CallResult = Result<String, ToolError>;

/// Errors that can occur while dispatching a tool call.
///
/// Every variant is reported back to the caller as text; none of them
/// terminate the serving loop.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not in the catalog.
    #[error("Tool {0} not found")]
    UnknownTool(String),

    /// The arguments could not be routed into a request.
    #[error(transparent)]
    InvalidArguments(#[from] ArgumentError),

    /// The remote API answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("{0}")]
    Transport(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "api" error.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a new "transport" error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// The text returned to the calling agent.
    ///
    /// The prefix identifies the failure class so the agent can tell bad
    /// arguments from remote failures.
    pub fn envelope_text(&self) -> String {
        match self {
            Self::UnknownTool(name) => format!("Tool {} not found", name),
            Self::InvalidArguments(ArgumentError::FileNotFound { path }) => {
                format!("File not found: {}", path)
            }
            Self::InvalidArguments(e) => format!("Error: {}", e),
            Self::Api { body, .. } => format!("API Error: {}", body),
            Self::Transport(msg) => format!("Error: {}", msg),
        }
    }
}

/// Errors raised while routing arguments into path, query, and body.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// A `{var}` in the path template has no matching argument.
    #[error("Missing required path parameter '{name}' for tool {tool}")]
    MissingPathParameter { tool: String, name: String },

    /// A path parameter was given an object or array.
    #[error("Path parameter '{name}' must be a string, number, or boolean")]
    UnsupportedPathValue { name: String },

    /// An upload tool was called without a file path.
    #[error("Missing '{argument}' argument for upload tool {tool}")]
    MissingFilePath { tool: String, argument: String },

    /// The upload file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The upload file exists but may not be read.
    #[error("Upload file rejected: {0}")]
    RejectedPath(PathSecurityError),

    /// The argument bag is not a JSON object, or a value has the wrong shape.
    #[error("Malformed arguments: {0}")]
    Malformed(String),
}

impl ArgumentError {
    /// Create a new "malformed" error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<PathSecurityError> for ArgumentError {
    fn from(err: PathSecurityError) -> Self {
        match err {
            PathSecurityError::PathNotFound { path } => Self::FileNotFound {
                path: path.display().to_string(),
            },
            other => Self::RejectedPath(other),
        }
    }
}

/// Errors raised while loading a tool catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog document could not be read from disk.
    #[error("Cannot read catalog document '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog document is not valid JSON/YAML or has the wrong shape.
    #[error("Cannot parse catalog document '{origin}': {message}")]
    Parse { origin: String, message: String },

    /// Two definitions share a name.
    #[error("Duplicate tool name '{name}' (defined again by {origin})")]
    DuplicateTool { name: String, origin: String },

    /// The selected backend has nothing to load.
    #[error("No API-description documents configured for the openapi catalog")]
    NoDocuments,
}

impl CatalogError {
    /// Create a new "parse" error.
    pub fn parse(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}
