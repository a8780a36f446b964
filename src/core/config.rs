//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! a `.env` file, the process environment, and defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{Level, info, warn};

/// Default base URL of the remote API.
pub const DEFAULT_BASE_URL: &str = "https://api.chatvolt.ai";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Remote API endpoint and credentials.
    pub api: ApiConfig,

    /// Which tool catalog backend to load at startup.
    pub catalog: CatalogConfig,

    /// Security settings for local files read during uploads.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Kept separate from [`Config::from_env`] so logging can be set up
    /// before the rest of the configuration is loaded.
    pub fn from_env() -> Self {
        let mut logging = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = !matches!(timestamps.to_lowercase().as_str(), "false" | "0");
        }
        logging
    }

    /// The configured level; unknown names fall back to `INFO`.
    pub fn tracing_level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Remote API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every tool path is appended to.
    pub base_url: String,

    /// Bearer token sent with every call that requires authentication.
    pub api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// Catalog backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub source: CatalogSource,
}

/// The two supported ways of building the tool catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogSource {
    /// Tool definitions compiled into the binary.
    #[default]
    Embedded,

    /// Tool definitions derived from OpenAPI documents on disk.
    OpenApi { documents: Vec<ApiDocument> },
}

/// One API-description document and the service identifier its tools are
/// prefixed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDocument {
    pub service: String,
    pub path: PathBuf,
}

impl ApiDocument {
    /// Parse a `service=path` pair.
    pub fn parse(entry: &str) -> Option<Self> {
        let (service, path) = entry.split_once('=')?;
        let service = service.trim();
        let path = path.trim();
        if service.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self {
            service: service.to_string(),
            path: PathBuf::from(path),
        })
    }
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory upload files must live under.
    /// If None, any existing file may be uploaded.
    pub root_path: Option<PathBuf>,

    /// Whether to allow symlinks in path validation.
    /// If false, symlinks pointing outside the root are rejected.
    pub allow_symlinks: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "chatvolt-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
            catalog: CatalogConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// API settings use the `CHATVOLT_` prefix, everything else `MCP_`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("CHATVOLT_BASE_URL") {
            config.api.base_url = base_url;
        }

        match std::env::var("CHATVOLT_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.api.api_key = Some(api_key);
                info!("API key loaded from environment");
            }
            _ => warn!(
                "CHATVOLT_API_KEY not found in environment variables. \
                 Calls will be sent unauthenticated and rejected by the API."
            ),
        }

        config.catalog.source = catalog_source_from_env();

        if let Ok(root_path) = std::env::var("MCP_UPLOAD_ROOT") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Upload root set to {:?}", config.security.root_path);
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        config
    }
}

fn catalog_source_from_env() -> CatalogSource {
    let source = std::env::var("MCP_CATALOG_SOURCE")
        .unwrap_or_default()
        .to_lowercase();

    match source.as_str() {
        "" | "embedded" => CatalogSource::Embedded,
        "openapi" => {
            let raw = std::env::var("MCP_OPENAPI_DOCUMENTS").unwrap_or_default();
            let mut documents = Vec::new();
            for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
                match ApiDocument::parse(entry) {
                    Some(doc) => documents.push(doc),
                    None => warn!("Ignoring malformed MCP_OPENAPI_DOCUMENTS entry: {}", entry),
                }
            }
            CatalogSource::OpenApi { documents }
        }
        other => {
            warn!("Unknown MCP_CATALOG_SOURCE '{}', using embedded catalog", other);
            CatalogSource::Embedded
        }
    }
}
