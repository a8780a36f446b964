//! Tool catalog - the read-only table of tools the dispatcher consumes.
//!
//! Two backends implement [`ToolCatalog`]:
//!
//! - [`EmbeddedCatalog`] - definitions compiled into the binary from the
//!   JSON files under `data/`
//! - [`OpenApiCatalog`] - definitions derived from OpenAPI documents
//!
//! The backend is chosen once at startup from [`CatalogConfig`]; the catalog
//! is never mutated afterwards.

mod definition;
mod embedded;
mod openapi;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

pub use definition::{HttpMethod, ParamLocation, ToolDefinition};
pub use embedded::EmbeddedCatalog;
pub use openapi::{OpenApiCatalog, derive_tool_name};

use super::error::CatalogError;
use crate::core::config::{CatalogConfig, CatalogSource};

/// Read-only lookup of tool definitions by name.
pub trait ToolCatalog: Send + Sync {
    /// Find a tool by name.
    fn lookup(&self, name: &str) -> Option<&ToolDefinition>;

    /// All tools, in no particular order.
    fn all(&self) -> Vec<&ToolDefinition>;

    /// Short label for logging.
    fn source(&self) -> &'static str;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name-keyed storage shared by both backends. Rejects duplicate names.
#[derive(Debug, Default, Clone)]
pub(crate) struct ToolTable {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolTable {
    pub(crate) fn insert(
        &mut self,
        definition: ToolDefinition,
        origin: &str,
    ) -> Result<(), CatalogError> {
        if self.tools.contains_key(&definition.name) {
            return Err(CatalogError::DuplicateTool {
                name: definition.name,
                origin: origin.to_string(),
            });
        }
        self.tools.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub(crate) fn values(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.tools.len()
    }
}

/// Load the catalog backend selected by the configuration.
pub fn load_catalog(config: &CatalogConfig) -> Result<Arc<dyn ToolCatalog>, CatalogError> {
    let catalog: Arc<dyn ToolCatalog> = match &config.source {
        CatalogSource::Embedded => Arc::new(EmbeddedCatalog::load()?),
        CatalogSource::OpenApi { documents } => Arc::new(OpenApiCatalog::load(documents)?),
    };

    info!(
        "Loaded {} tools from the {} catalog",
        catalog.len(),
        catalog.source()
    );

    Ok(catalog)
}
