//! Embedded catalog - tool tables compiled into the binary.
//!
//! Each API group lives in its own JSON file under `data/`. Adding a tool is
//! a data change; the dispatcher never needs to know about it.

use tracing::debug;

use super::{ToolCatalog, ToolDefinition, ToolTable};
use crate::domains::tools::error::CatalogError;

/// (group, JSON array of tool definitions)
const GROUPS: &[(&str, &str)] = &[
    ("agents", include_str!("data/agents.json")),
    ("conversations", include_str!("data/conversations.json")),
    ("artifacts", include_str!("data/artifacts.json")),
    ("datastores", include_str!("data/datastores.json")),
    ("crm", include_str!("data/crm.json")),
];

/// Catalog backed by the definitions shipped with the server.
#[derive(Debug, Clone)]
pub struct EmbeddedCatalog {
    table: ToolTable,
}

impl EmbeddedCatalog {
    pub fn load() -> Result<Self, CatalogError> {
        let mut table = ToolTable::default();

        for (group, raw) in GROUPS {
            let definitions: Vec<ToolDefinition> =
                serde_json::from_str(raw).map_err(|e| CatalogError::parse(*group, e))?;
            debug!("Embedded group '{}': {} tools", group, definitions.len());

            for definition in definitions {
                table.insert(definition, group)?;
            }
        }

        Ok(Self { table })
    }
}

impl ToolCatalog for EmbeddedCatalog {
    fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.table.get(name)
    }

    fn all(&self) -> Vec<&ToolDefinition> {
        self.table.values()
    }

    fn source(&self) -> &'static str {
        "embedded"
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}
