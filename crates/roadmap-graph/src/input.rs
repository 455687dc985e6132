//! Roadmap documents read from disk.
//!
//! A document bundles the planner's two tables:
//!
//! ```json
//! {
//!   "initiatives": [
//!     { "id": "a", "name": "Discovery", "start_date": "2024-01-01", "end_date": "2024-01-31" }
//!   ],
//!   "systems": [{ "id": "crm", "name": "CRM" }]
//! }
//! ```
//!
//! Either table may be omitted.

use crate::domain::{SupportingEntity, WorkItem};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Work items and supporting entities from one planner export
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoadmapDocument {
    /// Work items
    #[serde(default)]
    pub initiatives: Vec<WorkItem>,

    /// Supporting entities
    #[serde(default)]
    pub systems: Vec<SupportingEntity>,
}

impl RoadmapDocument {
    /// Read a document from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            initiatives = document.initiatives.len(),
            systems = document.systems.len(),
            "Loaded roadmap document"
        );
        Ok(document)
    }

    /// Parse a document from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Keep only the work items that belong to `scenario_id`.
    ///
    /// Supporting entities are shared by all scenarios and are left alone.
    #[must_use]
    pub fn filter_scenario(mut self, scenario_id: &str) -> Self {
        self.initiatives
            .retain(|item| item.scenario_id.as_deref() == Some(scenario_id));
        self
    }
}
