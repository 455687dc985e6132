//! CLI command implementations.

mod display;

pub mod critical_path;
pub mod edges;
pub mod layout;
pub mod types;

use std::path::Path;

use roadmap_graph::{
    EngineConfig, GraphModelBuilder, GraphSnapshot, NodeKindFilter, RoadmapDocument,
};

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Engine tunables (defaults unless `--config` was given)
    pub config: EngineConfig,
    /// Node kinds to include
    pub filter: NodeKindFilter,
    /// Keep only initiatives of this scenario
    pub scenario: Option<String>,
}

impl Context {
    /// Build the context, loading the configuration file if one was given.
    pub fn new(
        config_path: Option<&Path>,
        filter: NodeKindFilter,
        scenario: Option<String>,
    ) -> roadmap_graph::Result<Self> {
        let config = match config_path {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            config,
            filter,
            scenario,
        })
    }

    /// Read a roadmap document, applying the scenario filter.
    pub fn load_document(&self, input: &Path) -> roadmap_graph::Result<RoadmapDocument> {
        let document = RoadmapDocument::load(input)?;
        Ok(match &self.scenario {
            Some(scenario) => document.filter_scenario(scenario),
            None => document,
        })
    }

    /// Read a roadmap document and build its graph snapshot.
    pub fn load_snapshot(&self, input: &Path) -> roadmap_graph::Result<GraphSnapshot> {
        let document = self.load_document(input)?;
        Ok(GraphModelBuilder::new(self.config.inference).build(
            &document.initiatives,
            &document.systems,
            self.filter,
        ))
    }
}
