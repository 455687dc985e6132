//! Engine configuration.
//!
//! Tunables for edge inference, the critical-path search and the three
//! layout strategies. Loaded from YAML; every section and field is optional
//! and falls back to the defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Earliest overlap (negative gap) that still links two work items.
pub const DEFAULT_MIN_GAP_DAYS: f64 = -30.0;

/// Longest idle gap that still links two work items.
pub const DEFAULT_MAX_GAP_DAYS: f64 = 90.0;

/// Default bound for the fallback critical-path search on cyclic graphs.
pub const DEFAULT_MAX_SEARCH_DEPTH: usize = 256;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge inference window
    pub inference: InferenceConfig,

    /// Critical-path search
    pub critical_path: CriticalPathConfig,

    /// Force-directed simulation
    pub force: ForceConfig,

    /// Ranked layout spacing
    pub hierarchical: HierarchicalConfig,

    /// Circular layout
    pub circular: CircularConfig,

    /// Seed for reproducible force layouts (OS entropy when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Gap window (in days) within which adjacent work items are linked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Most negative gap (overlap) still linked
    pub min_gap_days: f64,
    /// Largest positive gap still linked
    pub max_gap_days: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_gap_days: DEFAULT_MIN_GAP_DAYS,
            max_gap_days: DEFAULT_MAX_GAP_DAYS,
        }
    }
}

/// Critical-path search settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalPathConfig {
    /// Maximum path length explored when the graph contains a cycle
    pub max_search_depth: usize,
}

impl Default for CriticalPathConfig {
    fn default() -> Self {
        Self {
            max_search_depth: DEFAULT_MAX_SEARCH_DEPTH,
        }
    }
}

/// Force-directed simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Magnitude of pairwise repulsion
    pub charge_strength: f64,
    /// Rest length of edge springs
    pub link_distance: f64,
    /// Spring stiffness
    pub link_strength: f64,
    /// Pull of every node toward the canvas centre
    pub center_strength: f64,
    /// Node radius used for collision resolution
    pub node_radius: f64,
    /// Fraction of velocity lost each tick
    pub velocity_decay: f64,
    /// Fraction of the cooling factor lost each tick
    pub alpha_decay: f64,
    /// Kinetic energy below which the simulation is converged
    pub energy_threshold: f64,
    /// Half-width of the random square nodes start in
    pub initial_jitter: f64,
    /// Tick cap for synchronous runs
    pub max_ticks: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: 900.0,
            link_distance: 120.0,
            link_strength: 0.08,
            center_strength: 0.02,
            node_radius: 18.0,
            velocity_decay: 0.4,
            alpha_decay: 0.0228,
            energy_threshold: 0.05,
            initial_jitter: 50.0,
            max_ticks: 1000,
        }
    }
}

/// Ranked layout spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalConfig {
    /// Minimum horizontal distance between ranks
    pub rank_spacing: f64,
    /// Minimum vertical distance between nodes of one rank
    pub node_spacing: f64,
    /// Margin kept clear around the canvas edge
    pub padding: f64,
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            rank_spacing: 160.0,
            node_spacing: 70.0,
            padding: 40.0,
        }
    }
}

/// Circular layout settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularConfig {
    /// Circle radius as a fraction of the smaller canvas dimension
    pub radius_fraction: f64,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            radius_fraction: 0.35,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text and validate it
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Replace every invalid section with its defaults.
    ///
    /// Engine constructors call this so that hand-built configurations can
    /// never drive a layout into NaN coordinates or a panic.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            inference: self.inference.sanitized(),
            critical_path: self.critical_path.sanitized(),
            force: self.force.sanitized(),
            hierarchical: self.hierarchical.sanitized(),
            circular: self.circular.sanitized(),
            seed: self.seed,
        }
    }

    /// Check that values are usable by the engine.
    pub fn validate(&self) -> Result<()> {
        self.inference.validate()?;
        self.critical_path.validate()?;
        self.force.validate()?;
        self.hierarchical.validate()?;
        self.circular.validate()
    }
}

/// Replace an invalid section with its defaults, logging why.
fn sanitize<T: Default>(section: T, name: &str, validate: impl Fn(&T) -> Result<()>) -> T {
    match validate(&section) {
        Ok(()) => section,
        Err(e) => {
            tracing::warn!(section = name, error = %e, "Invalid settings, using defaults");
            T::default()
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be positive")))
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be a finite number")))
    }
}

impl InferenceConfig {
    /// Check that the window is finite and non-empty
    pub fn validate(&self) -> Result<()> {
        if !(self.min_gap_days.is_finite() && self.max_gap_days.is_finite())
            || self.min_gap_days > self.max_gap_days
        {
            return Err(Error::Config(format!(
                "gap window [{}, {}] is empty",
                self.min_gap_days, self.max_gap_days
            )));
        }
        Ok(())
    }

    /// This configuration if valid, otherwise the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        sanitize(self, "inference", Self::validate)
    }
}

impl CriticalPathConfig {
    /// Check that the search can take at least one step
    pub fn validate(&self) -> Result<()> {
        if self.max_search_depth == 0 {
            return Err(Error::Config(
                "max_search_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// This configuration if valid, otherwise the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        sanitize(self, "critical_path", Self::validate)
    }
}

impl ForceConfig {
    /// Check that every parameter is finite and in range
    pub fn validate(&self) -> Result<()> {
        require_positive("link_distance", self.link_distance)?;
        require_positive("node_radius", self.node_radius)?;
        require_positive("energy_threshold", self.energy_threshold)?;
        require_finite("charge_strength", self.charge_strength)?;
        require_finite("link_strength", self.link_strength)?;
        require_finite("center_strength", self.center_strength)?;
        require_finite("initial_jitter", self.initial_jitter)?;
        for (name, value) in [
            ("velocity_decay", self.velocity_decay),
            ("alpha_decay", self.alpha_decay),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(Error::Config(format!("{name} must be in (0, 1)")));
            }
        }
        Ok(())
    }

    /// This configuration if valid, otherwise the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        sanitize(self, "force", Self::validate)
    }
}

impl HierarchicalConfig {
    /// Check that spacings are positive and padding is non-negative
    pub fn validate(&self) -> Result<()> {
        require_positive("rank_spacing", self.rank_spacing)?;
        require_positive("node_spacing", self.node_spacing)?;
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::Config(
                "padding must be finite and not negative".to_string(),
            ));
        }
        Ok(())
    }

    /// This configuration if valid, otherwise the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        sanitize(self, "hierarchical", Self::validate)
    }
}

impl CircularConfig {
    /// Check that the circle fits on the canvas
    pub fn validate(&self) -> Result<()> {
        let fraction = self.radius_fraction;
        if !(fraction > 0.0 && fraction <= 0.5) {
            return Err(Error::Config(
                "radius_fraction must be in (0, 0.5]".to_string(),
            ));
        }
        Ok(())
    }

    /// This configuration if valid, otherwise the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        sanitize(self, "circular", Self::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = EngineConfig::from_yaml("circular:\n  radius_fraction: 0.4\nseed: 7\n")
            .unwrap();

        assert!((config.circular.radius_fraction - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.force, ForceConfig::default());
        assert_eq!(config.inference, InferenceConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[rstest]
    #[case::inverted_window("inference:\n  min_gap_days: 10\n  max_gap_days: 5\n", "gap window")]
    #[case::zero_depth("critical_path:\n  max_search_depth: 0\n", "max_search_depth")]
    #[case::zero_radius("force:\n  node_radius: 0\n", "node_radius")]
    #[case::decay_too_large("force:\n  velocity_decay: 1.5\n", "velocity_decay")]
    #[case::infinite_charge("force:\n  charge_strength: .inf\n", "charge_strength")]
    #[case::negative_padding("hierarchical:\n  padding: -1\n", "padding")]
    #[case::nan_padding("hierarchical:\n  padding: .nan\n", "padding")]
    #[case::infinite_rank_spacing("hierarchical:\n  rank_spacing: .inf\n", "rank_spacing")]
    #[case::infinite_node_spacing("hierarchical:\n  node_spacing: .inf\n", "node_spacing")]
    #[case::nan_jitter("force:\n  initial_jitter: .nan\n", "initial_jitter")]
    #[case::fraction_too_large("circular:\n  radius_fraction: 0.9\n", "radius_fraction")]
    #[case::not_yaml("force: [", "configuration error")]
    fn test_invalid_config_rejected(#[case] yaml: &str, #[case] expected: &str) {
        let err = EngineConfig::from_yaml(yaml).unwrap_err().to_string();
        assert!(
            err.contains(expected),
            "Expected error to contain '{expected}', got: '{err}'"
        );
    }

    #[test]
    fn test_critical_path_section_is_snake_case() {
        let config = EngineConfig::from_yaml("critical_path:\n  max_search_depth: 12\n").unwrap();
        assert_eq!(config.critical_path.max_search_depth, 12);
        assert!(config.to_yaml().unwrap().contains("critical_path:"));
    }

    #[test]
    fn test_sanitized_keeps_valid_sections() {
        let force = ForceConfig {
            link_distance: 80.0,
            ..ForceConfig::default()
        };
        assert_eq!(force.sanitized(), force);
    }

    #[test]
    fn test_sanitized_replaces_invalid_sections() {
        let force = ForceConfig {
            node_radius: f64::NAN,
            initial_jitter: f64::INFINITY,
            ..ForceConfig::default()
        };
        assert_eq!(force.sanitized(), ForceConfig::default());

        let hierarchical = HierarchicalConfig {
            rank_spacing: f64::INFINITY,
            ..HierarchicalConfig::default()
        };
        assert_eq!(hierarchical.sanitized(), HierarchicalConfig::default());

        let circular = CircularConfig {
            radius_fraction: f64::NAN,
        };
        assert_eq!(circular.sanitized(), CircularConfig::default());
    }

    #[test]
    fn test_engine_sanitized_touches_only_invalid_sections() {
        let config = EngineConfig {
            seed: Some(3),
            circular: CircularConfig {
                radius_fraction: 0.45,
            },
            inference: InferenceConfig {
                min_gap_days: f64::NAN,
                ..InferenceConfig::default()
            },
            ..EngineConfig::default()
        };

        let sanitized = config.sanitized();
        assert_eq!(sanitized.inference, InferenceConfig::default());
        assert!((sanitized.circular.radius_fraction - 0.45).abs() < f64::EPSILON);
        assert_eq!(sanitized.seed, Some(3));
        assert!(sanitized.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("engine.yaml");

        let mut original = EngineConfig::default();
        original.seed = Some(42);
        original.hierarchical.rank_spacing = 200.0;
        std::fs::write(&path, original.to_yaml().unwrap()).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}
