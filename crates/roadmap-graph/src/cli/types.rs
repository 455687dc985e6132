//! CLI value enums and their conversions to engine types.

use clap::ValueEnum;

use roadmap_graph::{LayoutStrategy, NodeKindFilter};

/// Node kinds to include, for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterArg {
    /// Work items only
    Initiatives,
    /// Supporting systems only
    #[value(alias = "entities")]
    Systems,
    /// Everything
    #[default]
    Both,
}

impl std::fmt::Display for FilterArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initiatives => write!(f, "initiatives"),
            Self::Systems => write!(f, "systems"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl From<FilterArg> for NodeKindFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Initiatives => NodeKindFilter::Initiatives,
            FilterArg::Systems => NodeKindFilter::Entities,
            FilterArg::Both => NodeKindFilter::Both,
        }
    }
}

/// Layout strategy for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyArg {
    /// Force-directed simulation, run until it settles
    #[default]
    Force,
    /// Ranked columns, left to right
    #[value(alias = "ranked")]
    Hierarchical,
    /// Evenly spaced around a circle
    Circular,
}

impl std::fmt::Display for StrategyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", LayoutStrategy::from(*self))
    }
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Force => LayoutStrategy::Force,
            StrategyArg::Hierarchical => LayoutStrategy::Hierarchical,
            StrategyArg::Circular => LayoutStrategy::Circular,
        }
    }
}

/// Validate a canvas dimension: finite and strictly positive.
pub fn validate_extent(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("canvas size must be positive, got {value}"));
    }
    Ok(value)
}
