//! Circular layout.

use super::{Layout, apply_pins};
use crate::config::CircularConfig;
use crate::domain::{Dimensions, GraphEdge, GraphNode, Point};
use std::f64::consts::TAU;

/// Places nodes evenly around a circle centred on the canvas, in input order.
///
/// Node `i` of `n` sits at angle `2π·i/n`, on a circle whose radius is a fixed
/// fraction of the smaller canvas dimension. Edges do not influence placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout {
    config: CircularConfig,
}

impl CircularLayout {
    /// Create a layout with the given radius fraction (defaults if invalid)
    #[must_use]
    pub fn new(config: CircularConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }
}

impl Layout for CircularLayout {
    #[allow(clippy::cast_precision_loss)]
    fn layout(
        &self,
        nodes: &[GraphNode],
        _edges: &[GraphEdge],
        dimensions: Dimensions,
    ) -> Vec<GraphNode> {
        let center = dimensions.center();
        let radius = dimensions.width.min(dimensions.height) * self.config.radius_fraction;
        let count = nodes.len() as f64;

        let mut positioned = nodes.to_vec();
        for (i, node) in positioned.iter_mut().enumerate() {
            let angle = TAU * i as f64 / count;
            node.position = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
        }

        apply_pins(&mut positioned);
        positioned
    }
}
