//! Single-node selection state machine.
//!
//! ```text
//! Unselected --activate(a)--> Selected(a)
//! Selected(a) --activate(a)--> Unselected
//! Selected(a) --activate(b)--> Selected(b)
//! any --clear()--> Unselected
//! ```

use crate::graph::GraphSnapshot;
use serde::{Deserialize, Serialize};

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum Selection {
    /// Nothing is active
    #[default]
    Unselected,
    /// The node with this id is active
    Selected(String),
}

impl Selection {
    /// The selected id, if any
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(id) => Some(id),
        }
    }
}

/// Tracks which single node is active
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    /// Start with nothing selected
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected id, if any
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selection.id()
    }

    /// Whether `id` is the active node
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected() == Some(id)
    }

    /// Select `id`, or deselect it if it is already active.
    pub fn activate(&mut self, id: &str) -> &Selection {
        self.selection = if self.is_selected(id) {
            Selection::Unselected
        } else {
            Selection::Selected(id.to_string())
        };
        tracing::trace!(selection = ?self.selection, "Selection changed");
        &self.selection
    }

    /// Deselect whatever is active.
    pub fn clear(&mut self) -> &Selection {
        self.selection = Selection::Unselected;
        &self.selection
    }

    /// Drop the selection if its node is absent from `snapshot`.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn reconcile(&mut self, snapshot: &GraphSnapshot) -> bool {
        match self.selected() {
            Some(id) if !snapshot.contains(id) => {
                tracing::debug!(id, "Selected node left the graph, clearing selection");
                self.selection = Selection::Unselected;
                true
            }
            _ => false,
        }
    }
}
