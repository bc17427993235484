//! Selected node ids, in single or multiple mode.

use crate::error::{Result, TreeSelectError};
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectType {
    #[default]
    Single,
    Multiple,
}

/// Current selection. The variant carries the mode, so a single selection
/// can never be treated as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Single(Option<NodeId>),
    Multiple(BTreeSet<NodeId>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Single(None)
    }
}

impl Selection {
    pub fn empty(select_type: SelectType) -> Self {
        match select_type {
            SelectType::Single => Selection::Single(None),
            SelectType::Multiple => Selection::Multiple(BTreeSet::new()),
        }
    }

    /// Build the initial selection from configured defaults
    pub fn from_defaults(select_type: SelectType, defaults: &[NodeId]) -> Result<Self> {
        match select_type {
            SelectType::Single => match defaults {
                [] => Ok(Selection::Single(None)),
                [only] => Ok(Selection::Single(Some(only.clone()))),
                _ => Err(TreeSelectError::InvalidModeOperation(format!(
                    "single select accepts at most one default id, got {}",
                    defaults.len()
                ))),
            },
            SelectType::Multiple => Ok(Selection::Multiple(defaults.iter().cloned().collect())),
        }
    }

    pub fn select_type(&self) -> SelectType {
        match self {
            Selection::Single(_) => SelectType::Single,
            Selection::Multiple(_) => SelectType::Multiple,
        }
    }

    /// Selection after a branch row was pressed. Branches are inert when
    /// only leaves can be selected.
    pub fn toggle_branch(&self, id: &NodeId, leaf_can_be_selected: bool) -> Self {
        if leaf_can_be_selected {
            return self.clone();
        }
        self.toggle(id)
    }

    /// Selection after a leaf row was pressed
    pub fn toggle_leaf(&self, id: &NodeId) -> Self {
        self.toggle(id)
    }

    fn toggle(&self, id: &NodeId) -> Self {
        match self {
            Selection::Single(_) => Selection::Single(Some(id.clone())),
            Selection::Multiple(ids) => {
                let mut next = ids.clone();
                if !next.remove(id) {
                    next.insert(id.clone());
                }
                Selection::Multiple(next)
            }
        }
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        match self {
            Selection::Single(current) => current.as_ref() == Some(id),
            Selection::Multiple(ids) => ids.contains(id),
        }
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<NodeId> {
        match self {
            Selection::Single(current) => current.iter().cloned().collect(),
            Selection::Multiple(ids) => ids.iter().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(current) => current.is_none(),
            Selection::Multiple(ids) => ids.is_empty(),
        }
    }
}
