//! Which branches are open.
//!
//! Every transition returns a new map and leaves the input untouched, so a
//! renderer can always compare the previous and the next snapshot.

use crate::route::find_route;
use crate::tree::{Forest, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inputs for building the initial expansion state
#[derive(Debug, Clone, Default)]
pub struct ExpansionInit<'a> {
    pub expand_all: bool,
    pub pre_open_ids: &'a [NodeId],
    pub default_selected_ids: &'a [NodeId],
}

/// Set of expanded node ids. An id that is absent is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionMap {
    expanded: BTreeSet<NodeId>,
}

impl ExpansionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial map for a forest.
    ///
    /// With `expand_all` every node is opened. Otherwise the full route of
    /// each pre-opened and each default-selected id is opened, target
    /// included, so those nodes are reachable on first render. Unknown ids
    /// are skipped.
    pub fn initialize(forest: &Forest, init: &ExpansionInit<'_>) -> Self {
        if init.expand_all {
            let expanded: BTreeSet<NodeId> = forest.breadth_first_ids().into_iter().collect();
            log::debug!("Expansion: expand_all opened {} nodes", expanded.len());
            return Self { expanded };
        }

        let mut expanded = BTreeSet::new();
        for id in init.pre_open_ids.iter().chain(init.default_selected_ids) {
            let route = find_route(forest.roots(), id);
            if route.is_empty() {
                log::debug!("Expansion: skipping unknown id {}", id);
                continue;
            }
            expanded.extend(route.into_iter().map(|entry| entry.id));
        }
        Self { expanded }
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Flip one node
    pub fn toggle(&self, id: &NodeId) -> Self {
        let mut next = self.clone();
        if !next.expanded.remove(id) {
            next.expanded.insert(id.clone());
        }
        next
    }

    /// Accordion policy: close every other open branch that shares a parent
    /// with `just_opened`.
    pub fn collapse_siblings(&self, forest: &Forest, just_opened: &NodeId) -> Self {
        let route = find_route(forest.roots(), just_opened);
        let siblings = match route.len() {
            0 => return self.clone(),
            1 => forest.roots(),
            n => match forest.find_node(&route[n - 2].id) {
                Some(parent) => parent.children.as_slice(),
                None => return self.clone(),
            },
        };

        let mut next = self.clone();
        for sibling in siblings {
            if &sibling.id != just_opened && sibling.is_branch() && next.expanded.remove(&sibling.id) {
                log::debug!("Expansion: collapsed sibling {} of {}", sibling.id, just_opened);
            }
        }
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.expanded.iter()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl FromIterator<NodeId> for ExpansionMap {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}
