//! Ancestor lookups over a forest.
//!
//! A route is the chain of descriptors from a root down to (and including)
//! a target node. Routes are derived on demand and never stored.

use crate::tree::{Node, NodeId, ParentId};
use serde::{Deserialize, Serialize};

/// Descriptor of one node on a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub id: NodeId,
    pub name: String,
    pub parent_id: ParentId,
}

impl From<&Node> for RouteEntry {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            parent_id: node.parent(),
        }
    }
}

pub type Route = Vec<RouteEntry>;

/// Compute the root-first route to `target`, or an empty route if the
/// target is not in the forest.
///
/// Walks depth first, keeping the stack equal to the path from the root to
/// the node being visited, and stops at the first node whose id matches.
pub fn find_route(roots: &[Node], target: &NodeId) -> Route {
    // Each frame holds the remaining siblings at one level
    let mut frames: Vec<std::slice::Iter<'_, Node>> = vec![roots.iter()];
    let mut stack: Route = Vec::new();

    while let Some(frame) = frames.last_mut() {
        match frame.next() {
            Some(node) => {
                stack.push(RouteEntry::from(node));
                if &node.id == target {
                    return stack;
                }
                if node.is_branch() {
                    frames.push(node.children.iter());
                } else {
                    stack.pop();
                }
            }
            None => {
                frames.pop();
                // Leaving a level means its parent did not lead to the target
                if !frames.is_empty() {
                    stack.pop();
                }
            }
        }
    }

    log::debug!("Route: {} not found in forest", target);
    Vec::new()
}

/// Ids along the route, root first
pub fn route_ids(route: &Route) -> Vec<NodeId> {
    route.iter().map(|entry| entry.id.clone()).collect()
}
