use crate::error::{MalformedTree, Result, TreeSelectError};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Identifier of a node. Callers may use integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Num(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{}", n),
            NodeId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl NodeId {
    /// Integer-looking input becomes `Num`, everything else `Text`
    pub fn from_input(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => NodeId::Num(n),
            Err(_) => NodeId::Text(s.to_string()),
        }
    }
}

impl FromStr for NodeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(NodeId::from_input(s))
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

/// Parent reference of a node; `Owner` marks a root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "NodeId", into = "NodeId")]
pub enum ParentId {
    Owner,
    Node(NodeId),
}

const OWNER_MARKER: &str = "owner";

impl From<NodeId> for ParentId {
    fn from(id: NodeId) -> Self {
        match id {
            NodeId::Text(ref s) if s == OWNER_MARKER => ParentId::Owner,
            other => ParentId::Node(other),
        }
    }
}

impl From<ParentId> for NodeId {
    fn from(parent: ParentId) -> Self {
        match parent {
            ParentId::Owner => NodeId::Text(OWNER_MARKER.to_string()),
            ParentId::Node(id) => id,
        }
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::Owner => f.write_str(OWNER_MARKER),
            ParentId::Node(id) => write!(f, "{}", id),
        }
    }
}

/// A single labeled node of the forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ParentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without children
    pub fn leaf(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            children: Vec::new(),
        }
    }

    /// Create a node with the given children
    pub fn branch(id: impl Into<NodeId>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(id, name)
        }
    }

    /// Declare the parent explicitly
    pub fn with_parent(mut self, parent: ParentId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Parent of this node. Nodes inside a `Forest` always carry one.
    pub fn parent(&self) -> ParentId {
        self.parent_id.clone().unwrap_or(ParentId::Owner)
    }
}

/// Validated, read-only forest of root nodes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Node>", into = "Vec<Node>")]
pub struct Forest {
    roots: Vec<Node>,
}

impl Forest {
    /// Nesting limit; keeps every recursive walk over the forest bounded
    pub const MAX_DEPTH: usize = 256;

    /// Validate the roots and fill in missing parent references
    pub fn new(mut roots: Vec<Node>) -> Result<Self> {
        let mut seen = HashSet::new();
        normalize(&mut roots, &ParentId::Owner, 0, &mut seen)?;
        log::debug!("Forest: validated {} nodes under {} roots", seen.len(), roots.len());
        Ok(Self { roots })
    }

    /// Parse a JSON array of root nodes
    pub fn from_json(json: &str) -> Result<Self> {
        let roots: Vec<Node> = serde_json::from_str(json)?;
        Self::new(roots)
    }

    /// Load a JSON forest from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Forest: loading {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a node anywhere in the forest
    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        let mut stack: Vec<&Node> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if &node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_node(id).is_some()
    }

    /// Id of the node a user meant by `input`. Integer-looking input
    /// prefers a numeric id and falls back to a text id with the same
    /// spelling; input matching no node keeps its parsed form.
    pub fn resolve_input(&self, input: &str) -> NodeId {
        let parsed = NodeId::from_input(input);
        if self.contains(&parsed) {
            return parsed;
        }
        let text = NodeId::Text(input.to_string());
        if self.contains(&text) {
            text
        } else {
            parsed
        }
    }

    /// Like `resolve_input`, for an id parsed before the forest was known
    pub fn resolve_id(&self, id: &NodeId) -> NodeId {
        if self.contains(id) {
            id.clone()
        } else {
            self.resolve_input(&id.to_string())
        }
    }

    /// Every node id, level by level
    pub fn breadth_first_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut queue: VecDeque<&Node> = self.roots.iter().collect();
        while let Some(node) = queue.pop_front() {
            ids.push(node.id.clone());
            queue.extend(node.children.iter());
        }
        ids
    }

    /// Get tree statistics
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack: Vec<(&Node, usize)> = self.roots.iter().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            stats.total_nodes += 1;
            if node.is_branch() {
                stats.branches += 1;
            } else {
                stats.leaves += 1;
            }
            stats.max_depth = stats.max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        stats
    }
}

impl TryFrom<Vec<Node>> for Forest {
    type Error = TreeSelectError;

    fn try_from(roots: Vec<Node>) -> Result<Self> {
        Self::new(roots)
    }
}

impl From<Forest> for Vec<Node> {
    fn from(forest: Forest) -> Self {
        forest.roots
    }
}

fn normalize(
    nodes: &mut [Node],
    parent: &ParentId,
    depth: usize,
    seen: &mut HashSet<NodeId>,
) -> std::result::Result<(), MalformedTree> {
    for node in nodes {
        if depth >= Forest::MAX_DEPTH {
            return Err(MalformedTree::TooDeep {
                id: node.id.clone(),
                max_depth: Forest::MAX_DEPTH,
            });
        }
        if !seen.insert(node.id.clone()) {
            return Err(MalformedTree::DuplicateId(node.id.clone()));
        }
        match &node.parent_id {
            None => node.parent_id = Some(parent.clone()),
            Some(declared) if declared != parent => {
                return Err(MalformedTree::ParentMismatch {
                    id: node.id.clone(),
                    declared: declared.to_string(),
                    actual: parent.to_string(),
                });
            }
            Some(_) => {}
        }
        let own = ParentId::Node(node.id.clone());
        normalize(&mut node.children, &own, depth + 1, seen)?;
    }
    Ok(())
}

/// Statistics about the forest
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub branches: usize,
    pub leaves: usize,
    pub max_depth: usize,
}
