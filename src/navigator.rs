//! Node-state engine
//!
//! `NavigatorState` owns the expansion map and the selection for one tree
//! instance and keeps them consistent with the query. The filter is only a
//! view over the forest: it never writes to expansion or selection, so
//! clearing the query restores the exact previous tree.

use crate::config::TreeSelectOptions;
use crate::error::{Result, TreeSelectError};
use crate::expansion::{ExpansionInit, ExpansionMap};
use crate::filter::{visible_forest, Filter};
use crate::route::{find_route, Route, RouteEntry};
use crate::selection::Selection;
use crate::tree::{Forest, Node, NodeId};
use serde::{Deserialize, Serialize};

/// Events that can be sent to the navigator
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorEvent {
    /// A row was pressed: branches open or close, selection follows the mode
    Press(NodeId),
    /// Open or close a branch without touching the selection
    ToggleExpanded(NodeId),
    UpdateSearchQuery(String),
    ClearSearch,
}

/// Payload handed to listeners after a press has been committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressEvent {
    pub node: RouteEntry,
    pub route: Route,
    pub selection: Selection,
    pub is_leaf: bool,
}

/// Receives press notifications
#[cfg_attr(test, mockall::automock)]
pub trait TreeListener {
    /// Fired for every press, branch or leaf
    fn on_node_pressed(&mut self, event: &PressEvent);

    /// Fired after `on_node_pressed` when the pressed node is a leaf
    fn on_leaf_pressed(&mut self, _event: &PressEvent) {}
}

/// Listener that writes every press to the log
#[derive(Debug, Default)]
pub struct LoggingListener;

impl TreeListener for LoggingListener {
    fn on_node_pressed(&mut self, event: &PressEvent) {
        let path: Vec<&str> = event.route.iter().map(|e| e.name.as_str()).collect();
        log::info!("Pressed {} ({}) -> {:?}", event.node.id, path.join(" / "), event.selection);
    }

    fn on_leaf_pressed(&mut self, event: &PressEvent) {
        log::debug!("Leaf pressed: {}", event.node.id);
    }
}

/// A row in the rendered tree
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleItem {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub is_branch: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    /// Drawn with the selected style. Selected branches are not
    /// highlighted when only leaves can be selected.
    pub is_highlighted: bool,
}

/// View model for rendering the tree
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorViewModel {
    pub items: Vec<VisibleItem>,
    pub search_query: String,
    pub show_node_id: bool,
}

/// Read-only copy of the engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub expansion: ExpansionMap,
    pub selection: Selection,
    pub visible_forest: Vec<Node>,
    pub search_query: String,
}

/// The tree engine
pub struct NavigatorState {
    forest: Forest,
    options: TreeSelectOptions,
    expansion: ExpansionMap,
    selection: Selection,
    query: String,
    listeners: Vec<Box<dyn TreeListener>>,

    // View model caching
    cached_view_model: Option<NavigatorViewModel>,
}

impl std::fmt::Debug for NavigatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigatorState")
            .field("options", &self.options)
            .field("expansion", &self.expansion)
            .field("selection", &self.selection)
            .field("query", &self.query)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NavigatorState {
    /// Create the engine, building expansion and selection from the options
    pub fn new(forest: Forest, mut options: TreeSelectOptions) -> Result<Self> {
        options.resolve_ids(&forest);
        let selection = Selection::from_defaults(options.select_type, &options.default_selected_ids)?;
        let expansion = ExpansionMap::initialize(
            &forest,
            &ExpansionInit {
                expand_all: options.expand_all,
                pre_open_ids: &options.pre_open_ids,
                default_selected_ids: &options.default_selected_ids,
            },
        );
        log::debug!(
            "Navigator: {} roots, {} expanded, selection {:?}",
            forest.roots().len(),
            expansion.len(),
            selection
        );
        Ok(Self::with_state(forest, options, expansion, selection))
    }

    /// Create the engine from previously captured state
    pub fn restore(
        forest: Forest,
        options: TreeSelectOptions,
        expansion: ExpansionMap,
        selection: Selection,
        query: String,
    ) -> Result<Self> {
        if selection.select_type() != options.select_type {
            return Err(TreeSelectError::InvalidModeOperation(format!(
                "selection is {:?} but selectType is {:?}",
                selection.select_type(),
                options.select_type
            )));
        }
        let mut navigator = Self::with_state(forest, options, expansion, selection);
        navigator.query = query;
        Ok(navigator)
    }

    fn with_state(
        forest: Forest,
        options: TreeSelectOptions,
        expansion: ExpansionMap,
        selection: Selection,
    ) -> Self {
        Self {
            forest,
            options,
            expansion,
            selection,
            query: String::new(),
            listeners: Vec::new(),
            cached_view_model: None,
        }
    }

    /// Register a listener for press notifications
    pub fn subscribe(&mut self, listener: Box<dyn TreeListener>) {
        self.listeners.push(listener);
    }

    /// Handle an event and return whether the state changed
    pub fn handle_event(&mut self, event: NavigatorEvent) -> Result<bool> {
        let state_before = (self.expansion.clone(), self.selection.clone(), self.query.clone());

        match event {
            NavigatorEvent::Press(id) => {
                self.press(&id)?;
            }
            NavigatorEvent::ToggleExpanded(id) => {
                let node = self.forest.find_node(&id).ok_or(TreeSelectError::NodeNotFound(id))?;
                if node.is_branch() {
                    let node_id = node.id.clone();
                    self.expansion = self.next_expansion(&node_id);
                }
            }
            NavigatorEvent::UpdateSearchQuery(query) => {
                self.query = query;
            }
            NavigatorEvent::ClearSearch => {
                self.query.clear();
            }
        }

        let state_after = (&self.expansion, &self.selection, &self.query);
        let state_changed = (&state_before.0, &state_before.1, &state_before.2) != state_after;

        if state_changed {
            self.invalidate_view_model();
        }

        Ok(state_changed)
    }

    /// Press a row.
    ///
    /// Expansion (including the accordion policy) and selection are both
    /// committed before any listener runs.
    pub fn press(&mut self, id: &NodeId) -> Result<PressEvent> {
        let node = self
            .forest
            .find_node(id)
            .ok_or_else(|| TreeSelectError::NodeNotFound(id.clone()))?;
        let route = find_route(self.forest.roots(), id);
        let entry = RouteEntry::from(node);
        let is_leaf = node.is_leaf();

        if is_leaf {
            self.selection = self.selection.toggle_leaf(id);
        } else {
            self.expansion = self.next_expansion(id);
            self.selection = self
                .selection
                .toggle_branch(id, self.options.leaf_can_be_selected);
        }
        self.invalidate_view_model();

        let event = PressEvent {
            node: entry,
            route,
            selection: self.selection.clone(),
            is_leaf,
        };
        for listener in self.listeners.iter_mut() {
            listener.on_node_pressed(&event);
            if is_leaf {
                listener.on_leaf_pressed(&event);
            }
        }
        Ok(event)
    }

    /// Expansion after toggling a branch, with the accordion applied on open
    fn next_expansion(&self, id: &NodeId) -> ExpansionMap {
        let toggled = self.expansion.toggle(id);
        if self.options.collapse_siblings && toggled.is_expanded(id) {
            toggled.collapse_siblings(&self.forest, id)
        } else {
            toggled
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn options(&self) -> &TreeSelectOptions {
        &self.options
    }

    pub fn expansion(&self) -> &ExpansionMap {
        &self.expansion
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Get current search query
    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn is_branch(&self, id: &NodeId) -> bool {
        self.forest.find_node(id).map(Node::is_branch).unwrap_or(false)
    }

    /// Route of any node, empty if unknown
    pub fn route(&self, id: &NodeId) -> Route {
        find_route(self.forest.roots(), id)
    }

    fn filter(&self) -> Filter {
        Filter::new(&self.query, self.options.match_mode)
    }

    /// Copy of the current state for a renderer
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            expansion: self.expansion.clone(),
            selection: self.selection.clone(),
            visible_forest: visible_forest(self.forest.roots(), &self.filter()),
            search_query: self.query.clone(),
        }
    }

    /// Build view model for rendering (with caching)
    pub fn build_view_model(&mut self) -> &NavigatorViewModel {
        let view_model = match self.cached_view_model.take() {
            Some(cached) => cached,
            None => {
                log::debug!("View model: rebuilding due to state change");
                let start = std::time::Instant::now();
                let view_model = self.rebuild_view_model();
                log::debug!(
                    "View model: {} rows rebuilt in {:?}",
                    view_model.items.len(),
                    start.elapsed()
                );
                view_model
            }
        };
        self.cached_view_model.insert(view_model)
    }

    /// Mark view model as needing rebuild
    pub fn invalidate_view_model(&mut self) {
        self.cached_view_model = None;
    }

    fn rebuild_view_model(&self) -> NavigatorViewModel {
        let visible = visible_forest(self.forest.roots(), &self.filter());
        let reveal = self.options.reveal_matches && !self.query.is_empty();
        let mut items = Vec::new();
        self.collect_visible_items(&visible, 0, reveal, &mut items);

        NavigatorViewModel {
            items,
            search_query: self.query.clone(),
            show_node_id: self.options.show_node_id,
        }
    }

    /// Flatten the visible forest into rows, descending into open branches
    fn collect_visible_items(
        &self,
        nodes: &[Node],
        depth: usize,
        reveal: bool,
        items: &mut Vec<VisibleItem>,
    ) {
        for node in nodes {
            let is_branch = node.is_branch();
            let is_expanded = self.expansion.is_expanded(&node.id);
            let is_selected = self.selection.is_selected(&node.id);

            items.push(VisibleItem {
                id: node.id.clone(),
                name: node.name.clone(),
                depth,
                is_branch,
                is_expanded: is_expanded || (reveal && is_branch),
                is_selected,
                is_highlighted: is_selected && (!is_branch || !self.options.leaf_can_be_selected),
            });

            if is_branch && (is_expanded || reveal) {
                self.collect_visible_items(&node.children, depth + 1, reveal, items);
            }
        }
    }
}
