use crate::config::{AppConfig, KeybindingConfig};
use crate::error::Result;
use crate::expansion::ExpansionMap;
use crate::navigator::{NavigatorEvent, NavigatorState, PressEvent};
use crate::selection::Selection;
use crate::state_config::StateConfig;
use crate::theme::Theme;
use crate::tree::{Forest, NodeId};
use ratatui::layout::Rect;

/// Adapter state that the engine knows nothing about
#[derive(Debug, Clone)]
pub struct UiState {
    pub search_focused: bool,
    /// Row under the keyboard cursor
    pub cursor: Option<NodeId>,
    pub status_message: String,
    pub force_redraw: bool,
    /// Inner area of the tree list from the last draw, for mouse hits
    pub tree_area: Rect,
    pub scroll_offset: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            search_focused: false,
            cursor: None,
            status_message: "Ready".to_string(),
            force_redraw: false,
            tree_area: Rect::default(),
            scroll_offset: 0,
        }
    }
}

pub struct App {
    pub navigator: NavigatorState,
    pub ui: UiState,
    pub theme: Theme,
    pub keybindings: KeybindingConfig,
    pub should_quit: bool,
}

impl App {
    pub fn new(navigator: NavigatorState) -> Self {
        let mut app = Self {
            navigator,
            ui: UiState::default(),
            theme: Theme::default(),
            keybindings: KeybindingConfig::default(),
            should_quit: false,
        };
        app.clamp_cursor();
        app
    }

    pub fn from_config(forest: Forest, config: AppConfig) -> Result<Self> {
        let navigator = NavigatorState::new(forest, config.options)?;
        let mut app = Self::new(navigator);
        app.theme = config.theme;
        app.keybindings = config.keybindings;
        Ok(app)
    }

    pub fn from_state_config(config: &StateConfig) -> Result<Self> {
        let navigator = match (&config.expanded, &config.selection) {
            (None, None) => {
                let mut navigator =
                    NavigatorState::new(config.forest.clone(), config.options.clone())?;
                navigator.handle_event(NavigatorEvent::UpdateSearchQuery(
                    config.search_query.clone(),
                ))?;
                navigator
            }
            (expanded, selection) => {
                // Fill whichever half is missing from the options
                let initial = NavigatorState::new(config.forest.clone(), config.options.clone())?;
                let expansion: ExpansionMap = expanded
                    .clone()
                    .unwrap_or_else(|| initial.expansion().clone());
                let selection: Selection = selection
                    .clone()
                    .unwrap_or_else(|| initial.selection().clone());
                NavigatorState::restore(
                    config.forest.clone(),
                    config.options.clone(),
                    expansion,
                    selection,
                    config.search_query.clone(),
                )?
            }
        };

        let mut app = Self::new(navigator);
        app.ui.search_focused = config.search_focused;
        app.ui.status_message = config.status_message.clone();
        if config.cursor.is_some() {
            app.ui.cursor = config.cursor.clone();
            app.clamp_cursor();
        }
        Ok(app)
    }

    /// Ids of the rows currently on screen, top to bottom
    pub fn visible_ids(&mut self) -> Vec<NodeId> {
        self.navigator
            .build_view_model()
            .items
            .iter()
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn cursor_index(&mut self) -> Option<usize> {
        let cursor = self.ui.cursor.clone()?;
        self.visible_ids().iter().position(|id| *id == cursor)
    }

    /// Keep the cursor on a visible row. Falls back to the first row.
    pub fn clamp_cursor(&mut self) {
        let rows = self.visible_ids();
        let on_screen = self
            .ui
            .cursor
            .as_ref()
            .map(|cursor| rows.contains(cursor))
            .unwrap_or(false);
        if !on_screen {
            self.ui.cursor = rows.first().cloned();
        }
    }

    fn move_cursor_to(&mut self, index: usize) -> bool {
        let rows = self.visible_ids();
        match rows.get(index) {
            Some(id) if self.ui.cursor.as_ref() != Some(id) => {
                self.ui.cursor = Some(id.clone());
                true
            }
            _ => false,
        }
    }

    pub fn move_cursor_up(&mut self) -> bool {
        match self.cursor_index() {
            Some(index) if index > 0 => self.move_cursor_to(index - 1),
            Some(_) => false,
            None => self.move_cursor_to(0),
        }
    }

    pub fn move_cursor_down(&mut self) -> bool {
        match self.cursor_index() {
            Some(index) => self.move_cursor_to(index + 1),
            None => self.move_cursor_to(0),
        }
    }

    pub fn move_cursor_first(&mut self) -> bool {
        self.move_cursor_to(0)
    }

    pub fn move_cursor_last(&mut self) -> bool {
        let len = self.visible_ids().len();
        len > 0 && self.move_cursor_to(len - 1)
    }

    /// Press a node and report it on the status line
    pub fn press(&mut self, id: &NodeId) -> Result<PressEvent> {
        let event = self.navigator.press(id)?;
        self.ui.cursor = Some(id.clone());
        self.ui.status_message = describe_press(&event);
        self.clamp_cursor();
        Ok(event)
    }

    pub fn press_cursor(&mut self) -> Result<bool> {
        match self.ui.cursor.clone() {
            Some(id) => {
                self.press(&id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Right arrow: open a closed branch, or step into an open one
    pub fn expand_cursor(&mut self) -> Result<bool> {
        let Some(id) = self.ui.cursor.clone() else {
            return Ok(false);
        };
        if !self.navigator.is_branch(&id) {
            return Ok(false);
        }
        if !self.navigator.expansion().is_expanded(&id) {
            let changed = self
                .navigator
                .handle_event(NavigatorEvent::ToggleExpanded(id))?;
            self.clamp_cursor();
            return Ok(changed);
        }
        // Already open: move to the first child row if it is shown
        let next = self.cursor_index().map(|index| index + 1);
        let first_child = self.navigator.route(&id).len();
        let items = &self.navigator.build_view_model().items;
        match next.and_then(|index| items.get(index).map(|item| (index, item.depth))) {
            Some((index, depth)) if depth == first_child => Ok(self.move_cursor_to(index)),
            _ => Ok(false),
        }
    }

    /// Left arrow: close an open branch, or jump to the parent row
    pub fn collapse_cursor(&mut self) -> Result<bool> {
        let Some(id) = self.ui.cursor.clone() else {
            return Ok(false);
        };
        if self.navigator.is_branch(&id) && self.navigator.expansion().is_expanded(&id) {
            let changed = self
                .navigator
                .handle_event(NavigatorEvent::ToggleExpanded(id))?;
            self.clamp_cursor();
            return Ok(changed);
        }
        let route = self.navigator.route(&id);
        if route.len() < 2 {
            return Ok(false);
        }
        let parent = route[route.len() - 2].id.clone();
        if self.visible_ids().contains(&parent) {
            self.ui.cursor = Some(parent);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn start_search(&mut self) -> bool {
        if self.ui.search_focused {
            return false;
        }
        self.ui.search_focused = true;
        true
    }

    pub fn search_input(&mut self, ch: char) -> Result<bool> {
        let mut query = self.navigator.search_query().to_string();
        query.push(ch);
        self.update_query(query)
    }

    pub fn search_backspace(&mut self) -> Result<bool> {
        let mut query = self.navigator.search_query().to_string();
        if query.pop().is_none() {
            return Ok(false);
        }
        self.update_query(query)
    }

    /// Leave the search box and keep the filter
    pub fn accept_search(&mut self) -> bool {
        let was_focused = self.ui.search_focused;
        self.ui.search_focused = false;
        was_focused
    }

    /// Leave the search box and drop the filter
    pub fn clear_search(&mut self) -> Result<bool> {
        let was_focused = self.ui.search_focused;
        self.ui.search_focused = false;
        let changed = self.navigator.handle_event(NavigatorEvent::ClearSearch)?;
        self.clamp_cursor();
        Ok(changed || was_focused)
    }

    fn update_query(&mut self, query: String) -> Result<bool> {
        let changed = self
            .navigator
            .handle_event(NavigatorEvent::UpdateSearchQuery(query))?;
        if changed {
            let rows = self.navigator.build_view_model().items.len();
            self.ui.status_message = if rows == 0 {
                "No results".to_string()
            } else {
                format!("Filter: {} rows", rows)
            };
        }
        self.clamp_cursor();
        Ok(changed)
    }

    /// Node drawn at a screen position, using the last rendered tree area
    pub fn row_at(&mut self, column: u16, row: u16) -> Option<NodeId> {
        let area = self.ui.tree_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = self.ui.scroll_offset + (row - area.y) as usize;
        self.visible_ids().get(index).cloned()
    }
}

fn describe_press(event: &PressEvent) -> String {
    let path: Vec<&str> = event.route.iter().map(|entry| entry.name.as_str()).collect();
    format!("Pressed {} ({})", event.node.name, path.join(" / "))
}
