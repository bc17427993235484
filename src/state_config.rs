use crate::app::App;
use crate::config::TreeSelectOptions;
use crate::error::Result;
use crate::expansion::ExpansionMap;
use crate::selection::Selection;
use crate::tree::{Forest, NodeId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full adapter state as a JSON document, used by the headless subcommands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateConfig {
    pub forest: Forest,
    #[serde(default)]
    pub options: TreeSelectOptions,
    /// Missing means "initialise from options"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<ExpansionMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub search_focused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<NodeId>,
    #[serde(default = "default_status_message")]
    pub status_message: String,
}

fn default_status_message() -> String {
    "Ready".to_string()
}

impl StateConfig {
    pub fn new(forest: Forest, options: TreeSelectOptions) -> Self {
        Self {
            forest,
            options,
            expanded: None,
            selection: None,
            search_query: String::new(),
            search_focused: false,
            cursor: None,
            status_message: default_status_message(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StateConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_app(app: &App) -> Self {
        StateConfig {
            forest: app.navigator.forest().clone(),
            options: app.navigator.options().clone(),
            expanded: Some(app.navigator.expansion().clone()),
            selection: Some(app.navigator.selection().clone()),
            search_query: app.navigator.search_query().to_string(),
            search_focused: app.ui.search_focused,
            cursor: app.ui.cursor.clone(),
            status_message: app.ui.status_message.clone(),
        }
    }
}
