use crate::error::Result;
use crate::filter::MatchMode;
use crate::selection::SelectType;
use crate::theme::Theme;
use crate::tree::{Forest, NodeId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration, supplied once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeSelectOptions {
    pub select_type: SelectType,
    /// Only leaves can be selected; branch presses only open and close
    pub leaf_can_be_selected: bool,
    pub expand_all: bool,
    pub pre_open_ids: Vec<NodeId>,
    pub default_selected_ids: Vec<NodeId>,
    /// Cosmetic; rendered next to each label
    pub show_node_id: bool,
    /// Opening a branch closes its open siblings
    pub collapse_siblings: bool,
    pub match_mode: MatchMode,
    /// While filtering, show children of every visible branch
    pub reveal_matches: bool,
}

impl Default for TreeSelectOptions {
    fn default() -> Self {
        Self {
            select_type: SelectType::Single,
            leaf_can_be_selected: false,
            expand_all: false,
            pre_open_ids: Vec::new(),
            default_selected_ids: Vec::new(),
            show_node_id: false,
            collapse_siblings: true,
            match_mode: MatchMode::Substring,
            reveal_matches: false,
        }
    }
}

impl TreeSelectOptions {
    /// Point configured ids at the forest's own ids, so `1` from the command
    /// line reaches a node whose id is the text `"1"`
    pub fn resolve_ids(&mut self, forest: &Forest) {
        for id in self
            .pre_open_ids
            .iter_mut()
            .chain(self.default_selected_ids.iter_mut())
        {
            *id = forest.resolve_id(id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: char,
    pub search: char,
    pub press: char,
    pub goto_top: char,
    pub goto_bottom: char,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: 'q',
            search: '/',
            press: ' ',
            goto_top: 'g',
            goto_bottom: 'G',
        }
    }
}

/// Everything read from a `--config` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub options: TreeSelectOptions,
    pub theme: Theme,
    pub keybindings: KeybindingConfig,
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&content)?;
        log::debug!("Config: loaded {:?}", path.as_ref());
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = TreeSelectOptions::default();
        assert_eq!(options.select_type, SelectType::Single);
        assert!(options.collapse_siblings);
        assert!(!options.leaf_can_be_selected);
        assert_eq!(options.match_mode, MatchMode::Substring);
    }

    #[test]
    fn test_partial_options_json() {
        let options: TreeSelectOptions = serde_json::from_str(
            r#"{"selectType": "multiple", "leafCanBeSelected": true, "preOpenIds": [3, "x"]}"#,
        )
        .unwrap();
        assert_eq!(options.select_type, SelectType::Multiple);
        assert!(options.leaf_can_be_selected);
        assert_eq!(options.pre_open_ids, vec![NodeId::from(3), NodeId::from("x")]);
        assert!(options.collapse_siblings);
    }

    #[test]
    fn test_resolve_ids_against_text_forest() {
        let forest = Forest::from_json(
            r#"[{"id": "1", "name": "Fruit", "children": [{"id": "2", "name": "Apple"}]},
                {"id": 3, "name": "Nuts"}]"#,
        )
        .unwrap();
        let mut options = TreeSelectOptions {
            pre_open_ids: vec![NodeId::from_input("1"), NodeId::from_input("9")],
            default_selected_ids: vec![NodeId::from_input("3")],
            ..Default::default()
        };
        options.resolve_ids(&forest);
        assert_eq!(options.pre_open_ids, vec![NodeId::from("1"), NodeId::from(9)]);
        assert_eq!(options.default_selected_ids, vec![NodeId::from(3)]);
    }

    #[test]
    fn test_app_config_round_trip_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"expandAll": true, "matchMode": "fuzzy", "keybindings": {{"quit": "x"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert!(config.options.expand_all);
        assert_eq!(config.options.match_mode, MatchMode::Fuzzy);
        assert_eq!(config.keybindings.quit, 'x');
        assert_eq!(config.keybindings.search, '/');

        let out = tempfile::NamedTempFile::new().unwrap();
        config.save_to_file(out.path()).unwrap();
        let reloaded = AppConfig::load_from_file(out.path()).unwrap();
        assert_eq!(reloaded.options, config.options);
    }
}
