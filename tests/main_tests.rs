use assert_matches::assert_matches;
use clap::Parser;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;
use tree_select::cli::{Cli, Commands};
use tree_select::command::Command;
use tree_select::config::TreeSelectOptions;
use tree_select::error::MalformedTree;
use tree_select::executor::{execute_command, Executor};
use tree_select::filter::MatchMode;
use tree_select::navigator::{NavigatorEvent, NavigatorState, PressEvent, TreeListener};
use tree_select::selection::{SelectType, Selection};
use tree_select::state_config::StateConfig;
use tree_select::tree::{Forest, NodeId, ParentId};
use tree_select::TreeSelectError;

// Test utilities
#[derive(Default)]
struct Recorded {
    nodes: Vec<PressEvent>,
    leaves: Vec<PressEvent>,
}

struct RecordingListener(Rc<RefCell<Recorded>>);

impl TreeListener for RecordingListener {
    fn on_node_pressed(&mut self, event: &PressEvent) {
        self.0.borrow_mut().nodes.push(event.clone());
    }

    fn on_leaf_pressed(&mut self, event: &PressEvent) {
        self.0.borrow_mut().leaves.push(event.clone());
    }
}

fn fruit_forest() -> Forest {
    Forest::from_json(
        r#"[{"id": 1, "name": "Fruit", "children": [
              {"id": 2, "name": "Apple"},
              {"id": 3, "name": "Banana"}
           ]}]"#,
    )
    .unwrap()
}

fn recording_navigator(options: TreeSelectOptions) -> (NavigatorState, Rc<RefCell<Recorded>>) {
    let mut navigator = NavigatorState::new(fruit_forest(), options).unwrap();
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    navigator.subscribe(Box::new(RecordingListener(Rc::clone(&recorded))));
    (navigator, recorded)
}

fn id(n: i64) -> NodeId {
    NodeId::from(n)
}

#[test]
fn test_branch_press_opens_and_notifies() {
    let (mut navigator, recorded) = recording_navigator(TreeSelectOptions::default());
    navigator.press(&id(1)).unwrap();

    assert!(navigator.expansion().is_expanded(&id(1)));
    let recorded = recorded.borrow();
    assert_eq!(recorded.nodes.len(), 1);
    assert!(recorded.leaves.is_empty());
    let route: Vec<&NodeId> = recorded.nodes[0].route.iter().map(|e| &e.id).collect();
    assert_eq!(route, vec![&id(1)]);
}

#[test]
fn test_single_select_two_leaves() {
    let (mut navigator, recorded) = recording_navigator(TreeSelectOptions::default());
    navigator.press(&id(2)).unwrap();
    navigator.press(&id(3)).unwrap();

    assert_eq!(navigator.selection(), &Selection::Single(Some(id(3))));
    let recorded = recorded.borrow();
    assert_eq!(recorded.leaves.len(), 2);
    assert_eq!(recorded.nodes.len(), 2);
    assert_eq!(recorded.leaves[1].selection, Selection::Single(Some(id(3))));
    assert_eq!(recorded.leaves[1].node.parent_id, ParentId::Node(id(1)));
}

#[test]
fn test_query_prunes_non_matching_leaf() {
    let (mut navigator, _) = recording_navigator(TreeSelectOptions::default());
    navigator
        .handle_event(NavigatorEvent::UpdateSearchQuery("App".to_string()))
        .unwrap();
    let snapshot = navigator.snapshot();
    assert_eq!(snapshot.visible_forest.len(), 1);
    let children: Vec<&NodeId> = snapshot.visible_forest[0].children.iter().map(|n| &n.id).collect();
    assert_eq!(children, vec![&id(2)]);
}

#[test]
fn test_forest_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/forest.json");
    let forest = Forest::from_file(path).unwrap();
    let stats = forest.stats();
    assert_eq!(stats.total_nodes, 5);
    assert_eq!(stats.branches, 2);
    assert_eq!(stats.leaves, 3);

    // Missing parent ids are filled in from the structure
    let leaf = forest.find_node(&NodeId::from(2023)).unwrap();
    assert_eq!(leaf.parent(), ParentId::Node(NodeId::from("tax")));
    assert_eq!(forest.roots()[1].parent(), ParentId::Owner);
}

#[test]
fn test_malformed_forest_files() {
    let temp_dir = TempDir::new().unwrap();

    let duplicate = temp_dir.path().join("duplicate.json");
    fs::write(&duplicate, r#"[{"id": 1, "name": "a", "children": [{"id": 1, "name": "b"}]}]"#).unwrap();
    assert_matches!(
        Forest::from_file(&duplicate),
        Err(TreeSelectError::MalformedTree(MalformedTree::DuplicateId(NodeId::Num(1))))
    );

    let mismatch = temp_dir.path().join("mismatch.json");
    fs::write(
        &mismatch,
        r#"[{"id": 1, "name": "a", "children": [{"id": 2, "name": "b", "parentId": 9}]}]"#,
    )
    .unwrap();
    assert_matches!(
        Forest::from_file(&mismatch),
        Err(TreeSelectError::MalformedTree(MalformedTree::ParentMismatch { .. }))
    );

    assert_matches!(
        Forest::from_file(temp_dir.path().join("missing.json")),
        Err(TreeSelectError::Io(_))
    );
}

#[test]
fn test_cli_run_overrides() {
    let cli = Cli::try_parse_from([
        "tree-select",
        "run",
        "data.json",
        "--multiple",
        "--leaf-only",
        "--open",
        "1,docs",
        "--select",
        "2",
        "--no-accordion",
        "--match-mode",
        "fuzzy",
    ])
    .unwrap();

    let Commands::Run { data, options } = cli.command else {
        panic!("expected run subcommand");
    };
    assert_eq!(data, "data.json");

    let config = options.resolve().unwrap();
    assert_eq!(config.options.select_type, SelectType::Multiple);
    assert!(config.options.leaf_can_be_selected);
    assert!(!config.options.collapse_siblings);
    assert_eq!(config.options.match_mode, MatchMode::Fuzzy);
    assert_eq!(config.options.pre_open_ids, vec![NodeId::from(1), NodeId::from("docs")]);
    assert_eq!(config.options.default_selected_ids, vec![NodeId::from(2)]);
}

#[test]
fn test_cli_flags_override_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{"expandAll": true, "showNodeId": false, "theme": {"indent": 4}}"#).unwrap();

    let cli = Cli::try_parse_from([
        "tree-select",
        "run",
        "data.json",
        "--config",
        config_path.to_str().unwrap(),
        "--show-ids",
    ])
    .unwrap();
    let Commands::Run { options, .. } = cli.command else {
        panic!("expected run subcommand");
    };

    let config = options.resolve().unwrap();
    assert!(config.options.expand_all);
    assert!(config.options.show_node_id);
    assert_eq!(config.theme.indent, 4);
}

#[test]
fn test_cli_subcommands() {
    let cli = Cli::try_parse_from(["tree-select", "execute", "-c", "state.json", "-x", "press:3"]).unwrap();
    assert_matches!(cli.command, Commands::Execute { ref command, width: 80, .. } if command == "press:3");

    let cli = Cli::try_parse_from(["tree-select", "test", "-s", "script", "-c", "state.json"]).unwrap();
    assert_matches!(cli.command, Commands::Test { overwrite: false, verbose: false, .. });

    assert!(Cli::try_parse_from(["tree-select", "run"]).is_err());
    assert!(Cli::try_parse_from(["tree-select", "run", "d.json", "--match-mode", "magic"]).is_err());
}

#[test]
fn test_execute_command_writes_state() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("state.json");
    let output_path = temp_dir.path().join("out.json");
    let config = StateConfig::new(fruit_forest(), TreeSelectOptions::default());
    config.save_to_file(&state_path).unwrap();

    execute_command(
        state_path.to_str().unwrap(),
        "sequence:[enter,down,enter]",
        output_path.to_str(),
        false,
        80,
        24,
    )
    .unwrap();

    let result = StateConfig::load_from_file(&output_path).unwrap();
    assert_eq!(result.selection, Some(Selection::Single(Some(id(2)))));
    assert_eq!(result.cursor, Some(id(2)));
    assert!(result.expanded.unwrap().is_expanded(&id(1)));

    assert!(execute_command(state_path.to_str().unwrap(), "fly", None, false, 80, 24).is_err());
}

#[test]
fn test_executor_rejects_mode_mismatch() {
    let mut config = StateConfig::new(fruit_forest(), TreeSelectOptions::default());
    config.selection = Some(Selection::Multiple(Default::default()));
    assert_matches!(
        Executor::execute(&config, Command::CursorDown),
        Err(TreeSelectError::InvalidModeOperation(_))
    );
}

fn text_id_forest() -> Forest {
    Forest::from_json(
        r#"[{"id": "1", "name": "Fruit", "children": [
              {"id": "2", "name": "Apple"},
              {"id": "3", "name": "Banana"}
           ]},
           {"id": "4", "name": "Nuts", "children": [{"id": "5", "name": "Pecan"}]}]"#,
    )
    .unwrap()
}

#[test]
fn test_typed_ids_reach_numeric_looking_text_ids() {
    let config = StateConfig::new(text_id_forest(), TreeSelectOptions::default());
    let result = Executor::execute(&config, Command::from_string("press:2").unwrap()).unwrap();
    assert_eq!(result.config.selection, Some(Selection::Single(Some(NodeId::from("2")))));

    let cli = Cli::try_parse_from(["tree-select", "run", "data.json", "--open", "4", "--select", "2"])
        .unwrap();
    let Commands::Run { options, .. } = cli.command else {
        panic!("expected run subcommand");
    };
    let navigator = NavigatorState::new(text_id_forest(), options.resolve().unwrap().options).unwrap();
    assert!(navigator.expansion().is_expanded(&NodeId::from("4")));
    assert!(navigator.expansion().is_expanded(&NodeId::from("1")));
    assert_eq!(navigator.selection(), &Selection::Single(Some(NodeId::from("2"))));
}

