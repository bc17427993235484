pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod expansion;
pub mod filter;
pub mod navigator;
pub mod route;
pub mod screenshot;
pub mod selection;
pub mod state_config;
pub mod test_runner;
pub mod theme;
pub mod tree;
pub mod ui;

pub use error::{Result, TreeSelectError};
pub use navigator::{NavigatorEvent, NavigatorState, PressEvent, TreeListener};
pub use tree::{Forest, Node, NodeId};
