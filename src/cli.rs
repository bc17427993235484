use crate::config::{AppConfig, TreeSelectOptions};
use crate::error::Result;
use crate::filter::MatchMode;
use crate::selection::SelectType;
use crate::tree::NodeId;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tree-select")]
#[command(about = "An interactive tree picker with single and multiple selection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive picker and print the selection on quit
    Run {
        /// JSON file holding the forest (array of root nodes)
        data: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Generate a screenshot from a JSON state file
    Screenshot {
        /// Path to the JSON state file
        #[arg(short, long)]
        config: String,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Terminal width for rendering
        #[arg(long, default_value = "80")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "24")]
        height: u16,
    },
    /// Execute a command against a state file and output the result
    Execute {
        /// Path to the JSON state file
        #[arg(short, long)]
        config: String,
        /// Command to execute (e.g., "down", "press:3", "search:a")
        #[arg(short = 'x', long)]
        command: String,
        /// Output file for the resulting state (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
        /// Also print a screenshot of the result
        #[arg(long)]
        screenshot: bool,
        /// Terminal width for screenshot (if enabled)
        #[arg(long, default_value = "80")]
        width: u16,
        /// Terminal height for screenshot (if enabled)
        #[arg(long, default_value = "24")]
        height: u16,
    },
    /// Run a headless test script against a state file
    Test {
        /// Path to the test script
        #[arg(short, long)]
        script: String,
        /// Path to the JSON state file
        #[arg(short, long)]
        config: String,
        /// Write screenshots instead of comparing them
        #[arg(long)]
        overwrite: bool,
        /// Log to stderr at debug level
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MatchModeArg {
    Substring,
    Pattern,
    Fuzzy,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Substring => MatchMode::Substring,
            MatchModeArg::Pattern => MatchMode::Pattern,
            MatchModeArg::Fuzzy => MatchMode::Fuzzy,
        }
    }
}

/// Flags that override individual options from `--config`
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// JSON config file (options, theme, keybindings)
    #[arg(short, long)]
    pub config: Option<String>,
    /// Allow several nodes to be selected
    #[arg(long)]
    pub multiple: bool,
    /// Only leaves can be selected
    #[arg(long)]
    pub leaf_only: bool,
    /// Open every branch at start
    #[arg(long)]
    pub expand_all: bool,
    /// Node ids to open at start
    #[arg(long = "open", value_delimiter = ',')]
    pub open: Vec<String>,
    /// Node ids selected at start
    #[arg(long = "select", value_delimiter = ',')]
    pub select: Vec<String>,
    /// Show node ids next to labels
    #[arg(long)]
    pub show_ids: bool,
    /// Keep sibling branches open when opening a branch
    #[arg(long)]
    pub no_accordion: bool,
    /// How the filter matches labels
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchModeArg>,
    /// Show children of matching branches while filtering
    #[arg(long)]
    pub reveal: bool,
}

impl OptionArgs {
    /// Load `--config` (or defaults) and apply the flags on top
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_file(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config.options);
        Ok(config)
    }

    pub fn apply(&self, options: &mut TreeSelectOptions) {
        if self.multiple {
            options.select_type = SelectType::Multiple;
        }
        if self.leaf_only {
            options.leaf_can_be_selected = true;
        }
        if self.expand_all {
            options.expand_all = true;
        }
        if !self.open.is_empty() {
            options.pre_open_ids = self.open.iter().map(|s| NodeId::from_input(s)).collect();
        }
        if !self.select.is_empty() {
            options.default_selected_ids = self.select.iter().map(|s| NodeId::from_input(s)).collect();
        }
        if self.show_ids {
            options.show_node_id = true;
        }
        if self.no_accordion {
            options.collapse_siblings = false;
        }
        if let Some(mode) = self.match_mode {
            options.match_mode = mode.into();
        }
        if self.reveal {
            options.reveal_matches = true;
        }
    }
}
