use crate::app::App;
use crate::command::Command;
use crate::error::{Result, TreeSelectError};
use crate::event::{apply_command, handle_event};
use crate::screenshot;
use crate::tree::NodeId;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Test file format for headless testing
///
/// Format is a simple text file where each line represents a command:
/// - `key:<keyname>` - Send a key event (e.g., `key:down`, `key:enter`, `key:q`)
/// - `char:<c>` - Send a character (e.g., `char:a`, `char:/`)
/// - `cmd:<command>` - Apply a command directly (e.g., `cmd:press:3`)
/// - `assert:<property>:<value>` - Assert application state
/// - `screenshot:<file>` - Compare the rendered screen with a file
/// - `# comment` - Comments (ignored)
///
/// Examples:
/// ```text
/// # Open the first branch and pick its second leaf
/// key:enter
/// key:down
/// key:down
/// key:space
/// assert:selected:3
/// assert:visible:1,2,3,4
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    pub command_type: CommandType,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Key,
    Char,
    Cmd,
    Assert,
    Screenshot,
}

#[derive(Debug, Clone, Default)]
pub struct TestScript {
    pub commands: Vec<TestCommand>,
}

#[derive(Debug, Clone)]
pub struct TestRunner {
    pub script: TestScript,
    pub overwrite_mode: bool,
    pub screenshot_base_dir: Option<PathBuf>,
    pub screenshot_size: (u16, u16),
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        TestRunner {
            script: TestScript::default(),
            overwrite_mode: false,
            screenshot_base_dir: None,
            screenshot_size: (80, 24),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_string(&content)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let mut commands = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (command_type, value) = if let Some(value) = line.strip_prefix("key:") {
                (CommandType::Key, value)
            } else if let Some(value) = line.strip_prefix("char:") {
                (CommandType::Char, value)
            } else if let Some(value) = line.strip_prefix("cmd:") {
                (CommandType::Cmd, value)
            } else if let Some(value) = line.strip_prefix("assert:") {
                (CommandType::Assert, value)
            } else if let Some(value) = line.strip_prefix("screenshot:") {
                (CommandType::Screenshot, value)
            } else {
                return Err(TreeSelectError::Script(format!(
                    "Invalid command on line {}: {}",
                    line_num + 1,
                    line
                )));
            };

            commands.push(TestCommand {
                command_type,
                value: value.to_string(),
                line: line_num + 1,
            });
        }

        let mut runner = Self::new();
        runner.script = TestScript { commands };
        Ok(runner)
    }

    pub fn run(&mut self, app: &mut App) -> Result<TestResult> {
        let start_time = Instant::now();
        let mut events_processed = 0;
        let mut assertions_passed = 0;
        let mut assertions_failed = 0;
        let mut errors = Vec::new();

        log::info!("🧪 Starting test run with {} commands", self.script.commands.len());

        for command in &self.script.commands {
            log::debug!("🧪 Executing line {}: {:?}", command.line, command);

            match command.command_type {
                CommandType::Key => {
                    let event = parse_key_event(&command.value)?;
                    if let Err(e) = handle_event(event, app) {
                        errors.push(format!("Line {}: key event failed: {}", command.line, e));
                    } else {
                        events_processed += 1;
                    }
                }
                CommandType::Char => {
                    let char_val = command.value.chars().next().ok_or_else(|| {
                        TreeSelectError::Script(format!("Line {}: empty character", command.line))
                    })?;
                    let event = Event::Key(KeyEvent::new(KeyCode::Char(char_val), KeyModifiers::NONE));
                    if let Err(e) = handle_event(event, app) {
                        errors.push(format!("Line {}: character event failed: {}", command.line, e));
                    } else {
                        events_processed += 1;
                    }
                }
                CommandType::Cmd => {
                    let parsed = Command::from_string(&command.value)?;
                    if let Err(e) = apply_command(app, &parsed) {
                        errors.push(format!("Line {}: command failed: {}", command.line, e));
                    } else {
                        events_processed += 1;
                    }
                }
                CommandType::Assert => match evaluate_assertion(app, &command.value) {
                    Ok(true) => {
                        assertions_passed += 1;
                        log::debug!("🧪 Assertion passed: {}", command.value);
                    }
                    Ok(false) => {
                        assertions_failed += 1;
                        errors.push(format!(
                            "Line {}: assertion failed: {}",
                            command.line, command.value
                        ));
                    }
                    Err(e) => {
                        assertions_failed += 1;
                        errors.push(format!("Line {}: assertion error: {}", command.line, e));
                    }
                },
                CommandType::Screenshot => {
                    if let Err(e) = self.take_screenshot(app, &command.value) {
                        errors.push(format!("Line {}: screenshot failed: {}", command.line, e));
                    }
                }
            }
        }

        let duration = start_time.elapsed();
        log::info!("🧪 Test run completed in {:?}", duration);

        let success = assertions_failed == 0 && errors.is_empty();
        Ok(TestResult {
            duration,
            events_processed,
            assertions_passed,
            assertions_failed,
            errors,
            success,
        })
    }

    fn take_screenshot(&self, app: &mut App, filename: &str) -> Result<()> {
        let (width, height) = self.screenshot_size;
        let content = screenshot::render_app(app, width, height)?;

        // Resolve the final screenshot path
        let final_path = match &self.screenshot_base_dir {
            Some(base_dir) => base_dir.join(filename),
            None => PathBuf::from(filename),
        };
        let final_filename = final_path.to_string_lossy();

        if self.overwrite_mode {
            std::fs::write(&final_path, content)?;
            println!("📸 Screenshot saved to: {}", final_filename);
            return Ok(());
        }

        // Verify mode: compare with existing file
        match std::fs::read_to_string(&final_path) {
            Ok(existing_content) if existing_content == content => {
                println!("✅ Screenshot verification passed: {}", final_filename);
                Ok(())
            }
            Ok(_) => Err(TreeSelectError::Script(format!(
                "{} differs from the rendered screen. Use --overwrite to update.",
                final_filename
            ))),
            Err(_) => Err(TreeSelectError::Script(format!(
                "{} does not exist. Use --overwrite to create.",
                final_filename
            ))),
        }
    }
}

fn parse_key_event(key_str: &str) -> Result<Event> {
    let key_code = match key_str.to_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        _ => {
            // Single characters keep their case so `key:G` differs from `key:g`
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(TreeSelectError::Script(format!("Unknown key: {}", key_str))),
            }
        }
    };

    Ok(Event::Key(KeyEvent::new(key_code, KeyModifiers::NONE)))
}

/// `-` stands for an empty list
fn format_ids(ids: &[NodeId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn parse_bool(property: &str, value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .map_err(|_| TreeSelectError::Script(format!("{} expects boolean value", property)))
}

fn evaluate_assertion(app: &mut App, assertion: &str) -> Result<bool> {
    let (property, expected) = assertion.split_once(':').ok_or_else(|| {
        TreeSelectError::Script("Assertion must be in format 'property:value'".to_string())
    })?;

    let node = app.navigator.forest().resolve_input(expected);
    match property {
        "expanded" => Ok(app.navigator.expansion().is_expanded(&node)),
        "collapsed" => Ok(!app.navigator.expansion().is_expanded(&node)),
        "selected" => Ok(app.navigator.selection().is_selected(&node)),
        "not_selected" => Ok(!app.navigator.selection().is_selected(&node)),
        "selection" => Ok(format_ids(&app.navigator.selection().ids()) == expected),
        "visible" => Ok(format_ids(&app.visible_ids()) == expected),
        "query" => Ok(app.navigator.search_query() == expected),
        "cursor" => Ok(match &app.ui.cursor {
            Some(id) => id.to_string() == expected,
            None => expected == "-",
        }),
        "status" => Ok(app.ui.status_message.contains(expected)),
        "search_focused" => Ok(app.ui.search_focused == parse_bool(property, expected)?),
        "should_quit" => Ok(app.should_quit == parse_bool(property, expected)?),
        _ => Err(TreeSelectError::Script(format!(
            "Unknown assertion property: {}",
            property
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct TestResult {
    pub duration: Duration,
    pub events_processed: usize,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    pub errors: Vec<String>,
    pub success: bool,
}

impl TestResult {
    pub fn print_summary(&self) {
        println!("🧪 Test Results:");
        println!("   Duration: {:?}", self.duration);
        println!("   Events processed: {}", self.events_processed);
        println!("   Assertions passed: {}", self.assertions_passed);
        println!("   Assertions failed: {}", self.assertions_failed);

        if !self.errors.is_empty() {
            println!("   Errors:");
            for error in &self.errors {
                println!("     - {}", error);
            }
        }

        if self.success {
            println!("   Status: ✅ PASSED");
        } else {
            println!("   Status: ❌ FAILED");
        }
    }
}
