use crate::{
    app::App,
    command::Command,
    error::Result,
    event::apply_command,
    screenshot,
    state_config::StateConfig,
};

/// Result of executing a command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub config: StateConfig,
    pub status_message: String,
    pub should_quit: bool,
    pub changed: bool,
}

/// Executes commands against state files
pub struct Executor;

impl Executor {
    /// Execute a command against a configuration and return the resulting state
    pub fn execute(config: &StateConfig, command: Command) -> Result<ExecutionResult> {
        let mut app = App::from_state_config(config)?;
        let changed = apply_command(&mut app, &command)?;
        log::debug!("Executor: {} changed={}", command, changed);

        Ok(ExecutionResult {
            config: StateConfig::from_app(&app),
            status_message: app.ui.status_message.clone(),
            should_quit: app.should_quit,
            changed,
        })
    }
}

/// `execute` subcommand: load, apply, print or save the new state
pub fn execute_command(
    config_path: &str,
    command_str: &str,
    output_path: Option<&str>,
    with_screenshot: bool,
    width: u16,
    height: u16,
) -> Result<()> {
    let config = StateConfig::load_from_file(config_path)?;
    let command = Command::from_string(command_str)?;
    let result = Executor::execute(&config, command)?;

    match output_path {
        Some(path) => {
            result.config.save_to_file(path)?;
            println!("State saved to: {}", path);
        }
        None => println!("{}", result.config.to_json()?),
    }

    if with_screenshot {
        let mut app = App::from_state_config(&result.config)?;
        print!("{}", screenshot::render_app(&mut app, width, height)?);
    }

    Ok(())
}
