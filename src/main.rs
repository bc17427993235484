use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

use tree_select::app::App;
use tree_select::cli::{Cli, Commands, OptionArgs};
use tree_select::error::{Result, TreeSelectError};
use tree_select::navigator::LoggingListener;
use tree_select::state_config::StateConfig;
use tree_select::test_runner::TestRunner;
use tree_select::tree::Forest;
use tree_select::{event, executor, screenshot, ui};

fn main() -> Result<()> {
    // Initialize logger only if TREE_SELECT_LOG environment variable is set
    if let Ok(log_file) = std::env::var("TREE_SELECT_LOG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        env_logger::Builder::new()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Debug)
            .init();

        log::info!("tree-select starting up");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, options } => run_interactive(&data, &options),
        Commands::Screenshot {
            config,
            output,
            width,
            height,
        } => screenshot::generate_screenshot(&config, output.as_deref(), width, height),
        Commands::Execute {
            config,
            command,
            output,
            screenshot,
            width,
            height,
        } => executor::execute_command(
            &config,
            &command,
            output.as_deref(),
            screenshot,
            width,
            height,
        ),
        Commands::Test {
            script,
            config,
            overwrite,
            verbose,
        } => run_headless_test(&script, &config, overwrite, verbose),
    }
}

fn run_headless_test(script_path: &str, config_path: &str, overwrite: bool, verbose: bool) -> Result<()> {
    if verbose && std::env::var("TREE_SELECT_LOG").is_err() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    log::info!("🧪 Starting headless test run");
    log::info!("🧪 Script: {}", script_path);
    log::info!("🧪 Config: {}", config_path);

    let config = StateConfig::load_from_file(config_path)?;
    let mut app = App::from_state_config(&config)?;

    let mut test_runner = TestRunner::from_file(script_path)?;
    test_runner.overwrite_mode = overwrite;
    test_runner.screenshot_base_dir = std::path::Path::new(script_path)
        .parent()
        .map(|dir| dir.to_path_buf());

    let test_result = test_runner.run(&mut app)?;
    test_result.print_summary();

    if test_result.success {
        log::info!("🧪 Test completed successfully");
        Ok(())
    } else {
        log::error!("🧪 Test failed");
        Err(TreeSelectError::Script("Test failed".to_string()))
    }
}

fn run_interactive(data_path: &str, options: &OptionArgs) -> Result<()> {
    let forest = Forest::from_file(data_path)?;
    let config = options.resolve()?;
    log::info!("Loaded {} with {:?}", data_path, forest.stats());

    let mut app = App::from_config(forest, config)?;
    app.navigator.subscribe(Box::new(LoggingListener));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let loop_result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    loop_result?;

    // Picker output
    println!("{}", serde_json::to_string(app.navigator.selection())?);
    Ok(())
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut needs_redraw = true;

    loop {
        // Handle forced screen redraw
        if app.ui.force_redraw {
            terminal.clear()?;
            app.ui.force_redraw = false;
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw(f, app))?;
            needs_redraw = false;
        }

        if crossterm::event::poll(tick_rate)? {
            let event = crossterm::event::read()?;
            match event::handle_event(event, app) {
                Ok(changed) => needs_redraw = changed,
                Err(e) => {
                    log::warn!("Event failed: {}", e);
                    app.ui.status_message = format!("Error: {}", e);
                    needs_redraw = true;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
