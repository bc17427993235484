use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::fs;

use crate::{app::App, error::Result, state_config::StateConfig, ui};

pub fn generate_screenshot(
    config_path: &str,
    output_path: Option<&str>,
    width: u16,
    height: u16,
) -> Result<()> {
    let config = StateConfig::load_from_file(config_path)?;
    let mut app = App::from_state_config(&config)?;
    let screenshot = render_app(&mut app, width, height)?;

    match output_path {
        Some(path) => {
            fs::write(path, screenshot)?;
            println!("Screenshot saved to: {}", path);
        }
        None => {
            print!("{}", screenshot);
        }
    }

    Ok(())
}

/// Draw the app once on an off-screen terminal and return the text
pub fn render_app(app: &mut App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|frame| {
        ui::draw(frame, app);
    })?;

    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let cell = &buffer[(x, y)];
            let sym = cell.symbol();

            // Use a space for empty cells to make output more readable
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}
