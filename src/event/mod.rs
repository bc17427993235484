use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::app::App;
use crate::error::Result;

pub mod navigator;

pub use navigator::*;

/// `Ok(true)` when the screen needs a redraw
pub type EventResult = Result<bool>;

pub fn handle_event(event: Event, app: &mut App) -> EventResult {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }

            // Global keybindings
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('c') => {
                        app.should_quit = true;
                        return Ok(false);
                    }
                    KeyCode::Char('l') => {
                        // Ctrl+L to force screen redraw
                        app.ui.force_redraw = true;
                        app.ui.status_message = "Screen refreshed".to_string();
                        return Ok(true);
                    }
                    _ => return Ok(false),
                }
            }

            match key_to_command(app, key) {
                Some(command) => apply_command(app, &command),
                None => Ok(false),
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match app.row_at(mouse.column, mouse.row) {
                    Some(id) => {
                        app.press(&id)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            MouseEventKind::ScrollUp => Ok(app.move_cursor_up()),
            MouseEventKind::ScrollDown => Ok(app.move_cursor_down()),
            _ => Ok(false),
        },
        Event::Resize(_, _) => Ok(true),
        _ => Ok(false),
    }
}
