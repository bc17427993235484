use crate::app::App;
use crate::command::Command;
use crate::event::EventResult;
use crossterm::event::{KeyCode, KeyEvent};

/// Translate a key into a command. Search mode captures printable keys.
pub fn key_to_command(app: &App, key: KeyEvent) -> Option<Command> {
    if app.ui.search_focused {
        return match key.code {
            KeyCode::Esc => Some(Command::ClearSearch),
            KeyCode::Enter => Some(Command::AcceptSearch),
            KeyCode::Backspace => Some(Command::SearchBackspace),
            KeyCode::Char(c) => Some(Command::SearchInput(c)),
            KeyCode::Up => Some(Command::CursorUp),
            KeyCode::Down => Some(Command::CursorDown),
            _ => None,
        };
    }

    let bindings = &app.keybindings;
    match key.code {
        KeyCode::Up => Some(Command::CursorUp),
        KeyCode::Down => Some(Command::CursorDown),
        KeyCode::Home => Some(Command::CursorFirst),
        KeyCode::End => Some(Command::CursorLast),
        KeyCode::Left => Some(Command::CollapseCursor),
        KeyCode::Right => Some(Command::ExpandCursor),
        KeyCode::Enter => Some(Command::PressCursor),
        KeyCode::Esc if !app.navigator.search_query().is_empty() => Some(Command::ClearSearch),
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(c) if c == bindings.press => Some(Command::PressCursor),
        KeyCode::Char(c) if c == bindings.search => Some(Command::StartSearch),
        KeyCode::Char(c) if c == bindings.quit => Some(Command::Quit),
        KeyCode::Char(c) if c == bindings.goto_top => Some(Command::CursorFirst),
        KeyCode::Char(c) if c == bindings.goto_bottom => Some(Command::CursorLast),
        _ => None,
    }
}

/// Apply a command to the app, returning whether anything changed
pub fn apply_command(app: &mut App, command: &Command) -> EventResult {
    log::debug!("Command: {}", command);
    match command {
        Command::Quit => {
            app.should_quit = true;
            Ok(false)
        }
        Command::CursorUp => Ok(app.move_cursor_up()),
        Command::CursorDown => Ok(app.move_cursor_down()),
        Command::CursorFirst => Ok(app.move_cursor_first()),
        Command::CursorLast => Ok(app.move_cursor_last()),
        Command::PressCursor => app.press_cursor(),
        Command::Press(id) => {
            let id = app.navigator.forest().resolve_id(id);
            app.press(&id)?;
            Ok(true)
        }
        Command::ExpandCursor => app.expand_cursor(),
        Command::CollapseCursor => app.collapse_cursor(),
        Command::StartSearch => Ok(app.start_search()),
        Command::SearchInput(c) => app.search_input(*c),
        Command::SearchBackspace => app.search_backspace(),
        Command::AcceptSearch => Ok(app.accept_search()),
        Command::ClearSearch => app.clear_search(),
        Command::Sequence(commands) => {
            let mut changed = false;
            for command in commands {
                changed |= apply_command(app, command)?;
                if app.should_quit {
                    break;
                }
            }
            Ok(changed)
        }
    }
}
