use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::navigator::VisibleItem;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_search_bar(frame, app, chunks[0]);
    draw_tree(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.search_focused;
    let query = app.navigator.search_query();

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(focused));
    let inner = block.inner(area);

    let line = if query.is_empty() && !focused {
        Line::from(Span::styled(
            "Filter",
            Style::default().fg(app.theme.search_placeholder),
        ))
    } else {
        Line::from(Span::styled(
            query.to_string(),
            Style::default().fg(app.theme.search_text),
        ))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused && inner.width > 0 {
        let offset = (query.chars().count() as u16).min(inner.width - 1);
        frame.set_cursor_position((inner.x + offset, inner.y));
    }
}

fn draw_tree(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Tree ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(!app.ui.search_focused));
    app.ui.tree_area = block.inner(area);

    let cursor_index = app.cursor_index();
    let view_model = app.navigator.build_view_model();

    if view_model.items.is_empty() {
        let message = if view_model.search_query.is_empty() {
            "Empty tree"
        } else {
            "No results"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(app.theme.search_placeholder));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view_model
        .items
        .iter()
        .map(|item| ListItem::new(render_row(item, &app.theme, view_model.show_node_id)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(app.theme.cursor_bg));

    let mut list_state = ListState::default()
        .with_offset(app.ui.scroll_offset)
        .with_selected(cursor_index);
    frame.render_stateful_widget(list, area, &mut list_state);

    // The list scrolls to keep the cursor visible; mouse hits need the same offset
    app.ui.scroll_offset = list_state.offset();
}

/// One tree row: indentation, open/close icon, label and optional id
fn render_row(item: &VisibleItem, theme: &Theme, show_node_id: bool) -> Line<'static> {
    let indent = " ".repeat(item.depth * theme.indent as usize);
    let icon = if item.is_branch {
        format!("{} ", theme.expand_icon(item.is_expanded))
    } else {
        "  ".to_string()
    };

    let mut spans = vec![
        Span::raw(indent),
        Span::styled(icon, Style::default().fg(theme.branch_fg)),
        Span::styled(
            item.name.clone(),
            theme.row_style(item.is_branch, item.is_highlighted),
        ),
    ];
    if show_node_id {
        spans.push(Span::styled(
            format!(" [{}]", item.id),
            Style::default().fg(theme.node_id_fg),
        ));
    }
    Line::from(spans)
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.ui.search_focused {
        "Enter: Keep filter | Esc: Clear | Backspace: Delete"
    } else {
        "↑↓: Move | Enter/Space: Press | →←: Open/Close | /: Filter | q: Quit"
    };

    let status_line = Line::from(vec![
        Span::styled(
            app.ui.status_message.clone(),
            Style::default().fg(app.theme.status_bar_fg),
        ),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(app.theme.status_help_text)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(app.theme.status_bar_bg));

    frame.render_widget(paragraph, area);
}
