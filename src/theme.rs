use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Colors and icons used by the renderer. The engine never looks at these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    // Borders
    pub active_border: Color,
    pub inactive_border: Color,

    // Tree rows
    pub item_fg: Color,
    pub item_bg: Color,
    pub branch_fg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub cursor_bg: Color,
    pub node_id_fg: Color,

    // Icons
    pub open_icon: String,
    pub close_icon: String,
    pub indent: u16,

    // Search box
    pub search_text: Color,
    pub search_placeholder: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_help_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            active_border: Color::Yellow,
            inactive_border: Color::DarkGray,

            item_fg: Color::Reset,
            item_bg: Color::Reset,
            branch_fg: Color::Blue,
            selected_fg: Color::Black,
            selected_bg: Color::Rgb(0xFF, 0xED, 0xCE),
            cursor_bg: Color::DarkGray,
            node_id_fg: Color::Gray,

            open_icon: "▼".to_string(),
            close_icon: "▶".to_string(),
            indent: 2,

            search_text: Color::Reset,
            search_placeholder: Color::Gray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_help_text: Color::Gray,
        }
    }
}

impl Theme {
    pub fn border_style(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.active_border)
        } else {
            Style::default().fg(self.inactive_border)
        }
    }

    /// Style of a row label
    pub fn row_style(&self, is_branch: bool, is_highlighted: bool) -> Style {
        if is_highlighted {
            Style::default()
                .fg(self.selected_fg)
                .bg(self.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if is_branch {
            Style::default()
                .fg(self.branch_fg)
                .bg(self.item_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.item_fg).bg(self.item_bg)
        }
    }

    pub fn expand_icon(&self, is_expanded: bool) -> &str {
        if is_expanded {
            &self.open_icon
        } else {
            &self.close_icon
        }
    }
}
