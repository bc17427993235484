use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use tree_select::{
    app::App,
    config::{AppConfig, TreeSelectOptions},
    navigator::NavigatorEvent,
    screenshot::{buffer_to_string, render_app},
    selection::SelectType,
    theme::Theme,
    tree::{Forest, Node, NodeId},
    ui,
};

fn create_forest() -> Forest {
    Forest::new(vec![
        Node::branch(1, "Fruit", vec![Node::leaf(2, "Apple"), Node::leaf(3, "Banana")]),
        Node::branch(4, "Vegetables", vec![Node::leaf(5, "Leek")]),
    ])
    .unwrap()
}

fn create_app(options: TreeSelectOptions) -> App {
    let config = AppConfig {
        options,
        ..Default::default()
    };
    App::from_config(create_forest(), config).unwrap()
}

fn render(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn line(buffer: &Buffer, y: u16) -> String {
    let text = buffer_to_string(buffer);
    text.lines().nth(y as usize).unwrap_or_default().to_string()
}

#[test]
fn test_initial_layout() {
    let mut app = create_app(TreeSelectOptions::default());
    let buffer = render(&mut app, 40, 12);
    let text = buffer_to_string(&buffer);

    assert!(line(&buffer, 0).contains("Search"));
    assert!(line(&buffer, 1).contains("Filter"));
    assert!(line(&buffer, 3).contains("Tree"));
    assert!(line(&buffer, 4).contains("▶ Fruit"));
    assert!(line(&buffer, 5).contains("▶ Vegetables"));
    assert!(!text.contains("Apple"));
    assert!(line(&buffer, 11).starts_with("Ready"));

    // Mouse hits use the inner list area from this draw
    assert_eq!(app.ui.tree_area, Rect::new(1, 4, 38, 6));
}

#[test]
fn test_expanded_branch_indents_children() {
    let mut app = create_app(TreeSelectOptions::default());
    app.press(&NodeId::from(1)).unwrap();
    let buffer = render(&mut app, 40, 12);

    assert!(line(&buffer, 4).contains("▼ Fruit"));
    assert!(line(&buffer, 5).starts_with("│    Apple"));
    assert!(line(&buffer, 6).starts_with("│    Banana"));
    assert!(line(&buffer, 7).contains("▶ Vegetables"));
    assert!(line(&buffer, 11).contains("Pressed Fruit (Fruit)"));
}

#[test]
fn test_cursor_and_selection_styles() {
    let mut app = create_app(TreeSelectOptions::default());
    app.press(&NodeId::from(1)).unwrap();
    app.press(&NodeId::from(2)).unwrap();
    app.move_cursor_up();
    let buffer = render(&mut app, 40, 12);
    let theme = Theme::default();

    // Cursor row (Fruit)
    assert_eq!(buffer[(3, 4)].bg, theme.cursor_bg);
    // Selected leaf (Apple), label starts after indent and icon
    assert_eq!(buffer[(5, 5)].symbol(), "A");
    assert_eq!(buffer[(5, 5)].bg, theme.selected_bg);
    // Unselected leaf (Banana)
    assert_ne!(buffer[(5, 6)].bg, theme.selected_bg);
}

#[test]
fn test_selected_branch_not_highlighted_when_leaf_only() {
    let mut app = create_app(TreeSelectOptions {
        select_type: SelectType::Multiple,
        leaf_can_be_selected: true,
        default_selected_ids: vec![NodeId::from(4)],
        ..Default::default()
    });
    let buffer = render(&mut app, 40, 12);
    let theme = Theme::default();

    // Vegetables is in the selection but drawn as a plain branch
    assert!(line(&buffer, 5).contains("▼ Vegetables"));
    assert_ne!(buffer[(3, 5)].bg, theme.selected_bg);
}

#[test]
fn test_show_node_ids() {
    let mut app = create_app(TreeSelectOptions {
        show_node_id: true,
        ..Default::default()
    });
    let buffer = render(&mut app, 40, 12);
    assert!(line(&buffer, 4).contains("Fruit [1]"));
    assert!(line(&buffer, 5).contains("Vegetables [4]"));
}

#[test]
fn test_filter_rendering() {
    let mut app = create_app(TreeSelectOptions {
        expand_all: true,
        ..Default::default()
    });
    app.start_search();
    app.search_input('B').unwrap();
    let text = render_app(&mut app, 80, 12).unwrap();

    assert!(text.contains("Banana"));
    assert!(text.contains("Fruit"));
    assert!(!text.contains("Apple"));
    assert!(!text.contains("Vegetables"));
    assert!(text.contains("Esc: Clear"));

    app.search_input('z').unwrap();
    let text = render_app(&mut app, 80, 12).unwrap();
    assert!(text.contains("No results"));
}

#[test]
fn test_icon_overrides() {
    let mut app = create_app(TreeSelectOptions::default());
    app.theme.open_icon = "-".to_string();
    app.theme.close_icon = "+".to_string();
    app.navigator
        .handle_event(NavigatorEvent::ToggleExpanded(NodeId::from(4)))
        .unwrap();
    let buffer = render(&mut app, 40, 12);
    assert!(line(&buffer, 4).contains("+ Fruit"));
    assert!(line(&buffer, 5).contains("- Vegetables"));
}

#[test]
fn test_scrolls_to_cursor() {
    let mut app = create_app(TreeSelectOptions {
        expand_all: true,
        ..Default::default()
    });
    // Five rows in a three-row list
    app.move_cursor_last();
    let buffer = render(&mut app, 30, 9);
    let text = buffer_to_string(&buffer);

    assert!(text.contains("Leek"));
    assert!(!text.contains("Fruit"));
    assert_eq!(app.ui.scroll_offset, 2);
    assert_eq!(app.row_at(2, 6), Some(NodeId::from(5)));
}
