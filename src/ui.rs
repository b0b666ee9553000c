use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::loading::{ErrorWidget, LoadingWidget};
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::{format_loc, TreeWidget};

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let spinner = app.spinner_frame();
    let root_display = app.root_path.display().to_string();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let status = app.status_message.as_ref().map(|(msg, _)| msg.as_str());

    match &mut app.mode {
        AppMode::Loading { .. } => {
            let inner = block.inner(chunks[0]);
            frame.render_widget(block, chunks[0]);
            frame.render_widget(LoadingWidget::new(spinner, &root_display, &app.theme), inner);
        }
        AppMode::Failed(message) => {
            let inner = block.inner(chunks[0]);
            frame.render_widget(block, chunks[0]);
            frame.render_widget(ErrorWidget::new(message, &app.theme), inner);
        }
        AppMode::Browsing(state) => {
            // Keep the cursor on screen; 2 rows go to the border.
            let visible_height = chunks[0].height.saturating_sub(2) as usize;
            state.update_scroll(visible_height);

            let group = app.settings.group_digits;
            let root_loc = state.root_loc();
            let title = format!(
                " {} · {} LOC · sort: {} ",
                state.tree.get(state.tree.root()).name,
                format_loc(root_loc, group),
                state.sort_by.label()
            );

            let (path_str, info) = match state.selected() {
                Some(item) => {
                    let share = if root_loc == 0 {
                        0.0
                    } else {
                        item.loc as f64 * 100.0 / root_loc as f64
                    };
                    (
                        item.path.display().to_string(),
                        format!("{} LOC  {:.1}%", format_loc(item.loc, group), share),
                    )
                }
                None => (root_display.clone(), String::new()),
            };

            let tree_widget = TreeWidget::new(state, &app.theme)
                .show_guides(app.settings.show_guides)
                .group_digits(group)
                .block(block.title(title));
            frame.render_widget(tree_widget, chunks[0]);

            let mut status_bar = StatusBarWidget::new(&path_str, &info, &app.theme);
            if let Some(msg) = status {
                status_bar = status_bar.status_message(msg);
            }
            frame.render_widget(status_bar, chunks[1]);
        }
    }
}
