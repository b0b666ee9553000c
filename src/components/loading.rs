use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// One-line "Scanning" indicator shown while the background scan runs.
pub struct LoadingWidget<'a> {
    spinner: &'a str,
    path: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> LoadingWidget<'a> {
    pub fn new(spinner: &'a str, path: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            spinner,
            path,
            theme,
        }
    }
}

impl<'a> Widget for LoadingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let style = Style::default()
            .fg(self.theme.spinner_fg)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(Span::styled(
            format!("{} Scanning: {}", self.spinner, self.path),
            style,
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Error screen for a scan that could not start.
pub struct ErrorWidget<'a> {
    message: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> ErrorWidget<'a> {
    pub fn new(message: &'a str, theme: &'a ThemeColors) -> Self {
        Self { message, theme }
    }
}

impl<'a> Widget for ErrorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let error = Line::from(Span::styled(
            format!("Error: {}", self.message),
            Style::default()
                .fg(self.theme.error_fg)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(area.x, area.y, &error, area.width);

        if area.height > 1 {
            let hint = Line::from(Span::styled(
                "Press q to quit",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(area.x, area.y + 1, &hint, area.width);
        }
    }
}
