use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " j/k:move  enter:toggle  s:sort  r:rescan  q:quit ";

/// Keep the last `max` characters of `s`, marking the cut with `...`.
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{}", tail)
}

/// Status bar widget: selected path, LOC info and key hints, or a transient
/// status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let bar_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);

        if let Some(msg) = self.status_message {
            let display: String = msg.chars().take(width).collect();
            let pad = width.saturating_sub(display.chars().count());
            let line = Line::from(vec![
                Span::styled(display, bar_style.fg(self.theme.accent_fg)),
                Span::styled(" ".repeat(pad), bar_style),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Hints are dropped first when space runs out.
        let hints = if width >= KEY_HINTS.len() + self.info.len() + 8 {
            KEY_HINTS
        } else {
            ""
        };
        let remaining = width.saturating_sub(hints.len());
        let info_display = truncate_left(self.info, remaining);
        let path_budget = remaining
            .saturating_sub(info_display.chars().count())
            .saturating_sub(1);
        let path_display = truncate_left(self.path_str, path_budget);

        let gap = remaining
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_display.chars().count());

        let line = Line::from(vec![
            Span::styled(path_display, bar_style),
            Span::styled(" ".repeat(gap), bar_style),
            Span::styled(
                info_display,
                bar_style.fg(self.theme.loc_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                hints,
                bar_style.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
