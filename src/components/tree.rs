use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::state::{FlatItem, TreeState};
use crate::theme::ThemeColors;

/// Format a line count, optionally with thousands separators.
pub fn format_loc(loc: usize, group_digits: bool) -> String {
    let digits = loc.to_string();
    if !group_digits || digits.len() <= 3 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Tree widget that renders the visible directories with their LOC.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    show_guides: bool,
    group_digits: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors) -> Self {
        Self {
            tree_state,
            theme,
            show_guides: false,
            group_digits: true,
            block: None,
        }
    }

    pub fn show_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn group_digits(mut self, group: bool) -> Self {
        self.group_digits = group;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing characters.
    ///
    /// Walks back through the flat list to find each ancestor and whether it
    /// was the last of its siblings.
    fn build_guides(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        for d in 1..item.depth {
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            parts.push(if ancestor_is_last { "   " } else { "│  " });
        }
        parts.push(if item.is_last_sibling { "└──" } else { "├──" });

        parts.join("")
    }

    fn prefix(&self, item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if self.show_guides {
            Self::build_guides(item, items, item_index)
        } else {
            "  ".repeat(item.depth)
        }
    }

    /// Expand/collapse marker, blank for leaf directories.
    fn indicator(item: &FlatItem) -> &'static str {
        match (item.has_children, item.is_expanded) {
            (true, true) => "▼ ",
            (true, false) => "▶ ",
            (false, _) => "  ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree_state.flat_items;
        let selected = self.tree_state.selected_index;
        let visible_height = inner_area.height as usize;

        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (row, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + row as u16;

            let (base, guide, loc, name) = if idx == selected {
                let s = Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD);
                (s, s, s, s)
            } else {
                let base = Style::default();
                (
                    base,
                    base.fg(self.theme.indicator_fg),
                    base.fg(self.theme.loc_fg),
                    base.fg(self.theme.tree_fg),
                )
            };

            let mut spans = vec![
                Span::styled(self.prefix(item, items, idx), guide),
                Span::styled(Self::indicator(item), guide),
                Span::styled(format_loc(item.loc, self.group_digits), loc),
                Span::styled(" ", base),
                Span::styled(item.name.clone(), name),
            ];

            if idx == selected {
                let used: usize = spans.iter().map(|s| s.width()).sum();
                let pad = (inner_area.width as usize).saturating_sub(used);
                spans.push(Span::styled(" ".repeat(pad), base));
            }

            buf.set_line(inner_area.x, y, &Line::from(spans), inner_area.width);
        }
    }
}
