use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::tree::{LocTree, NodeId, SortBy};

/// Move the cursor up one row, stopping at 0.
pub fn move_up(current: usize, _max: usize) -> usize {
    current.saturating_sub(1)
}

/// Move the cursor down one row, stopping at `max`.
pub fn move_down(current: usize, max: usize) -> usize {
    if current < max {
        current + 1
    } else {
        max
    }
}

/// A flattened representation of a visible tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub loc: usize,
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
}

/// Pre-order list of the visible nodes.
///
/// The root is always present; the children of a node are listed only when
/// that node is expanded.
pub fn flatten_visible(tree: &LocTree) -> Vec<FlatItem> {
    let mut items = Vec::new();
    flatten_node(tree, tree.root(), true, &mut items);
    items
}

fn flatten_node(tree: &LocTree, id: NodeId, is_last: bool, items: &mut Vec<FlatItem>) {
    let node = tree.get(id);
    items.push(FlatItem {
        id,
        name: node.name.clone(),
        path: node.path.clone(),
        loc: node.loc,
        depth: tree.depth(id),
        has_children: node.has_children(),
        is_expanded: node.expanded,
        is_last_sibling: is_last,
    });

    if node.expanded {
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            flatten_node(tree, *child, i + 1 == count, items);
        }
    }
}

/// Navigation state over a scanned tree.
pub struct TreeState {
    pub tree: LocTree,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub sort_by: SortBy,
}

impl TreeState {
    /// Sort `tree`, optionally open the root, and flatten.
    pub fn new(mut tree: LocTree, sort_by: SortBy, expand_root: bool) -> Self {
        let root = tree.root();
        tree.sort_subtree(root, sort_by);
        if expand_root {
            tree.get_mut(root).expanded = true;
        }

        let mut state = Self {
            tree,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            sort_by,
        };
        state.flatten();
        state
    }

    /// Rebuild `flat_items` from the expanded flags and clamp the selection.
    pub fn flatten(&mut self) {
        self.flat_items = flatten_visible(&self.tree);
        if self.selected_index > self.max_index() {
            self.selected_index = self.max_index();
        }
    }

    /// Largest valid selection index.
    pub fn max_index(&self) -> usize {
        self.flat_items.len().saturating_sub(1)
    }

    pub fn selected(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    pub fn root_loc(&self) -> usize {
        self.tree.get(self.tree.root()).loc
    }

    pub fn move_up(&mut self) {
        self.selected_index = move_up(self.selected_index, self.max_index());
    }

    pub fn move_down(&mut self) {
        self.selected_index = move_down(self.selected_index, self.max_index());
    }

    pub fn page_up(&mut self, rows: usize) {
        self.selected_index = self.selected_index.saturating_sub(rows);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.selected_index = (self.selected_index + rows).min(self.max_index());
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.max_index();
    }

    /// Flip the selected node's expanded flag and reflatten.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected().map(|item| item.id) {
            self.tree.toggle_expanded(id);
            self.flatten();
        }
    }

    /// Expand the selected node if it has children.
    pub fn expand_selected(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        if item.has_children && !item.is_expanded {
            let id = item.id;
            self.tree.get_mut(id).expanded = true;
            self.flatten();
        }
    }

    /// Collapse the selected node, or jump to its parent row if it is
    /// already collapsed.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        let id = item.id;

        if item.is_expanded {
            self.tree.get_mut(id).expanded = false;
            self.flatten();
            return;
        }

        if let Some(parent) = self.tree.get(id).parent {
            if let Some(idx) = self.flat_items.iter().position(|i| i.id == parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Re-sort the whole tree with the next sort order, keeping the cursor
    /// on the same node.
    pub fn cycle_sort(&mut self) {
        self.sort_by = self.sort_by.next();
        let selected = self.selected().map(|item| item.id);
        let root = self.tree.root();
        self.tree.sort_subtree(root, self.sort_by);
        self.flatten();
        if let Some(id) = selected {
            if let Some(idx) = self.flat_items.iter().position(|i| i.id == id) {
                self.selected_index = idx;
            }
        }
    }

    /// Paths of every expanded node, visible or not.
    pub fn expanded_paths(&self) -> HashSet<PathBuf> {
        self.tree
            .ids()
            .map(|id| self.tree.get(id))
            .filter(|node| node.expanded)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Mark nodes whose path is in `expanded` as expanded and reflatten.
    pub fn restore_expanded(&mut self, expanded: &HashSet<PathBuf>) {
        let ids: Vec<NodeId> = self.tree.ids().collect();
        for id in ids {
            if expanded.contains(&self.tree.get(id).path) {
                self.tree.get_mut(id).expanded = true;
            }
        }
        self.flatten();
    }

    /// Move the cursor to the visible row for `path`. Returns whether the
    /// row was found.
    pub fn select_path(&mut self, path: &Path) -> bool {
        let Some(id) = self.tree.find_by_path(path) else {
            return false;
        };
        match self.flat_items.iter().position(|item| item.id == id) {
            Some(idx) => {
                self.selected_index = idx;
                true
            }
            None => false,
        }
    }
}
