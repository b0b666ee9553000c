use std::path::{Path, PathBuf};

use serde::Serialize;

/// Index of a node inside a [`LocTree`].
///
/// Ids are handed out in creation order, so during a scan they follow the
/// walk order of the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeId overflow");
        Self(index as u32)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One directory in the tree.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    pub name: String,
    pub path: PathBuf,
    /// Aggregate lines: `file_loc` plus the `loc` of every child.
    pub loc: usize,
    /// Lines in regular files directly inside this directory.
    pub file_loc: usize,
    pub children: Vec<NodeId>,
    /// UI flag; only the navigation layer changes it.
    pub expanded: bool,
    /// Back-reference, `None` for the root.
    pub parent: Option<NodeId>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            loc: 0,
            file_loc: 0,
            children: Vec::new(),
            expanded: false,
            parent: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Ordering applied to the children of every directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Largest aggregate LOC first.
    #[default]
    Loc,
    /// Case-insensitive name.
    Name,
    /// Order in which the scan discovered the directories.
    Walk,
}

impl SortBy {
    /// Parse a sort order from a config or CLI string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "loc" | "lines" => Some(SortBy::Loc),
            "name" => Some(SortBy::Name),
            "walk" | "none" => Some(SortBy::Walk),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::Loc => "LOC",
            SortBy::Name => "Name",
            SortBy::Walk => "Walk",
        }
    }

    /// Cycle to the next sort option.
    pub fn next(&self) -> Self {
        match self {
            SortBy::Loc => SortBy::Name,
            SortBy::Name => SortBy::Walk,
            SortBy::Walk => SortBy::Loc,
        }
    }
}

/// Arena-backed directory tree produced by a scan.
///
/// Every node is owned by the arena; structure is expressed with
/// `children` ids and non-owning `parent` ids, so the tree has no
/// reference cycles.
#[derive(Debug, Clone)]
pub struct LocTree {
    nodes: Vec<DirectoryNode>,
}

impl LocTree {
    /// Create a tree holding only `root`.
    pub fn new(root: DirectoryNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Every node id, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn get(&self, id: NodeId) -> &DirectoryNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut DirectoryNode {
        &mut self.nodes[id.index()]
    }

    /// Add a detached node to the arena.
    pub fn insert(&mut self, node: DirectoryNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`'s children and point it back at `parent`.
    ///
    /// Purely structural; LOC values are left alone.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Insert `node` and attach it under `parent` in one step.
    pub fn add_child(&mut self, parent: NodeId, node: DirectoryNode) -> NodeId {
        let id = self.insert(node);
        self.attach_child(parent, id);
        id
    }

    /// Recompute `loc` for `id` and its whole subtree, depth first.
    ///
    /// Returns the aggregate of `id`. Values are recomputed from `file_loc`,
    /// never accumulated, so repeated calls give the same result.
    pub fn aggregate(&mut self, id: NodeId) -> usize {
        let mut total = self.nodes[id.index()].file_loc;
        for i in 0..self.nodes[id.index()].children.len() {
            let child = self.nodes[id.index()].children[i];
            total += self.aggregate(child);
        }
        self.nodes[id.index()].loc = total;
        total
    }

    /// Stable-sort the direct children of `id`, largest `loc` first.
    pub fn sort_children_by_loc(&mut self, id: NodeId) {
        let mut children = std::mem::take(&mut self.nodes[id.index()].children);
        children.sort_by(|a, b| self.get(*b).loc.cmp(&self.get(*a).loc));
        self.nodes[id.index()].children = children;
    }

    /// Sort every level of the subtree under `id`, largest `loc` first.
    pub fn sort_subtree_by_loc(&mut self, id: NodeId) {
        self.sort_children_by_loc(id);
        for i in 0..self.nodes[id.index()].children.len() {
            let child = self.nodes[id.index()].children[i];
            self.sort_subtree_by_loc(child);
        }
    }

    /// Stable-sort the direct children of `id`. Ties keep their order.
    pub fn sort_children(&mut self, id: NodeId, sort_by: SortBy) {
        match sort_by {
            SortBy::Loc => self.sort_children_by_loc(id),
            SortBy::Name => {
                let mut children = std::mem::take(&mut self.nodes[id.index()].children);
                children.sort_by_cached_key(|c| self.get(*c).name.to_lowercase());
                self.nodes[id.index()].children = children;
            }
            // NodeIds are allocated in walk order.
            SortBy::Walk => self.nodes[id.index()].children.sort(),
        }
    }

    /// Sort `id`'s children, then every descendant's children, top down.
    pub fn sort_subtree(&mut self, id: NodeId, sort_by: SortBy) {
        if sort_by == SortBy::Loc {
            self.sort_subtree_by_loc(id);
            return;
        }
        self.sort_children(id, sort_by);
        for i in 0..self.nodes[id.index()].children.len() {
            let child = self.nodes[id.index()].children[i];
            self.sort_subtree(child, sort_by);
        }
    }

    /// Number of parent hops from `id` to the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Find a node by its path.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.path == path)
            .map(NodeId::new)
    }

    /// Flip the `expanded` flag of `id`.
    ///
    /// Callers must reflatten their visible list afterwards.
    pub fn toggle_expanded(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        node.expanded = !node.expanded;
    }

    /// Serializable nested view of the subtree under `id`.
    pub fn to_report(&self, id: NodeId) -> NodeReport {
        let node = self.get(id);
        NodeReport {
            name: node.name.clone(),
            path: node.path.clone(),
            loc: node.loc,
            file_loc: node.file_loc,
            children: node.children.iter().map(|c| self.to_report(*c)).collect(),
        }
    }
}

/// Nested form of a tree for JSON output.
#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub path: PathBuf,
    pub loc: usize,
    pub file_loc: usize,
    pub children: Vec<NodeReport>,
}
