use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{AppError, Result};
use crate::fs::counter::count_lines;
use crate::fs::tree::{DirectoryNode, LocTree};

/// Totals from a scan that does not keep the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub total_loc: usize,
    /// Files that were actually counted.
    pub files_scanned: usize,
    /// Directories visited, including the root and hidden directories
    /// whose contents were then skipped.
    pub dirs_scanned: usize,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Stat the scan root; failure here is the only fatal scan error.
fn check_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(AppError::NotADirectory(root.display().to_string()));
    }
    Ok(())
}

fn walker(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
}

/// What to do with a non-directory entry.
enum FileAction {
    Count(usize),
    Skip,
}

/// Apply the per-file skip rules and count the file if it survives them.
fn visit_file(entry: &DirEntry) -> FileAction {
    let file_type = entry.file_type();
    if file_type.is_symlink() {
        trace!(path = %entry.path().display(), "skipping symlink");
        return FileAction::Skip;
    }
    if !file_type.is_file() {
        trace!(path = %entry.path().display(), "skipping special file");
        return FileAction::Skip;
    }
    if is_hidden(entry) {
        trace!(path = %entry.path().display(), "skipping hidden file");
        return FileAction::Skip;
    }
    match count_lines(entry.path()) {
        Ok(lines) => FileAction::Count(lines),
        Err(e) => {
            debug!(path = %entry.path().display(), error = %e, "skipping unreadable file");
            FileAction::Skip
        }
    }
}

/// Walk `root` and build its directory tree with aggregated LOC.
///
/// Hidden directories are pruned, symlinks and hidden files are ignored,
/// and unreadable entries are skipped. Only a root that cannot be stat'd
/// or is not a directory aborts the scan.
pub fn build_tree(root: &Path) -> Result<LocTree> {
    check_root(root)?;
    let started = Instant::now();

    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string());
    let mut tree = LocTree::new(DirectoryNode::new(root_name, root));

    let mut by_path: HashMap<PathBuf, _> = HashMap::new();
    by_path.insert(root.to_path_buf(), tree.root());

    let mut it = walker(root);
    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let is_dir = entry.file_type().is_dir();
        if is_dir && is_hidden(&entry) {
            trace!(path = %entry.path().display(), "pruning hidden directory");
            it.skip_current_dir();
            continue;
        }

        let Some(parent) = entry.path().parent().and_then(|p| by_path.get(p)).copied() else {
            continue;
        };

        if is_dir {
            let name = entry.file_name().to_string_lossy().to_string();
            let id = tree.add_child(parent, DirectoryNode::new(name, entry.path()));
            by_path.insert(entry.path().to_path_buf(), id);
        } else if let FileAction::Count(lines) = visit_file(&entry) {
            tree.get_mut(parent).file_loc += lines;
        }
    }

    let root_id = tree.root();
    let total = tree.aggregate(root_id);
    info!(
        root = %root.display(),
        dirs = tree.len(),
        loc = total,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tree scan complete"
    );
    Ok(tree)
}

/// Walk `root` and return only the totals.
///
/// Applies the same skip rules as [`build_tree`]. A hidden directory is
/// counted in `dirs_scanned` before it is pruned.
pub fn scan_directory(root: &Path) -> Result<ScanResult> {
    check_root(root)?;
    let started = Instant::now();
    let mut result = ScanResult::default();

    let mut it = walker(root);
    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_dir() {
            result.dirs_scanned += 1;
            // Counted before pruning: a hidden directory contributes exactly one.
            if entry.depth() > 0 && is_hidden(&entry) {
                it.skip_current_dir();
            }
            continue;
        }

        if let FileAction::Count(lines) = visit_file(&entry) {
            result.files_scanned += 1;
            result.total_loc += lines;
        }
    }

    info!(
        root = %root.display(),
        loc = result.total_loc,
        files = result.files_scanned,
        dirs = result.dirs_scanned,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "flat scan complete"
    );
    Ok(result)
}
