use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AppConfig;
use crate::fs::tree::{LocTree, SortBy};
use crate::state::TreeState;
use crate::theme::{resolve_theme, ThemeColors};

/// Frames of the loading spinner, advanced once per tick.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Application mode.
pub enum AppMode {
    /// A scan is running in the background.
    Loading { spinner: usize },
    /// The tree is ready for navigation.
    Browsing(TreeState),
    /// The scan failed; only quitting is possible.
    Failed(String),
}

/// UI state carried from one scan to the next by path.
struct Overlay {
    expanded: HashSet<PathBuf>,
    selected: Option<PathBuf>,
    sort_by: SortBy,
}

/// Display settings resolved from config.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub sort_by: SortBy,
    pub expand_root: bool,
    pub show_guides: bool,
    pub group_digits: bool,
}

impl ViewSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sort_by: config.sort_by(),
            expand_root: config.expand_root(),
            show_guides: config.show_guides(),
            group_digits: config.group_digits(),
        }
    }
}

/// Main application state.
pub struct App {
    pub root_path: PathBuf,
    pub mode: AppMode,
    pub settings: ViewSettings,
    pub theme: ThemeColors,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    overlay: Option<Overlay>,
}

impl App {
    /// Create an App that is waiting for the first scan of `root_path`.
    pub fn new(root_path: &Path, config: &AppConfig) -> Self {
        Self {
            root_path: root_path.to_path_buf(),
            mode: AppMode::Loading { spinner: 0 },
            settings: ViewSettings::from_config(config),
            theme: resolve_theme(&config.theme),
            should_quit: false,
            status_message: None,
            overlay: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tree_state_mut(&mut self) -> Option<&mut TreeState> {
        match &mut self.mode {
            AppMode::Browsing(state) => Some(state),
            _ => None,
        }
    }

    /// Current spinner glyph.
    pub fn spinner_frame(&self) -> &'static str {
        match self.mode {
            AppMode::Loading { spinner } => SPINNER_FRAMES[spinner % SPINNER_FRAMES.len()],
            _ => SPINNER_FRAMES[0],
        }
    }

    /// Advance the spinner while loading and expire old status messages.
    pub fn on_tick(&mut self) {
        if let AppMode::Loading { spinner } = &mut self.mode {
            *spinner = (*spinner + 1) % SPINNER_FRAMES.len();
        }
        self.clear_expired_status();
    }

    /// Switch to browsing (or failure) once the background scan reports.
    pub fn on_scan_complete(&mut self, result: Result<LocTree, String>) {
        match result {
            Ok(tree) => {
                let overlay = self.overlay.take();
                let sort_by = overlay
                    .as_ref()
                    .map(|o| o.sort_by)
                    .unwrap_or(self.settings.sort_by);
                // After a rescan the overlay alone decides expansion, root included.
                let expand_root = overlay.is_none() && self.settings.expand_root;
                let mut state = TreeState::new(tree, sort_by, expand_root);
                if let Some(overlay) = overlay {
                    state.restore_expanded(&overlay.expanded);
                    if let Some(path) = overlay.selected {
                        state.select_path(&path);
                    }
                    self.set_status_message("Rescanned".into());
                }
                tracing::info!(
                    loc = state.root_loc(),
                    dirs = state.tree.len(),
                    "tree ready"
                );
                self.mode = AppMode::Browsing(state);
            }
            Err(msg) => {
                self.overlay = None;
                self.mode = AppMode::Failed(msg);
            }
        }
    }

    /// Leave browsing for a fresh scan, remembering expanded paths and the
    /// selection. Returns `false` when a scan is already running or the app
    /// has failed.
    pub fn begin_rescan(&mut self) -> bool {
        let AppMode::Browsing(state) = &self.mode else {
            return false;
        };
        self.overlay = Some(Overlay {
            expanded: state.expanded_paths(),
            selected: state.selected().map(|item| item.path.clone()),
            sort_by: state.sort_by,
        });
        self.mode = AppMode::Loading { spinner: 0 };
        true
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }
}
