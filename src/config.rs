//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--sort`, `--collapsed`, `--theme`)
//! 2. `$LOCTREE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.loctree.toml` in the current working directory
//! 4. Global `~/.config/loctree/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::tree::SortBy;

// ── Section configs ──────────────────────────────────────────────────────────

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Sort order: "loc", "name", "walk".
    pub sort_by: Option<String>,
    /// Open the root one level deep after a scan.
    pub expand_root: Option<bool>,
    /// Draw box-drawing guides instead of plain indentation.
    pub show_guides: Option<bool>,
    /// Group LOC digits with thousands separators.
    pub group_digits: Option<bool>,
}

/// Event loop settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Tick interval in milliseconds; drives the loading spinner.
    pub tick_rate_ms: Option<u64>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub indicator_fg: Option<String>,
    pub loc_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub spinner_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

impl ThemeConfig {
    /// Scheme name, defaulting to "dark".
    pub fn scheme_name(&self) -> &str {
        self.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tree: TreeConfig,
    pub ui: UiConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does not include the CLI `--config` path; `load` handles that separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("LOCTREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".loctree.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("loctree").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            tree: TreeConfig {
                sort_by: other.tree.sort_by.clone().or(self.tree.sort_by),
                expand_root: other.tree.expand_root.or(self.tree.expand_root),
                show_guides: other.tree.show_guides.or(self.tree.show_guides),
                group_digits: other.tree.group_digits.or(self.tree.group_digits),
            },
            ui: UiConfig {
                tick_rate_ms: other.ui.tick_rate_ms.or(self.ui.tick_rate_ms),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Sort order; unknown values fall back to LOC.
    pub fn sort_by(&self) -> SortBy {
        self.tree
            .sort_by
            .as_deref()
            .and_then(SortBy::parse)
            .unwrap_or_default()
    }

    /// Whether the root starts expanded.
    pub fn expand_root(&self) -> bool {
        self.tree.expand_root.unwrap_or(true)
    }

    /// Whether to draw box-drawing guides.
    pub fn show_guides(&self) -> bool {
        self.tree.show_guides.unwrap_or(false)
    }

    /// Whether LOC numbers use thousands separators.
    pub fn group_digits(&self) -> bool {
        self.tree.group_digits.unwrap_or(true)
    }

    /// Tick interval in milliseconds, never zero.
    pub fn tick_rate_ms(&self) -> u64 {
        self.ui.tick_rate_ms.unwrap_or(DEFAULT_TICK_RATE_MS).max(1)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.sort_by(), SortBy::Loc);
        assert!(cfg.expand_root());
        assert!(!cfg.show_guides());
        assert!(cfg.group_digits());
        assert_eq!(cfg.tick_rate_ms(), 100);
        assert_eq!(cfg.theme.scheme_name(), "dark");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[tree]
sort_by = "name"
expand_root = false
show_guides = true
group_digits = false

[ui]
tick_rate_ms = 250

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.sort_by(), SortBy::Name);
        assert!(!cfg.expand_root());
        assert!(cfg.show_guides());
        assert!(!cfg.group_digits());
        assert_eq!(cfg.tick_rate_ms(), 250);
        assert_eq!(cfg.theme.scheme_name(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[tree]
sort_by = "walk"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.sort_by(), SortBy::Walk);
        assert!(cfg.expand_root());
        assert_eq!(cfg.tick_rate_ms(), 100);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert_eq!(cfg.sort_by(), SortBy::Loc);
        assert_eq!(cfg.theme.scheme_name(), "dark");
    }

    #[test]
    fn test_unknown_sort_falls_back_to_loc() {
        let cfg: AppConfig = toml::from_str("[tree]\nsort_by = \"size\"\n").expect("parse");
        assert_eq!(cfg.sort_by(), SortBy::Loc);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let cfg: AppConfig = toml::from_str("[ui]\ntick_rate_ms = 0\n").expect("parse");
        assert_eq!(cfg.tick_rate_ms(), 1);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            tree: TreeConfig {
                sort_by: Some("name".into()),
                expand_root: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let over = AppConfig {
            tree: TreeConfig {
                sort_by: Some("walk".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.sort_by(), SortBy::Walk);
        assert!(!merged.expand_root());
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            ui: UiConfig {
                tick_rate_ms: Some(500),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.tick_rate_ms(), 500);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[tree]
show_guides = true

[ui]
tick_rate_ms = 80
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.show_guides());
        assert_eq!(cfg.tick_rate_ms(), 80);
        assert_eq!(cfg.sort_by(), SortBy::Loc);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[tree]
sort_by = "name"
group_digits = false
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            tree: TreeConfig {
                sort_by: Some("walk".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.sort_by(), SortBy::Walk);
        assert!(!cfg.group_digits());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
loc_fg = "#ffaf00"
border_fg = "#565f89"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme.scheme_name(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.loc_fg.as_deref(), Some("#ffaf00"));
        assert_eq!(custom.border_fg.as_deref(), Some("#565f89"));
        assert!(custom.spinner_fg.is_none());
    }
}
