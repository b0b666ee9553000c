mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod scan_task;
mod state;
mod theme;
mod tui;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::app::App;
use crate::config::{AppConfig, ThemeConfig, TreeConfig};
use crate::error::{AppError, Result};
use crate::event::{Event, EventHandler};
use crate::fs::scanner::{build_tree, scan_directory};
use crate::fs::tree::SortBy;
use crate::logging::LogTarget;
use crate::scan_task::spawn_scan;
use crate::tui::{install_panic_hook, Tui};

/// Count lines of code per directory and browse them as a collapsible tree.
#[derive(Parser, Debug)]
#[command(name = "loctree", version, about)]
struct Cli {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Print totals instead of opening the tree view
    #[arg(long)]
    flat: bool,

    /// Print JSON instead of opening the tree view
    #[arg(long)]
    json: bool,

    /// Explicit config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Child order: loc, name or walk
    #[arg(long, value_name = "ORDER", value_parser = ["loc", "name", "walk"])]
    sort: Option<String>,

    /// Start with the root collapsed
    #[arg(long)]
    collapsed: bool,

    /// Color scheme: dark, light or custom
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn interactive(&self) -> bool {
        !self.flat && !self.json
    }

    /// Partial config carrying only the values set on the command line.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            tree: TreeConfig {
                sort_by: self.sort.clone(),
                expand_root: self.collapsed.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Check that `path` names an existing directory and return its canonical form.
fn validate_path(path: &Path) -> Result<PathBuf> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::InvalidPath(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !meta.is_dir() {
        return Err(AppError::NotADirectory(path.display().to_string()));
    }
    Ok(path.canonicalize()?)
}

fn print_flat(display_path: &Path, root: &Path, json: bool) -> Result<()> {
    if !json {
        println!("Scanning: {}", display_path.display());
    }
    let result = scan_directory(root)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Total LOC: {}", result.total_loc);
        println!("Files scanned: {}", result.files_scanned);
        println!("Directories scanned: {}", result.dirs_scanned);
    }
    Ok(())
}

fn print_tree_json(root: &Path, sort_by: SortBy) -> Result<()> {
    let mut tree = build_tree(root)?;
    let root_id = tree.root();
    tree.sort_subtree(root_id, sort_by);
    println!("{}", serde_json::to_string_pretty(&tree.to_report(root_id))?);
    Ok(())
}

async fn run_tui(root: &Path, config: &AppConfig) -> Result<()> {
    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(root, config);
    let mut events = EventHandler::new(Duration::from_millis(config.tick_rate_ms()));
    let event_tx = events.sender();

    if let Err(e) = spawn_scan(root.to_path_buf(), event_tx.clone()) {
        app.on_scan_complete(Err(e.to_string()));
    }

    loop {
        tui.draw(&mut app)?;
        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Tick => app.on_tick(),
            Event::Resize => {}
            Event::ScanComplete(result) => app.on_scan_complete(result),
        }
        if app.should_quit {
            break;
        }
    }

    tui.restore()
}

async fn run(cli: Cli) -> Result<()> {
    let log_target = match (&cli.log_file, cli.interactive()) {
        (Some(file), _) => LogTarget::File(file),
        (None, false) => LogTarget::Stderr,
        (None, true) => LogTarget::Off,
    };
    logging::init(log_target, cli.verbose)?;

    let root = validate_path(&cli.path)?;
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    tracing::debug!(root = %root.display(), sort = config.sort_by().label(), "starting");

    if cli.flat {
        return print_flat(&cli.path, &root, cli.json);
    }
    if cli.json {
        return print_tree_json(&root, config.sort_by());
    }
    run_tui(&root, &config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["loctree"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(cli.interactive());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["loctree", "--sort", "size"]).is_err());
    }

    #[test]
    fn cli_counts_verbosity() {
        let cli = Cli::try_parse_from(["loctree", "-vvv", "--flat"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(!cli.interactive());
    }

    #[test]
    fn overrides_only_carry_given_flags() {
        let cli = Cli::try_parse_from(["loctree", "--sort", "name", "--collapsed"]).unwrap();
        let config = AppConfig::default().merge(&cli.overrides());
        assert_eq!(config.sort_by(), SortBy::Name);
        assert!(!config.expand_root());
        assert_eq!(config.theme.scheme_name(), "dark");

        let cli = Cli::try_parse_from(["loctree"]).unwrap();
        let config = AppConfig::default().merge(&cli.overrides());
        assert_eq!(config.sort_by(), SortBy::Loc);
        assert!(config.expand_root());
    }

    #[test]
    fn validate_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = validate_path(&missing).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
        assert!(err.to_string().contains("Path does not exist"));
    }

    #[test]
    fn validate_file_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x\n").unwrap();
        let err = validate_path(&file).unwrap_err();
        assert!(matches!(err, AppError::NotADirectory(_)));
        assert!(err.to_string().starts_with("Path is not a directory: "));
    }

    #[test]
    fn validate_directory_canonicalizes() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let path = validate_path(&dir.path().join("sub").join("..")).unwrap();
        assert_eq!(path, dir.path().canonicalize().unwrap());
    }
}
