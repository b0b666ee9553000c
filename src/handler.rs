use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::App;
use crate::event::Event;
use crate::scan_task::spawn_scan;

/// Rows moved by PageUp / PageDown.
const PAGE_ROWS: usize = 10;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, event_tx: &UnboundedSender<Event>) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit();
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Char('r') => {
            if app.begin_rescan() {
                if let Err(e) = spawn_scan(app.root_path.clone(), event_tx.clone()) {
                    app.on_scan_complete(Err(e.to_string()));
                }
            }
            return;
        }
        _ => {}
    }

    let Some(state) = app.tree_state_mut() else {
        return;
    };

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.page_up(PAGE_ROWS),
        KeyCode::PageDown => state.page_down(PAGE_ROWS),
        KeyCode::Home | KeyCode::Char('g') => state.select_first(),
        KeyCode::End | KeyCode::Char('G') => state.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => state.toggle_selected(),
        KeyCode::Right | KeyCode::Char('l') => state.expand_selected(),
        KeyCode::Left | KeyCode::Char('h') => state.collapse_selected(),
        KeyCode::Char('s') => {
            state.cycle_sort();
            let label = state.sort_by.label();
            app.set_status_message(format!("Sorted by {}", label));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppMode;
    use crate::config::AppConfig;
    use crate::fs::tree::{DirectoryNode, LocTree, SortBy};
    use std::path::Path;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn browsing_app() -> App {
        let mut tree = LocTree::new(DirectoryNode::new("root", "/root"));
        let root = tree.root();
        let mut a = DirectoryNode::new("a", "/root/a");
        a.file_loc = 5;
        let a = tree.add_child(root, a);
        tree.add_child(a, DirectoryNode::new("a1", "/root/a/a1"));
        let mut b = DirectoryNode::new("b", "/root/b");
        b.file_loc = 9;
        tree.add_child(root, b);
        tree.aggregate(root);

        let mut app = App::new(Path::new("/root"), &AppConfig::default());
        app.on_scan_complete(Ok(tree));
        app
    }

    fn selected_name(app: &mut App) -> String {
        app.tree_state_mut().unwrap().selected().unwrap().name.clone()
    }

    #[test]
    fn q_quits_in_any_mode() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Path::new("/root"), &AppConfig::default());
        handle_key_event(&mut app, key(KeyCode::Char('q')), &tx);
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = browsing_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &tx,
        );
        assert!(app.should_quit);
    }

    #[test]
    fn navigation_keys_move_cursor() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = browsing_app();
        handle_key_event(&mut app, key(KeyCode::Down), &tx);
        assert_eq!(selected_name(&mut app), "b");
        handle_key_event(&mut app, key(KeyCode::Char('j')), &tx);
        handle_key_event(&mut app, key(KeyCode::Char('j')), &tx);
        assert_eq!(selected_name(&mut app), "a");
        handle_key_event(&mut app, key(KeyCode::Char('k')), &tx);
        assert_eq!(selected_name(&mut app), "b");
        handle_key_event(&mut app, key(KeyCode::Char('g')), &tx);
        assert_eq!(selected_name(&mut app), "root");
    }

    #[test]
    fn enter_toggles_selected_node() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = browsing_app();
        handle_key_event(&mut app, key(KeyCode::End), &tx);
        handle_key_event(&mut app, key(KeyCode::Enter), &tx);
        assert_eq!(app.tree_state_mut().unwrap().flat_items.len(), 4);
        handle_key_event(&mut app, key(KeyCode::Char(' ')), &tx);
        assert_eq!(app.tree_state_mut().unwrap().flat_items.len(), 3);
    }

    #[test]
    fn s_cycles_sort_and_reports() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = browsing_app();
        handle_key_event(&mut app, key(KeyCode::Char('s')), &tx);
        assert_eq!(app.tree_state_mut().unwrap().sort_by, SortBy::Name);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Sorted by Name");
    }

    #[test]
    fn navigation_ignored_while_loading() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Path::new("/root"), &AppConfig::default());
        handle_key_event(&mut app, key(KeyCode::Down), &tx);
        assert!(matches!(app.mode, AppMode::Loading { .. }));
        assert!(!app.should_quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = browsing_app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release, &tx);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn r_starts_rescan_and_reports_completion() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        let tree = crate::fs::scanner::build_tree(dir.path()).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(dir.path(), &AppConfig::default());
        app.on_scan_complete(Ok(tree));

        handle_key_event(&mut app, key(KeyCode::Char('r')), &tx);
        assert!(matches!(app.mode, AppMode::Loading { .. }));

        match rx.recv().await {
            Some(Event::ScanComplete(result)) => app.on_scan_complete(result),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(app.tree_state_mut().unwrap().root_loc(), 1);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Rescanned");
    }
}
