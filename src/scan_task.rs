use std::path::PathBuf;
use std::thread;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;
use crate::event::Event;
use crate::fs::scanner::build_tree;

/// Run a full tree scan on its own thread.
///
/// The scan cannot be cancelled; when it finishes exactly one
/// [`Event::ScanComplete`] is sent. If the receiver is gone the result is
/// dropped. The thread is detached so quitting never waits for it.
pub fn spawn_scan(root: PathBuf, tx: UnboundedSender<Event>) -> Result<()> {
    thread::Builder::new()
        .name("loctree-scan".into())
        .spawn(move || {
            tracing::info!(root = %root.display(), "starting background scan");
            let result = build_tree(&root).map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(root = %root.display(), error = %e, "scan failed");
            }
            let _ = tx.send(Event::ScanComplete(result));
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn emits_one_completion_event() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "1\n2\n").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_scan(dir.path().to_path_buf(), tx).unwrap();

        match rx.recv().await {
            Some(Event::ScanComplete(Ok(tree))) => {
                assert_eq!(tree.get(tree.root()).loc, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        // The thread dropped its sender after sending.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn reports_failure_as_message() {
        let dir = tempfile::TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_scan(dir.path().join("missing"), tx).unwrap();

        match rx.recv().await {
            Some(Event::ScanComplete(Err(msg))) => assert!(msg.contains("I/O error")),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
