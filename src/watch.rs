//! Re-run a callback whenever a catalog file changes on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub enum WatchError {
    Notify(notify::Error),
    Signal(ctrlc::Error),
    Io(std::io::Error),
    NotAFile(PathBuf),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notify(err) => write!(f, "{err}"),
            Self::Signal(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::NotAFile(path) => write!(f, "cannot watch `{}`: not a file", path.display()),
        }
    }
}

impl std::error::Error for WatchError {}

impl From<notify::Error> for WatchError {
    fn from(value: notify::Error) -> Self {
        Self::Notify(value)
    }
}

impl From<ctrlc::Error> for WatchError {
    fn from(value: ctrlc::Error) -> Self {
        Self::Signal(value)
    }
}

impl From<std::io::Error> for WatchError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Returns a flag that flips to `false` on Ctrl-C. Only one handler may be
/// installed per process.
pub fn interrupt_flag() -> Result<Arc<AtomicBool>, WatchError> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;
    Ok(running)
}

/// True when `event` changes the content or presence of `target`.
pub fn event_touches(event: &Event, target: &Path) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    if !relevant_kind {
        return false;
    }
    let Some(name) = target.file_name() else {
        return false;
    };
    event
        .paths
        .iter()
        .any(|path| path == target || path.file_name() == Some(name))
}

/// Blocks until `running` is cleared, calling `on_change` once per burst of
/// filesystem events on `path`.
///
/// The parent directory is watched so editors that save by rename are seen.
pub fn watch_file<F>(path: &Path, running: &AtomicBool, mut on_change: F) -> Result<(), WatchError>
where
    F: FnMut(),
{
    if !path.is_file() {
        return Err(WatchError::NotAFile(path.to_path_buf()));
    }
    let target = path.canonicalize()?;
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    debug!(path = %target.display(), "watching catalog");

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if !event_touches(&event, &target) {
                    continue;
                }
                while rx.recv_timeout(DEBOUNCE).is_ok() {}
                debug!(path = %target.display(), "catalog changed");
                on_change();
            }
            Ok(Err(err)) => warn!(error = %err, "watch event error"),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}
