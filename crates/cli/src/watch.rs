//! File watcher that feeds on-disk edits to a [`FileSession`].
//!
//! The parent directory is watched rather than the file itself so editors that
//! save by rename-and-replace keep producing events.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::session::FileSession;

/// Start watching the directory holding `path`. Events are forwarded to `tx`.
/// The returned handle must be kept alive; dropping it stops the watcher.
pub fn start_watcher(
    path: &Path,
    tx: mpsc::Sender<Event>,
) -> Result<RecommendedWatcher, HostError> {
    let watch_err = |source| HostError::Watch { path: path.to_path_buf(), source };

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => warn!(error = %e, "Watch error"),
        },
        notify::Config::default(),
    )
    .map_err(watch_err)?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    watcher.watch(dir, RecursiveMode::NonRecursive).map_err(watch_err)?;
    info!(path = %path.display(), "Watching");
    Ok(watcher)
}

/// Whether `event` touches the watched file.
fn is_relevant(event: &Event, target: &Path) -> bool {
    let touches_kind =
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_));
    touches_kind && event.paths.iter().any(|p| p.file_name() == target.file_name())
}

/// Collect events and process the file once it has been quiet for `debounce`.
/// Events for other files in the directory neither reset nor delay the
/// deadline. Ends when the channel closes or the file disappears, deactivating
/// the session. Returns the number of stub edits applied.
pub fn debounce_loop(
    rx: mpsc::Receiver<Event>,
    mut session: FileSession,
    debounce: Duration,
) -> usize {
    let mut pending: Option<Instant> = None;
    let mut applied = 0usize;

    loop {
        let wait = match pending {
            Some(since) => debounce.saturating_sub(since.elapsed()),
            None => debounce,
        };
        match rx.recv_timeout(wait) {
            Ok(event) => {
                if is_relevant(&event, session.path()) {
                    pending = Some(Instant::now());
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                if pending.is_some() {
                    flush(&mut session, &mut applied);
                }
                break;
            }
        }

        // Checked after every wakeup, not only on timeouts.
        if pending.is_some_and(|since| since.elapsed() >= debounce) {
            pending = None;
            if !flush(&mut session, &mut applied) {
                break;
            }
        }
    }

    session.deactivate();
    applied
}

/// Process the session once. Returns false when the file is gone.
fn flush(session: &mut FileSession, applied: &mut usize) -> bool {
    if !session.path().exists() {
        info!(path = %session.path().display(), "File removed, stopping");
        return false;
    }
    match session.on_change() {
        Ok(actions) => {
            for action in &actions {
                debug!(function = action.function(), "Applied stub edit");
            }
            *applied += actions.len();
        }
        Err(e) => warn!(error = %e, "Failed to process change"),
    }
    true
}
