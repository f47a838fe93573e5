//! # Session Watcher
//!
//! Wakes the dispatch loop when the backend touches its `out` file.
//!
//! Two backends feed the same channel, so the loop always has exactly one
//! place to wait on:
//!
//! - [`WatchMode::Notify`]: filesystem notifications on the session
//!   directory. Writes wake the loop while the user is mid-typing.
//! - [`WatchMode::Poll`]: a tokio interval that compares the file length.
//!   Used when asked for, or when notifications cannot be set up.
//!
//! The watcher only says "something happened". Reading is left to the
//! session's persistent cursor, so spurious wakes are harmless.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::config::WatchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The out file was written to, created, or renamed.
    Changed,
    /// The out file was deleted.
    Removed,
}

enum Backend {
    Notify { _watcher: RecommendedWatcher },
    Poll(JoinHandle<()>),
}

pub struct OutWatcher {
    rx: mpsc::UnboundedReceiver<WatchEvent>,
    backend: Backend,
}

impl OutWatcher {
    /// Start watching `out_path`. Must be called from within a tokio runtime.
    pub fn start(out_path: &Path, mode: WatchMode, poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let backend = match mode {
            WatchMode::Notify => match start_notify(out_path, tx.clone()) {
                Ok(watcher) => {
                    info!("Watching {} with filesystem notifications", out_path.display());
                    Backend::Notify { _watcher: watcher }
                }
                Err(e) => {
                    warn!("Filesystem notifications unavailable ({}), falling back to polling", e);
                    Backend::Poll(start_poll(out_path.to_path_buf(), poll_interval, tx))
                }
            },
            WatchMode::Poll => {
                info!(
                    "Polling {} every {}ms",
                    out_path.display(),
                    poll_interval.as_millis()
                );
                Backend::Poll(start_poll(out_path.to_path_buf(), poll_interval, tx))
            }
        };

        Self { rx, backend }
    }

    pub fn mode(&self) -> WatchMode {
        match self.backend {
            Backend::Notify { .. } => WatchMode::Notify,
            Backend::Poll(_) => WatchMode::Poll,
        }
    }

    /// Wait for the next event. `None` once the watcher has stopped.
    pub async fn next(&mut self) -> Option<WatchEvent> {
        self.rx.recv().await
    }

    /// Collapse already queued events into the most significant one.
    pub fn drain(&mut self, first: WatchEvent) -> WatchEvent {
        let mut merged = first;
        while let Ok(event) = self.rx.try_recv() {
            if event == WatchEvent::Removed {
                merged = WatchEvent::Removed;
            }
        }
        merged
    }
}

impl Drop for OutWatcher {
    fn drop(&mut self) {
        if let Backend::Poll(handle) = &self.backend {
            handle.abort();
        }
    }
}

fn start_notify(
    out_path: &Path,
    tx: mpsc::UnboundedSender<WatchEvent>,
) -> notify::Result<RecommendedWatcher> {
    let file_name = out_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    let dir = out_path.parent().unwrap_or(Path::new(".")).to_path_buf();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                if let Some(watch_event) = classify(&event, &file_name) {
                    let _ = tx.send(watch_event);
                }
            }
            Err(e) => warn!("Watch error: {}", e),
        }
    })?;
    // The directory, not the file, so deletion and re-creation are seen.
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Map a raw notification to a watch event if it concerns the out file.
fn classify(event: &Event, file_name: &OsString) -> Option<WatchEvent> {
    let concerns_out = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()));
    if !concerns_out {
        return None;
    }
    match event.kind {
        // Our own reads can bump atime; attribute changes carry no new lines.
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed),
        EventKind::Remove(_) => Some(WatchEvent::Removed),
        // Our own reads show up as access events.
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

fn start_poll(
    out_path: PathBuf,
    interval: Duration,
    tx: mpsc::UnboundedSender<WatchEvent>,
) -> JoinHandle<()> {
    // Sampled before spawning so writes racing the first tick still count.
    let mut last_len = std::fs::metadata(&out_path).map(|m| m.len()).ok();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let len = match tokio::fs::metadata(&out_path).await {
                Ok(meta) => meta.len(),
                Err(e) => {
                    debug!("Poll: {} unreadable: {}", out_path.display(), e);
                    let _ = tx.send(WatchEvent::Removed);
                    return;
                }
            };
            if last_len != Some(len) {
                last_len = Some(len);
                if tx.send(WatchEvent::Changed).is_err() {
                    return;
                }
            }
        }
    })
}
