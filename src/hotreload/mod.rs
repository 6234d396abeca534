//! Hot reload of the tuning file.
//!
//! - `notify` watches the file's directory and queues filesystem events
//! - `poll` drains the queue and reloads once per batch of relevant events
//! - A reload is parsed and validated before it replaces the current tuning
//! - On failure the previous tuning stays in effect

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{Tuning, TuningError};

/// Reload bookkeeping, for HUD or debug overlays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReloadStatus {
    pub watched_file: Option<String>,
    pub reload_count: u32,
    pub failed_count: u32,
    pub last_reload_success: bool,
    pub last_error: Option<String>,
}

pub struct TuningWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    receiver: Mutex<Receiver<notify::Result<Event>>>,
    current: Tuning,
    status: ReloadStatus,
}

impl std::fmt::Debug for TuningWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuningWatcher")
            .field("path", &self.path)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl TuningWatcher {
    /// Load `path` and start watching it. Fails if the initial load fails.
    pub fn watch(path: impl Into<PathBuf>) -> Result<Self, TuningError> {
        let path = path.into();
        let current = Tuning::load(&path)?;

        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(watch_dir(&path), RecursiveMode::NonRecursive)?;

        info!(path = %path.display(), "tuning hot-reload enabled");

        Ok(Self {
            status: ReloadStatus {
                watched_file: Some(path.display().to_string()),
                ..Default::default()
            },
            path,
            _watcher: watcher,
            receiver: Mutex::new(rx),
            current,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> &Tuning {
        &self.current
    }

    pub fn status(&self) -> &ReloadStatus {
        &self.status
    }

    /// Drain pending filesystem events. Returns `None` when nothing relevant
    /// happened, otherwise the result of one reload.
    pub fn poll(&mut self) -> Option<Result<Tuning, TuningError>> {
        let receiver = match self.receiver.get_mut() {
            Ok(receiver) => receiver,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut changed = false;
        while let Ok(result) = receiver.try_recv() {
            match result {
                Ok(event) => changed |= is_tuning_modify_event(&event, &self.path),
                Err(e) => warn!("tuning watcher error: {}", e),
            }
        }

        changed.then(|| self.reload_now())
    }

    /// Reload immediately, keeping the previous tuning on failure
    pub fn reload_now(&mut self) -> Result<Tuning, TuningError> {
        match Tuning::load(&self.path) {
            Ok(tuning) => {
                self.status.reload_count += 1;
                self.status.last_reload_success = true;
                self.status.last_error = None;
                self.current = tuning.clone();
                info!(count = self.status.reload_count, "tuning reloaded");
                Ok(tuning)
            }
            Err(e) => {
                self.status.failed_count += 1;
                self.status.last_reload_success = false;
                self.status.last_error = Some(e.to_string());
                error!("tuning reload failed, keeping previous values: {}", e);
                Err(e)
            }
        }
    }
}

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// True for a write or create touching the watched file
pub fn is_tuning_modify_event(event: &Event, watched: &Path) -> bool {
    let relevant_kind = event.kind.is_modify() || matches!(event.kind, EventKind::Create(_));
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == watched.file_name())
}
