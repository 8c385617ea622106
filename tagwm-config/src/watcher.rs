//! Config file watcher for automatic reload.
//!
//! Watches the main config file and every file it includes. Bursts of
//! events (editors often write a file several times per save) are debounced
//! into a single [`ConfigReloadEvent`]. Watching only signals; the reload
//! itself is done by the caller through [`ConfigManager::reload`].
//!
//! [`ConfigManager::reload`]: crate::ConfigManager::reload

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A watched file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReloadEvent {
    /// The file that changed.
    pub path: PathBuf,
}

/// Watches a set of config files and sends reload events.
pub struct ConfigWatcher {
    _watcher: Box<dyn Watcher + Send>,
    files: Vec<PathBuf>,
    event_receiver: Receiver<ConfigReloadEvent>,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

/// Shared state of the event handler.
#[derive(Clone)]
struct Handler {
    files: Arc<Vec<PathBuf>>,
    debounce: Duration,
    last_event: Arc<Mutex<Option<Instant>>>,
    tx: Sender<ConfigReloadEvent>,
}

impl Handler {
    fn matching(&self, event: &Event) -> Option<PathBuf> {
        event.paths.iter().find_map(|changed| {
            let name = changed.file_name()?;
            let dir = changed.parent().map(canonical)?;
            self.files
                .iter()
                .find(|file| file.file_name() == Some(name) && file.parent() == Some(dir.as_path()))
                .cloned()
        })
    }

    fn should_send(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last_event.lock();
        match *last {
            Some(previous) if now.duration_since(previous) < self.debounce => {
                log::trace!("debouncing config reload event");
                false
            }
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    fn handle(&self, result: notify::Result<Event>) {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("config watcher error: {e}");
                return;
            }
        };
        // Create covers editors that save by renaming a new file into place.
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        let Some(path) = self.matching(&event) else {
            return;
        };
        if !self.should_send() {
            return;
        }
        log::info!("config file changed: {}", path.display());
        if let Err(e) = self.tx.send(ConfigReloadEvent { path }) {
            log::error!("failed to send config reload event: {e}");
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl ConfigWatcher {
    /// Watch `paths` (the main config file and its includes).
    ///
    /// Uses the platform's native watcher and falls back to polling every
    /// 500 ms when that backend is unavailable.
    ///
    /// # Errors
    /// Fails if `paths` is empty, if any file does not exist, or if neither
    /// backend can watch the containing directories.
    pub fn new(paths: &[PathBuf], debounce_delay_ms: u64) -> Result<Self> {
        if paths.is_empty() {
            anyhow::bail!("no config files to watch");
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            let file = canonical(path);
            if !files.contains(&file) {
                files.push(file);
            }
        }

        let dirs: BTreeSet<PathBuf> = files
            .iter()
            .map(|file| {
                file.parent()
                    .map(Path::to_path_buf)
                    .with_context(|| format!("config path has no parent: {}", file.display()))
            })
            .collect::<Result<_>>()?;

        let (tx, rx) = channel();
        let handler = Handler {
            files: Arc::new(files.clone()),
            debounce: Duration::from_millis(debounce_delay_ms),
            last_event: Arc::new(Mutex::new(None)),
            tx,
        };

        let mut watcher = Self::create_watcher(handler)?;
        for dir in &dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("failed to watch config directory: {}", dir.display()))?;
        }

        log::info!("config hot reload: watching {} file(s)", files.len());

        Ok(Self {
            _watcher: watcher,
            files,
            event_receiver: rx,
        })
    }

    fn create_watcher(handler: Handler) -> Result<Box<dyn Watcher + Send>> {
        let native = handler.clone();
        match notify::recommended_watcher(move |res: notify::Result<Event>| native.handle(res)) {
            Ok(w) => {
                log::debug!("config watcher: using native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!("config watcher: native backend unavailable ({e}); polling instead");
                let poll = PollWatcher::new(
                    move |res: notify::Result<Event>| handler.handle(res),
                    NotifyConfig::default().with_poll_interval(POLL_INTERVAL),
                )
                .context("failed to create fallback PollWatcher")?;
                Ok(Box::new(poll))
            }
        }
    }

    /// The files being watched, canonicalized.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Whether the watched set is exactly `paths`, compared canonicalized.
    pub fn watches(&self, paths: &[PathBuf]) -> bool {
        let wanted: BTreeSet<PathBuf> = paths.iter().map(|path| canonical(path)).collect();
        let watched: BTreeSet<PathBuf> = self.files.iter().cloned().collect();
        wanted == watched
    }

    /// Wait up to `timeout` for the next reload event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConfigReloadEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }
}
