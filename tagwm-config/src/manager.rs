//! Config lifecycle manager.
//!
//! Owns the one "current" [`Config`] snapshot. The manager starts either on a
//! built-in default (state [`State::NoneLoaded`]) or on a first loaded file.
//! Every successful [`ConfigManager::load`] publishes a new snapshot and drops
//! the one it replaces, unless that was the built-in default, which is
//! `'static` and never released. A failed load changes nothing.
//!
//! Readers borrow the snapshot through [`ConfigManager::current`]; because
//! `load` takes `&mut self`, no borrowed snapshot can outlive a reload.

use crate::builder;
use crate::config::Config;
use crate::defaults;
use crate::error::ConfigError;
use crate::source::Document;
use std::path::{Path, PathBuf};

/// Which kind of snapshot is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The built-in default is current.
    NoneLoaded,
    /// A snapshot built from a file is current.
    Loaded,
}

#[derive(Debug)]
enum Current {
    Builtin(&'static Config),
    Owned(Box<Config>),
}

/// Holds the current config snapshot and swaps it on reload.
///
/// Not meant for concurrent loads; callers serialize reloads on one thread.
#[derive(Debug)]
pub struct ConfigManager {
    current: Current,
    path: Option<PathBuf>,
    sources: Vec<PathBuf>,
    generation: u64,
    released: u64,
}

impl ConfigManager {
    /// Start with the built-in default current.
    pub fn with_builtin() -> Self {
        Self::with_default(defaults::builtin())
    }

    /// Start with a caller-supplied immutable default current.
    pub fn with_default(default: &'static Config) -> Self {
        Self {
            current: Current::Builtin(default),
            path: None,
            sources: Vec::new(),
            generation: 0,
            released: 0,
        }
    }

    /// Start from a config file, with no default to fall back on.
    ///
    /// A failure here is returned as-is; deciding whether it is fatal is up
    /// to the caller.
    pub fn load_initial(path: &Path) -> Result<Self, ConfigError> {
        let (config, sources) = read(path).inspect_err(|e| {
            log::error!("initial config load from {} failed: {e}", path.display())
        })?;
        log::info!("config loaded from {} (generation 1)", path.display());
        Ok(Self {
            current: Current::Owned(Box::new(config)),
            path: Some(path.to_path_buf()),
            sources,
            generation: 1,
            released: 0,
        })
    }

    /// Build `path` and, on success, make it the current snapshot.
    ///
    /// On failure the current snapshot, state and counters are left exactly
    /// as they were.
    pub fn load(&mut self, path: &Path) -> Result<(), ConfigError> {
        let (config, sources) = match read(path) {
            Ok(built) => built,
            Err(e) => {
                log::error!(
                    "config load from {} failed, keeping generation {}: {e}",
                    path.display(),
                    self.generation
                );
                return Err(e);
            }
        };

        let previous = std::mem::replace(&mut self.current, Current::Owned(Box::new(config)));
        let from = match previous {
            Current::Builtin(_) => State::NoneLoaded,
            Current::Owned(old) => {
                drop(old);
                self.released += 1;
                State::Loaded
            }
        };
        self.generation += 1;
        self.path = Some(path.to_path_buf());
        self.sources = sources;

        log::info!(
            "config loaded from {}: {from:?} -> Loaded (generation {}, {} released)",
            path.display(),
            self.generation,
            self.released
        );
        Ok(())
    }

    /// Load the last successfully loaded path again.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let path = self.path.clone().ok_or(ConfigError::NotLoaded)?;
        self.load(&path)
    }

    /// The current snapshot.
    pub fn current(&self) -> &Config {
        match &self.current {
            Current::Builtin(config) => *config,
            Current::Owned(config) => config.as_ref(),
        }
    }

    pub fn state(&self) -> State {
        match self.current {
            Current::Builtin(_) => State::NoneLoaded,
            Current::Owned(_) => State::Loaded,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.state() == State::NoneLoaded
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of loaded snapshots dropped after being superseded.
    pub fn released(&self) -> u64 {
        self.released
    }

    /// Path of the current snapshot's main file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Every file the current snapshot was built from, main file first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn read(path: &Path) -> Result<(Config, Vec<PathBuf>), ConfigError> {
    let doc = Document::load(path)?;
    let config = builder::build(&doc)?;
    Ok((config, doc.files))
}
