//! Command-line interface for tagwm.
//!
//! Subcommands inspect a config file without starting the window manager:
//! `check` validates it, `dump` prints the resolved snapshot, `keys` prints
//! the binding tables and `watch` keeps reloading it as it changes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tagwm_config::{ArgTarget, ArgValue, Config, ConfigManager, ConfigWatcher, defaults};

/// tagwm - a tag-based tiling window manager
#[derive(Parser, Debug)]
#[command(name = "tagwm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a config file and report whether it is valid
    Check {
        /// Config file to check (default: ~/.config/tagwm/tagwm.yaml)
        path: Option<PathBuf>,
    },

    /// Print the resolved configuration as YAML
    Dump {
        /// Config file (default: the user's config, else the built-in default)
        path: Option<PathBuf>,
    },

    /// Print the key and button binding tables
    Keys {
        /// Config file (default: the user's config, else the built-in default)
        path: Option<PathBuf>,
    },

    /// Load a config file and reload it whenever it changes
    Watch {
        /// Config file to watch (default: ~/.config/tagwm/tagwm.yaml)
        path: Option<PathBuf>,

        /// Debounce delay for file change events, in milliseconds
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
}

/// Run a parsed command line. Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check { path } => check(&config_file(path), &mut std::io::stdout().lock()),
        Commands::Dump { path } => {
            dump(&snapshot(path.as_deref())?, &mut std::io::stdout().lock())?;
            Ok(0)
        }
        Commands::Keys { path } => {
            keys(&snapshot(path.as_deref())?, &mut std::io::stdout().lock())?;
            Ok(0)
        }
        Commands::Watch { path, debounce_ms } => watch(&config_file(path), debounce_ms),
    }
}

/// `path`, or the user's config file when none is given.
pub fn config_file(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(defaults::config_path)
}

/// The config at `path`; without one, the user's config file if it exists,
/// else the built-in default.
fn snapshot(path: Option<&Path>) -> Result<Config> {
    let user_config = defaults::config_path();
    let path = match path {
        Some(path) => path,
        None if user_config.exists() => user_config.as_path(),
        None => {
            log::info!(
                "no config at {}, using built-in defaults",
                user_config.display()
            );
            return Ok(defaults::builtin().clone());
        }
    };
    Config::load(path).with_context(|| format!("loading {}", path.display()))
}

/// Build `path` and print a one-line verdict. Exit code 1 if it is invalid.
pub fn check(path: &Path, out: &mut impl Write) -> Result<i32> {
    match Config::load(path) {
        Ok(config) => {
            writeln!(
                out,
                "{}: ok ({} tags, {} rules, {} keys, {} buttons)",
                path.display(),
                config.tags.len(),
                config.rules.len(),
                config.keys.len(),
                config.buttons.len()
            )?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "{}: error: {e}", path.display())?;
            Ok(1)
        }
    }
}

pub fn dump(config: &Config, out: &mut impl Write) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(config).context("serializing config")?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}

/// Human-readable form of a binding argument.
pub fn describe_arg(arg: &ArgValue) -> String {
    let mut parts = Vec::new();
    match &arg.target {
        Some(ArgTarget::Text(text)) => parts.push(format!("\"{text}\"")),
        Some(ArgTarget::Layout(layout)) => parts.push(format!("layout={layout}")),
        None => {}
    }
    if let Some(i) = arg.int {
        parts.push(format!("i={i}"));
    }
    if let Some(f) = arg.float {
        parts.push(format!("f={f}"));
    }
    parts.join(" ")
}

pub fn keys(config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "keys ({}):", config.keys.len())?;
    for key in &config.keys {
        writeln!(
            out,
            "  {:<28} {:<15} {}",
            key.binding.to_string(),
            key.action.name(),
            describe_arg(&key.arg)
        )?;
    }
    writeln!(out, "buttons ({}):", config.buttons.len())?;
    for button in &config.buttons {
        writeln!(
            out,
            "  {:<11} {:<16} {:<15} {}",
            button.click.name(),
            button.binding.to_string(),
            button.action.name(),
            describe_arg(&button.arg)
        )?;
    }
    Ok(())
}

/// Load `path`, then reload it through the manager on every change.
///
/// Runs until interrupted. A failed reload keeps the previous snapshot.
fn watch(path: &Path, debounce_ms: u64) -> Result<i32> {
    let mut manager = ConfigManager::with_builtin();
    manager
        .load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    println!(
        "{}: loaded (generation {})",
        path.display(),
        manager.generation()
    );

    let mut watcher = ConfigWatcher::new(manager.sources(), debounce_ms)?;
    loop {
        let Some(event) = watcher.recv_timeout(Duration::from_secs(1)) else {
            continue;
        };
        log::debug!("reload triggered by {}", event.path.display());

        match manager.reload() {
            Ok(()) => {
                println!(
                    "{}: reloaded (generation {}, {} keys)",
                    path.display(),
                    manager.generation(),
                    manager.current().keys.len()
                );
                watcher = refresh_watcher(watcher, manager.sources(), debounce_ms)?;
            }
            Err(e) => {
                eprintln!(
                    "{}: reload failed, keeping generation {}: {e}",
                    path.display(),
                    manager.generation()
                );
            }
        }
    }
}

/// Keep `watcher` if it already covers `sources`, otherwise replace it.
///
/// A reload can add, drop or swap includes without changing how many files
/// there are, so the comparison is on the path set.
pub fn refresh_watcher(
    watcher: ConfigWatcher,
    sources: &[PathBuf],
    debounce_ms: u64,
) -> Result<ConfigWatcher> {
    if watcher.watches(sources) {
        return Ok(watcher);
    }
    log::info!(
        "config sources changed, now watching {} file(s)",
        sources.len()
    );
    drop(watcher);
    ConfigWatcher::new(sources, debounce_ms)
}
