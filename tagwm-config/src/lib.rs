//! Configuration core for the tagwm window manager.
//!
//! Reads a declarative config file, resolves every binding, rule and
//! setting in it, and publishes the result as an immutable [`Config`]
//! snapshot through a [`ConfigManager`]:
//!
//! - [`source`]: the file reader (YAML and TOML syntax, `include`)
//! - [`builder`]: all-or-nothing construction of a [`Config`]
//! - [`registry`]: closed action, layout and click-region tables
//! - [`defaults`]: the built-in snapshot used before any file is loaded
//! - [`manager`]: the current-snapshot lifecycle
//! - [`watcher`]: file change notifications for hot reload

pub mod arg;
pub mod builder;
pub mod config;
pub mod defaults;
pub mod error;
pub mod manager;
pub mod registry;
pub mod source;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use arg::{ArgFields, ArgTarget, ArgValue};
pub use config::{
    Appearance, ButtonCommand, ColorScheme, Colors, Config, KeyCommand, LayoutSettings, Rule,
};
pub use error::{ConfigError, EntryErrorKind, EntryLocation, SectionKind};
pub use manager::{ConfigManager, State};
pub use registry::{Action, ArgKind, Arrange, Click, LAYOUTS, Layout, LayoutRef};
pub use source::{Document, Format, Group, Value};
#[cfg(feature = "watcher")]
pub use watcher::{ConfigReloadEvent, ConfigWatcher};
