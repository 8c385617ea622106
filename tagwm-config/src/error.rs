//! Typed error variants for the tagwm-config crate.
//!
//! Every failure while reading or building a configuration ends up as a
//! [`ConfigError`]. Entry-level failures carry an [`EntryLocation`] naming the
//! section, the entry index and the field, so a rejected reload can be traced
//! back to the exact line of the file that caused it:
//!
//! ```text
//! key[3].func: unknown action 'spwan'
//! appearance.borderpx: expected integer, found string
//! button[0].bind: invalid binding 'super + lft': unknown button 'lft'
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tagwm_keybindings::BindingError;
use thiserror::Error;

/// The part of the file an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Appearance,
    Layout,
    Tags,
    Rule,
    Key,
    Button,
}

impl SectionKind {
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Appearance => "appearance",
            SectionKind::Layout => "layout",
            SectionKind::Tags => "tags",
            SectionKind::Rule => "rule",
            SectionKind::Key => "key",
            SectionKind::Button => "button",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where in the configuration an entry-level error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocation {
    pub section: SectionKind,
    /// Position among repeated sections (`rule`, `key`, `button`) or in the
    /// tag list. `None` for the single `appearance` and `layout` groups.
    pub index: Option<usize>,
    pub field: Option<String>,
}

impl EntryLocation {
    pub fn new(section: SectionKind, index: Option<usize>) -> Self {
        Self {
            section,
            index,
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        if let Some(field) = &self.field {
            write!(f, ".{field}")?;
        }
        Ok(())
    }
}

/// What was wrong with a single entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryErrorKind {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("unknown click region '{0}'")]
    UnknownClick(String),

    #[error("invalid binding '{input}': {source}")]
    Binding {
        input: String,
        #[source]
        source: BindingError,
    },

    #[error("expected {expected}, found {found}")]
    FieldType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing required field")]
    MissingField,

    #[error("value {value} is outside {range}")]
    OutOfRange { value: String, range: &'static str },

    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Errors that can occur when loading or building a configuration.
///
/// Building is all-or-nothing: any of these aborts the whole build and no
/// partially populated `Config` is ever returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file, or a file it includes, could not be read.
    #[error("cannot read config file '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid in its surface syntax.
    #[error("{}:{line}:{column}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("include cycle: '{}' is already being read", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("includes nested too deeply at '{}'", path.display())]
    IncludeDepth { path: PathBuf },

    /// A single entry could not be resolved.
    #[error("{location}: {kind}")]
    Entry {
        location: EntryLocation,
        kind: EntryErrorKind,
    },

    /// `reload` was requested before any file was loaded.
    #[error("no configuration file has been loaded")]
    NotLoaded,
}

impl ConfigError {
    pub(crate) fn entry(location: EntryLocation, kind: EntryErrorKind) -> Self {
        ConfigError::Entry { location, kind }
    }

    /// The entry location, for entry-level errors.
    pub fn location(&self) -> Option<&EntryLocation> {
        match self {
            ConfigError::Entry { location, .. } => Some(location),
            _ => None,
        }
    }

    /// The entry-level cause, for entry-level errors.
    pub fn kind(&self) -> Option<&EntryErrorKind> {
        match self {
            ConfigError::Entry { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = EntryLocation::new(SectionKind::Key, Some(3)).with_field("func");
        assert_eq!(loc.to_string(), "key[3].func");

        let loc = EntryLocation::new(SectionKind::Appearance, None).with_field("borderpx");
        assert_eq!(loc.to_string(), "appearance.borderpx");

        let loc = EntryLocation::new(SectionKind::Tags, Some(2));
        assert_eq!(loc.to_string(), "tags[2]");
    }

    #[test]
    fn test_entry_error_display() {
        let err = ConfigError::entry(
            EntryLocation::new(SectionKind::Key, Some(3)).with_field("func"),
            EntryErrorKind::UnknownAction("spwan".to_string()),
        );
        assert_eq!(err.to_string(), "key[3].func: unknown action 'spwan'");
    }

    #[test]
    fn test_binding_error_display() {
        let err = ConfigError::entry(
            EntryLocation::new(SectionKind::Button, Some(0)).with_field("bind"),
            EntryErrorKind::Binding {
                input: "super + lft".to_string(),
                source: BindingError::UnknownButton("lft".to_string()),
            },
        );
        assert_eq!(
            err.to_string(),
            "button[0].bind: invalid binding 'super + lft': unknown button 'lft'"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = ConfigError::Syntax {
            path: PathBuf::from("/tmp/tagwm.toml"),
            line: 4,
            column: 12,
            message: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "/tmp/tagwm.toml:4:12: expected value");
    }
}
