//! Declarative config-file reader.
//!
//! Reads a config file into a [`Document`]: a tree of named settings that the
//! builder queries by section name and field type. Two surface syntaxes are
//! understood and produce the same tree:
//!
//! - [`yaml`]: YAML (default, and any extension other than `.toml`)
//! - [`toml`]: TOML, for files ending in `.toml`
//!
//! An `include` key (a path or a list of paths) is expanded while reading,
//! so the builder only ever sees one merged tree.

pub mod toml;
pub mod yaml;

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Include nesting limit.
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// A setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Group(Group),
}

impl Value {
    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Group(_) => "group",
        }
    }
}

/// A value of the wrong type for the field it was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// An ordered list of named settings.
///
/// Names may repeat; repeated groups are how `rule`, `key` and `button`
/// sections are written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    settings: Vec<(String, Value)>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.settings.push((name.into(), value));
    }

    pub fn extend(&mut self, other: Group) {
        self.settings.extend(other.settings);
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.settings
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// The last setting named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.settings
            .iter()
            .rev()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value)
    }

    /// Every section named `name`, in file order.
    ///
    /// A setting whose value is an array contributes each of its elements, so
    /// a YAML `key:` sequence, a TOML `[[key]]` array and a `key` repeated
    /// through includes all read the same.
    pub fn sections<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.settings
            .iter()
            .filter(move |(candidate, _)| candidate == name)
            .flat_map(|(_, value)| match value {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
    }

    pub fn section_count(&self, name: &str) -> usize {
        self.sections(name).count()
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, TypeMismatch> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch("boolean", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i64>, TypeMismatch> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(mismatch("integer", other)),
        }
    }

    /// Integers are accepted where a float is expected.
    pub fn get_float(&self, name: &str) -> Result<Option<f64>, TypeMismatch> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(Value::Int(i)) => Ok(Some(*i as f64)),
            Some(other) => Err(mismatch("float", other)),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>, TypeMismatch> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch("string", other)),
        }
    }

    pub fn get_strings(&self, name: &str) -> Result<Option<Vec<String>>, TypeMismatch> {
        let items = match self.get(name) {
            None => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(mismatch("array of strings", other)),
        };
        items
            .iter()
            .map(|item| match item {
                Value::Str(s) => Ok(s.clone()),
                other => Err(mismatch("string", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn get_group(&self, name: &str) -> Result<Option<&Group>, TypeMismatch> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Group(g)) => Ok(Some(g)),
            Some(other) => Err(mismatch("group", other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> TypeMismatch {
    TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

/// Surface syntax of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// A fully read config file with its includes expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Group,
    /// Every file that contributed to `root`, main file first.
    pub files: Vec<PathBuf>,
}

impl Document {
    /// Read and parse a config file and everything it includes.
    pub fn load(path: &Path) -> Result<Document, ConfigError> {
        let mut loader = Loader::default();
        let root = loader.load_file(path)?;
        Ok(Document {
            root,
            files: loader.files,
        })
    }

    /// Parse config text. Relative includes resolve against `origin`'s
    /// directory.
    pub fn parse_str(text: &str, format: Format, origin: &Path) -> Result<Document, ConfigError> {
        let mut loader = Loader::default();
        loader.stack.push(normalize(origin));
        let root = loader.parse_text(text, format, origin)?;
        Ok(Document {
            root,
            files: loader.files,
        })
    }
}

/// Tracks the include chain while reading.
#[derive(Debug, Default)]
pub(crate) struct Loader {
    stack: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl Loader {
    fn load_file(&mut self, path: &Path) -> Result<Group, ConfigError> {
        if self.stack.len() > MAX_INCLUDE_DEPTH {
            return Err(ConfigError::IncludeDepth {
                path: path.to_path_buf(),
            });
        }
        let key = normalize(path);
        if self.stack.contains(&key) {
            return Err(ConfigError::IncludeCycle {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("reading config file {}", path.display());

        self.files.push(path.to_path_buf());
        self.stack.push(key);
        let result = self.parse_text(&text, Format::from_path(path), path);
        self.stack.pop();
        result
    }

    fn parse_text(
        &mut self,
        text: &str,
        format: Format,
        path: &Path,
    ) -> Result<Group, ConfigError> {
        match format {
            Format::Yaml => yaml::parse(text, path, self),
            Format::Toml => toml::parse(text, path, self),
        }
    }

    /// Expand an include directive found in `from`.
    pub(crate) fn include(&mut self, from: &Path, target: &str) -> Result<Group, ConfigError> {
        let target = Path::new(target);
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            from.parent()
                .map(|dir| dir.join(target))
                .unwrap_or_else(|| target.to_path_buf())
        };
        log::debug!("{} includes {}", from.display(), resolved.display());
        self.load_file(&resolved)
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
