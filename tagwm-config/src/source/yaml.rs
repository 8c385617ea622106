//! YAML config files.
//!
//! The YAML tree is converted into the [`Group`] shape the builder reads.
//! Mapping order is kept, `null` settings are dropped, and a top-level or
//! nested `include` key (a path or a list of paths) pulls other files in at
//! the point where it appears.

use super::{Group, Loader, Value};
use crate::error::ConfigError;
use serde_yaml_ng::Value as Yaml;
use std::path::Path;

const INCLUDE_KEY: &str = "include";

pub(crate) fn parse(text: &str, path: &Path, loader: &mut Loader) -> Result<Group, ConfigError> {
    let doc: Yaml = serde_yaml_ng::from_str(text).map_err(|e| {
        let (line, column) = e
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        ConfigError::Syntax {
            path: path.to_path_buf(),
            line,
            column,
            message: e.to_string(),
        }
    })?;

    match &doc {
        // An empty file is an empty document.
        Yaml::Null => Ok(Group::new()),
        Yaml::Mapping(_) => {
            let mut convert = Converter { path, loader };
            convert.group(&doc)
        }
        other => Err(syntax(
            path,
            format!("top level must be a mapping, found {}", kind(other)),
        )),
    }
}

struct Converter<'a, 'l> {
    path: &'a Path,
    loader: &'l mut Loader,
}

impl Converter<'_, '_> {
    fn group(&mut self, node: &Yaml) -> Result<Group, ConfigError> {
        let Yaml::Mapping(mapping) = node else {
            return Err(syntax(
                self.path,
                format!("expected a mapping, found {}", kind(node)),
            ));
        };

        let mut group = Group::new();
        for (key, value) in mapping {
            let Yaml::String(name) = key else {
                return Err(syntax(
                    self.path,
                    format!("setting names must be strings, found {}", kind(key)),
                ));
            };
            if name == INCLUDE_KEY {
                self.include(value, &mut group)?;
                continue;
            }
            if let Some(value) = self.value(value)? {
                group.push(name.clone(), value);
            }
        }
        Ok(group)
    }

    fn include(&mut self, node: &Yaml, group: &mut Group) -> Result<(), ConfigError> {
        match untag(node) {
            Yaml::String(target) => {
                let included = self.loader.include(self.path, target)?;
                group.extend(included);
            }
            Yaml::Sequence(targets) => {
                for target in targets {
                    self.include(target, group)?;
                }
            }
            other => {
                return Err(syntax(
                    self.path,
                    format!(
                        "'include' takes a path or a list of paths, found {}",
                        kind(other)
                    ),
                ));
            }
        }
        Ok(())
    }

    fn value(&mut self, node: &Yaml) -> Result<Option<Value>, ConfigError> {
        let value = match node {
            Yaml::Null => return Ok(None),
            Yaml::Bool(b) => Value::Bool(*b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => match n.as_f64() {
                    Some(f) => Value::Float(f),
                    None => return Err(syntax(self.path, format!("number {n} is out of range"))),
                },
            },
            Yaml::String(s) => Value::Str(s.clone()),
            Yaml::Sequence(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(value) = self.value(item)? {
                        values.push(value);
                    }
                }
                Value::Array(values)
            }
            mapping @ Yaml::Mapping(_) => Value::Group(self.group(mapping)?),
            Yaml::Tagged(tagged) => return self.value(&tagged.value),
        };
        Ok(Some(value))
    }
}

fn untag(node: &Yaml) -> &Yaml {
    let mut node = node;
    while let Yaml::Tagged(tagged) = node {
        node = &tagged.value;
    }
    node
}

fn kind(node: &Yaml) -> &'static str {
    match node {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

fn syntax(path: &Path, message: String) -> ConfigError {
    ConfigError::Syntax {
        path: path.to_path_buf(),
        line: 0,
        column: 0,
        message,
    }
}
