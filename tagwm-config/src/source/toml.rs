//! TOML config files.
//!
//! Tables become groups and arrays of tables (`[[key]]`) become repeated
//! sections. An `include` key (a path or an array of paths) in any table
//! pulls other files in at the point where it appears; table order is kept
//! through the `preserve_order` feature.

use super::{Group, Loader, Value};
use crate::error::ConfigError;
use std::path::Path;
use toml::{Table, Value as Toml};

const INCLUDE_KEY: &str = "include";

pub(crate) fn parse(text: &str, path: &Path, loader: &mut Loader) -> Result<Group, ConfigError> {
    let table: Table = toml::from_str(text).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(text, span.start))
            .unwrap_or((0, 0));
        ConfigError::Syntax {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message().to_string(),
        }
    })?;

    let mut convert = Converter { path, loader };
    convert.group(&table)
}

/// 1-based line and column of byte `offset` in `text`.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}

struct Converter<'a, 'l> {
    path: &'a Path,
    loader: &'l mut Loader,
}

impl Converter<'_, '_> {
    fn group(&mut self, table: &Table) -> Result<Group, ConfigError> {
        let mut group = Group::new();
        for (name, value) in table {
            if name == INCLUDE_KEY {
                self.include(value, &mut group)?;
                continue;
            }
            group.push(name.clone(), self.value(value)?);
        }
        Ok(group)
    }

    fn include(&mut self, node: &Toml, group: &mut Group) -> Result<(), ConfigError> {
        match node {
            Toml::String(target) => {
                let included = self.loader.include(self.path, target)?;
                group.extend(included);
            }
            Toml::Array(targets) => {
                for target in targets {
                    self.include(target, group)?;
                }
            }
            other => {
                return Err(ConfigError::Syntax {
                    path: self.path.to_path_buf(),
                    line: 0,
                    column: 0,
                    message: format!(
                        "'include' takes a path or an array of paths, found {}",
                        other.type_str()
                    ),
                });
            }
        }
        Ok(())
    }

    fn value(&mut self, node: &Toml) -> Result<Value, ConfigError> {
        Ok(match node {
            Toml::Boolean(b) => Value::Bool(*b),
            Toml::Integer(i) => Value::Int(*i),
            Toml::Float(f) => Value::Float(*f),
            Toml::String(s) => Value::Str(s.clone()),
            // No setting takes a date; keep the text so a type error names it.
            Toml::Datetime(dt) => Value::Str(dt.to_string()),
            Toml::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.value(item))
                    .collect::<Result<_, _>>()?,
            ),
            Toml::Table(table) => Value::Group(self.group(table)?),
        })
    }
}
