//! Config builder: turns a read [`Document`] into a [`Config`] snapshot.
//!
//! Building is all-or-nothing. The first entry that fails to resolve aborts
//! the build with a [`ConfigError::Entry`] naming its section, index and
//! field; no partially populated snapshot ever leaves this module.

use crate::arg::{self, ArgFields, ArgValue};
use crate::config::{
    Appearance, ButtonCommand, ColorScheme, Colors, Config, KeyCommand, LayoutSettings, Rule,
};
use crate::defaults;
use crate::error::{ConfigError, EntryErrorKind, EntryLocation, SectionKind};
use crate::registry::{Action, Click};
use crate::source::{Document, Group, TypeMismatch, Value};
use std::path::Path;
use tagwm_keybindings::{parse_button_binding, parse_key_binding};

/// Exclusive bounds for the master area factor.
const MFACT_MIN: f64 = 0.05;
const MFACT_MAX: f64 = 0.95;

/// Read `path` (and its includes) and build a snapshot from it.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let doc = Document::load(path)?;
    build(&doc)
}

/// Build a snapshot from a read document.
pub fn build(doc: &Document) -> Result<Config, ConfigError> {
    build_group(&doc.root).inspect_err(|e| log::warn!("config build failed: {e}"))
}

/// Build a snapshot from a root settings group.
pub fn build_group(root: &Group) -> Result<Config, ConfigError> {
    let config = Config {
        appearance: appearance(root)?,
        layout: layout_settings(root)?,
        tags: tags(root)?,
        rules: rules(root)?,
        keys: keys(root)?,
        buttons: buttons(root)?,
    };
    log::info!(
        "config built: {} tags, {} rules, {} keys, {} buttons",
        config.tags.len(),
        config.rules.len(),
        config.keys.len(),
        config.buttons.len()
    );
    Ok(config)
}

/// One group being read, and where it sits in the file.
struct Entry<'a> {
    group: &'a Group,
    section: SectionKind,
    index: Option<usize>,
}

impl<'a> Entry<'a> {
    fn location(&self, field: &str) -> EntryLocation {
        EntryLocation::new(self.section, self.index).with_field(field)
    }

    fn fail(&self, field: &str, kind: EntryErrorKind) -> ConfigError {
        ConfigError::entry(self.location(field), kind)
    }

    fn typed<T>(&self, field: &str, found: Result<T, TypeMismatch>) -> Result<T, ConfigError> {
        found.map_err(|m| {
            self.fail(
                field,
                EntryErrorKind::FieldType {
                    expected: m.expected,
                    found: m.found,
                },
            )
        })
    }

    fn bool(&self, field: &str) -> Result<Option<bool>, ConfigError> {
        self.typed(field, self.group.get_bool(field))
    }

    fn int(&self, field: &str) -> Result<Option<i64>, ConfigError> {
        self.typed(field, self.group.get_int(field))
    }

    fn float(&self, field: &str) -> Result<Option<f64>, ConfigError> {
        self.typed(field, self.group.get_float(field))
    }

    fn str(&self, field: &str) -> Result<Option<&'a str>, ConfigError> {
        self.typed(field, self.group.get_str(field))
    }

    fn strings(&self, field: &str) -> Result<Option<Vec<String>>, ConfigError> {
        self.typed(field, self.group.get_strings(field))
    }

    fn require_str(&self, field: &str) -> Result<&'a str, ConfigError> {
        self.str(field)?
            .ok_or_else(|| self.fail(field, EntryErrorKind::MissingField))
    }

    /// A non-negative integer that fits in `u32`.
    fn uint(&self, field: &str) -> Result<Option<u32>, ConfigError> {
        self.int(field)?
            .map(|value| {
                u32::try_from(value).map_err(|_| {
                    self.fail(
                        field,
                        EntryErrorKind::OutOfRange {
                            value: value.to_string(),
                            range: "0..=4294967295",
                        },
                    )
                })
            })
            .transpose()
    }

    fn monitor(&self, field: &str) -> Result<Option<i32>, ConfigError> {
        self.int(field)?
            .map(|value| {
                i32::try_from(value).map_err(|_| {
                    self.fail(
                        field,
                        EntryErrorKind::OutOfRange {
                            value: value.to_string(),
                            range: "a 32-bit monitor index",
                        },
                    )
                })
            })
            .transpose()
    }

    fn action(&self) -> Result<Action, ConfigError> {
        let name = self.require_str("func")?;
        Action::from_name(name)
            .ok_or_else(|| self.fail("func", EntryErrorKind::UnknownAction(name.to_string())))
    }

    fn arg(&self) -> Result<ArgValue, ConfigError> {
        let fields = ArgFields {
            text: self.str("cmd")?,
            int: self.int("i")?,
            float: self.float("f")?.map(|f| f as f32),
            layout: self.str("layout")?,
        };
        arg::resolve(&fields)
            .map_err(|name| self.fail("layout", EntryErrorKind::UnknownLayout(name)))
    }
}

/// The single group for `kind`, if present.
fn section(root: &Group, kind: SectionKind) -> Result<Option<Entry<'_>>, ConfigError> {
    match root.get(kind.name()) {
        None => Ok(None),
        Some(Value::Group(group)) => Ok(Some(Entry {
            group,
            section: kind,
            index: None,
        })),
        Some(other) => Err(ConfigError::entry(
            EntryLocation::new(kind, None),
            EntryErrorKind::FieldType {
                expected: "group",
                found: other.type_name(),
            },
        )),
    }
}

/// Every repeated group for `kind`, in file order.
fn repeated(root: &Group, kind: SectionKind) -> Result<Vec<Entry<'_>>, ConfigError> {
    root.sections(kind.name())
        .enumerate()
        .map(|(index, value)| match value {
            Value::Group(group) => Ok(Entry {
                group,
                section: kind,
                index: Some(index),
            }),
            other => Err(ConfigError::entry(
                EntryLocation::new(kind, Some(index)),
                EntryErrorKind::FieldType {
                    expected: "group",
                    found: other.type_name(),
                },
            )),
        })
        .collect()
}

fn appearance(root: &Group) -> Result<Appearance, ConfigError> {
    let mut appearance = defaults::appearance();
    let Some(entry) = section(root, SectionKind::Appearance)? else {
        return Ok(appearance);
    };

    if let Some(v) = entry.uint("borderpx")? {
        appearance.borderpx = v;
    }
    if let Some(v) = entry.uint("snap")? {
        appearance.snap = v;
    }
    if let Some(v) = entry.uint("gappx")? {
        appearance.gappx = v;
    }
    if let Some(v) = entry.bool("showbar")? {
        appearance.showbar = v;
    }
    if let Some(v) = entry.bool("topbar")? {
        appearance.topbar = v;
    }
    if let Some(v) = entry.strings("fonts")? {
        appearance.fonts = v;
    }
    if let Some(colors) = entry.typed("colors", entry.group.get_group("colors"))? {
        appearance.colors = color_schemes(&entry, colors, appearance.colors)?;
    }
    Ok(appearance)
}

fn color_schemes(
    entry: &Entry<'_>,
    group: &Group,
    mut colors: Colors,
) -> Result<Colors, ConfigError> {
    for (name, slot) in [("norm", &mut colors.norm), ("sel", &mut colors.sel)] {
        let field = format!("colors.{name}");
        let Some(values) = entry.typed(&field, group.get_strings(name))? else {
            continue;
        };
        let [fg, bg, border] = values.as_slice() else {
            return Err(entry.fail(
                &field,
                EntryErrorKind::OutOfRange {
                    value: format!("{} colours", values.len()),
                    range: "exactly 3 colours [fg, bg, border]",
                },
            ));
        };
        for color in [fg, bg, border] {
            if !is_color(color) {
                return Err(entry.fail(&field, EntryErrorKind::InvalidColor(color.clone())));
            }
        }
        *slot = ColorScheme::new(fg, bg, border);
    }
    Ok(colors)
}

fn is_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn layout_settings(root: &Group) -> Result<LayoutSettings, ConfigError> {
    let mut layout = defaults::layout_settings();
    let Some(entry) = section(root, SectionKind::Layout)? else {
        return Ok(layout);
    };

    if let Some(mfact) = entry.float("mfact")? {
        if mfact <= MFACT_MIN || mfact >= MFACT_MAX {
            return Err(entry.fail(
                "mfact",
                EntryErrorKind::OutOfRange {
                    value: mfact.to_string(),
                    range: "strictly between 0.05 and 0.95",
                },
            ));
        }
        layout.mfact = mfact as f32;
    }
    if let Some(v) = entry.uint("nmaster")? {
        layout.nmaster = v;
    }
    if let Some(v) = entry.bool("resizehints")? {
        layout.resizehints = v;
    }
    if let Some(v) = entry.bool("lockfullscreen")? {
        layout.lockfullscreen = v;
    }
    if let Some(v) = entry.uint("refreshrate")? {
        layout.refreshrate = v;
    }
    Ok(layout)
}

fn tags(root: &Group) -> Result<Vec<String>, ConfigError> {
    let items = match root.get(SectionKind::Tags.name()) {
        None => return Ok(defaults::tags()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ConfigError::entry(
                EntryLocation::new(SectionKind::Tags, None),
                EntryErrorKind::FieldType {
                    expected: "array of strings",
                    found: other.type_name(),
                },
            ));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Str(name) => Ok(name.clone()),
            other => Err(ConfigError::entry(
                EntryLocation::new(SectionKind::Tags, Some(index)),
                EntryErrorKind::FieldType {
                    expected: "string",
                    found: other.type_name(),
                },
            )),
        })
        .collect()
}

fn rules(root: &Group) -> Result<Vec<Rule>, ConfigError> {
    repeated(root, SectionKind::Rule)?
        .iter()
        .map(|entry| {
            let rule = Rule {
                class: entry.str("class")?.map(str::to_string),
                instance: entry.str("instance")?.map(str::to_string),
                title: entry.str("title")?.map(str::to_string),
                tags: entry.uint("tagmask")?.unwrap_or(0),
                isfloating: entry.bool("floating")?.unwrap_or(false),
                monitor: entry.monitor("monitor")?.unwrap_or(-1),
            };
            log::trace!("rule[{}]: {rule:?}", entry.index.unwrap_or_default());
            Ok(rule)
        })
        .collect()
}

fn keys(root: &Group) -> Result<Vec<KeyCommand>, ConfigError> {
    repeated(root, SectionKind::Key)?
        .iter()
        .map(|entry| {
            let input = entry.require_str("bind")?;
            let binding = parse_key_binding(input).map_err(|source| {
                entry.fail(
                    "bind",
                    EntryErrorKind::Binding {
                        input: input.to_string(),
                        source,
                    },
                )
            })?;
            let command = KeyCommand {
                binding,
                action: entry.action()?,
                arg: entry.arg()?,
            };
            log::trace!(
                "key[{}]: {} -> {}",
                entry.index.unwrap_or_default(),
                command.binding,
                command.action
            );
            Ok(command)
        })
        .collect()
}

fn buttons(root: &Group) -> Result<Vec<ButtonCommand>, ConfigError> {
    repeated(root, SectionKind::Button)?
        .iter()
        .map(|entry| {
            let click_name = entry.require_str("click")?;
            let click = Click::from_name(click_name).ok_or_else(|| {
                entry.fail(
                    "click",
                    EntryErrorKind::UnknownClick(click_name.to_string()),
                )
            })?;
            let input = entry.require_str("bind")?;
            let binding = parse_button_binding(input).map_err(|source| {
                entry.fail(
                    "bind",
                    EntryErrorKind::Binding {
                        input: input.to_string(),
                        source,
                    },
                )
            })?;
            let command = ButtonCommand {
                click,
                binding,
                action: entry.action()?,
                arg: entry.arg()?,
            };
            log::trace!(
                "button[{}]: {} on {} -> {}",
                entry.index.unwrap_or_default(),
                command.binding,
                command.click,
                command.action
            );
            Ok(command)
        })
        .collect()
}
