//! Binding arguments.
//!
//! An [`ArgValue`] keeps the integer and float slots independent because an
//! entry may set both, and each action reads only the slot its handler
//! expects. Text and layout references share one slot: a layout reference
//! overrides any text.

use crate::registry::LayoutRef;
use serde::Serialize;

/// The reference slot of an argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgTarget {
    Text(String),
    Layout(LayoutRef),
}

/// Argument passed to an action when its binding fires.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ArgValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ArgTarget>,
}

impl ArgValue {
    pub const fn empty() -> Self {
        Self {
            int: None,
            float: None,
            target: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            int: Some(value),
            ..Self::empty()
        }
    }

    pub fn float(value: f32) -> Self {
        Self {
            float: Some(value),
            ..Self::empty()
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            target: Some(ArgTarget::Text(value.into())),
            ..Self::empty()
        }
    }

    pub fn layout(layout: LayoutRef) -> Self {
        Self {
            target: Some(ArgTarget::Layout(layout)),
            ..Self::empty()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.int.is_none() && self.float.is_none() && self.target.is_none()
    }

    pub fn as_int(&self) -> Option<i64> {
        self.int
    }

    pub fn as_float(&self) -> Option<f32> {
        self.float
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.target {
            Some(ArgTarget::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_layout(&self) -> Option<LayoutRef> {
        match self.target {
            Some(ArgTarget::Layout(layout)) => Some(layout),
            _ => None,
        }
    }
}

/// The raw argument fields of one binding entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgFields<'a> {
    /// `cmd`
    pub text: Option<&'a str>,
    /// `i`
    pub int: Option<i64>,
    /// `f`
    pub float: Option<f32>,
    /// `layout`
    pub layout: Option<&'a str>,
}

/// Build an [`ArgValue`] from the raw fields.
///
/// A layout name takes the reference slot, otherwise the text does. The
/// integer and float slots are filled whenever their fields are present.
/// Returns the offending name if the layout is not in the registry.
pub fn resolve(fields: &ArgFields<'_>) -> Result<ArgValue, String> {
    let target = match (fields.layout, fields.text) {
        (Some(name), _) => {
            let layout = LayoutRef::from_name(name).ok_or_else(|| name.to_string())?;
            Some(ArgTarget::Layout(layout))
        }
        (None, Some(text)) => Some(ArgTarget::Text(text.to_string())),
        (None, None) => None,
    };

    Ok(ArgValue {
        int: fields.int,
        float: fields.float,
        target,
    })
}
