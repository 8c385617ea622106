//! Closed name tables for actions, layouts and click regions.
//!
//! None of these are user-extensible: an unknown name in the config file is a
//! hard failure for the entry that uses it.

use serde::{Serialize, Serializer};
use std::fmt;

/// A window-manager operation a binding can trigger.
///
/// The host engine dispatches on this with a `match`; this crate never
/// invokes actions itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Spawn,
    ToggleBar,
    FocusStack,
    IncNMaster,
    SetMFact,
    Zoom,
    View,
    KillClient,
    SetLayout,
    ToggleFloating,
    Tag,
    FocusMon,
    TagMon,
    ToggleView,
    ToggleTag,
    MoveMouse,
    ResizeMouse,
    Quit,
    Restart,
}

/// Which argument slot an action reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// The action takes no argument.
    None,
    /// Integer slot (step, delta, tag mask or monitor direction).
    Int,
    /// Float slot (master-fraction delta).
    Float,
    /// Text slot (command line).
    Text,
    /// Layout slot; empty means "toggle to the previous layout".
    Layout,
}

const ACTIONS: &[(&str, Action)] = &[
    ("spawn", Action::Spawn),
    ("togglebar", Action::ToggleBar),
    ("focusstack", Action::FocusStack),
    ("incnmaster", Action::IncNMaster),
    ("setmfact", Action::SetMFact),
    ("zoom", Action::Zoom),
    ("view", Action::View),
    ("killclient", Action::KillClient),
    ("setlayout", Action::SetLayout),
    ("togglefloating", Action::ToggleFloating),
    ("tag", Action::Tag),
    ("focusmon", Action::FocusMon),
    ("tagmon", Action::TagMon),
    ("toggleview", Action::ToggleView),
    ("toggletag", Action::ToggleTag),
    ("movemouse", Action::MoveMouse),
    ("resizemouse", Action::ResizeMouse),
    ("quit", Action::Quit),
    ("restart", Action::Restart),
];

impl Action {
    pub fn from_name(name: &str) -> Option<Action> {
        ACTIONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, action)| *action)
    }

    pub fn name(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    /// Every action, in registry order.
    pub fn all() -> impl Iterator<Item = Action> {
        ACTIONS.iter().map(|(_, action)| *action)
    }

    /// The argument slot this action's handler reads.
    pub fn arg_kind(self) -> ArgKind {
        match self {
            Action::Spawn => ArgKind::Text,
            Action::SetMFact => ArgKind::Float,
            Action::SetLayout => ArgKind::Layout,
            Action::FocusStack
            | Action::IncNMaster
            | Action::View
            | Action::Tag
            | Action::FocusMon
            | Action::TagMon
            | Action::ToggleView
            | Action::ToggleTag => ArgKind::Int,
            Action::ToggleBar
            | Action::Zoom
            | Action::KillClient
            | Action::ToggleFloating
            | Action::MoveMouse
            | Action::ResizeMouse
            | Action::Quit
            | Action::Restart => ArgKind::None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout algorithm a layout entry arranges clients with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrange {
    Tile,
    Monocle,
}

/// An entry of the compiled-in layout list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Name used in the config file.
    pub name: &'static str,
    /// Symbol shown in the bar.
    pub symbol: &'static str,
    /// `None` means clients float.
    pub arrange: Option<Arrange>,
}

/// The layout list. The first entry is the default.
pub const LAYOUTS: &[Layout] = &[
    Layout {
        name: "tiled",
        symbol: "[]=",
        arrange: Some(Arrange::Tile),
    },
    Layout {
        name: "floating",
        symbol: "><>",
        arrange: None,
    },
    Layout {
        name: "monocle",
        symbol: "[M]",
        arrange: Some(Arrange::Monocle),
    },
];

/// Index into [`LAYOUTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutRef(usize);

impl LayoutRef {
    pub const TILED: LayoutRef = LayoutRef(0);
    pub const FLOATING: LayoutRef = LayoutRef(1);
    pub const MONOCLE: LayoutRef = LayoutRef(2);

    pub fn from_name(name: &str) -> Option<LayoutRef> {
        LAYOUTS
            .iter()
            .position(|layout| layout.name == name)
            .map(LayoutRef)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn layout(self) -> &'static Layout {
        &LAYOUTS[self.0]
    }
}

impl Default for LayoutRef {
    fn default() -> Self {
        LayoutRef::TILED
    }
}

impl fmt::Display for LayoutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layout().name)
    }
}

impl Serialize for LayoutRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.layout().name)
    }
}

/// Bar or screen region a button binding is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Click {
    TagBar,
    LtSymbol,
    StatusText,
    WinTitle,
    ClientWin,
    RootWin,
}

const CLICKS: &[(&str, Click)] = &[
    ("tagbar", Click::TagBar),
    ("ltsymbol", Click::LtSymbol),
    ("statustext", Click::StatusText),
    ("wintitle", Click::WinTitle),
    ("clientwin", Click::ClientWin),
    ("rootwin", Click::RootWin),
];

impl Click {
    pub fn from_name(name: &str) -> Option<Click> {
        CLICKS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, click)| *click)
    }

    pub fn name(self) -> &'static str {
        CLICKS
            .iter()
            .find(|(_, click)| *click == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl fmt::Display for Click {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
