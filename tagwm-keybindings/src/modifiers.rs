//! Modifier and mouse-button registries.
//!
//! Both are closed tables: the four modifier names and the three button names
//! are the complete vocabulary accepted in binding descriptors.

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

bitflags! {
    /// Set of modifier keys, using the X11 core-protocol mask bits.
    ///
    /// Combining is a plain bitwise OR, so the order in which modifiers are
    /// written and any repetition have no effect on the result.
    #[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ModMask: u16 {
        /// `ShiftMask`
        const SHIFT = 1 << 0;
        /// `ControlMask`
        const CTRL  = 1 << 2;
        /// `Mod1Mask`
        const ALT   = 1 << 3;
        /// `Mod4Mask`
        const SUPER = 1 << 6;
    }
}

/// Modifier names in lookup order.
///
/// Matching compares each candidate's length against the head of the input,
/// so the order here decides which name wins when one is a prefix of the
/// input (`"altx"` matches `alt`).
pub const MODIFIERS: &[(&str, ModMask)] = &[
    ("alt", ModMask::ALT),
    ("super", ModMask::SUPER),
    ("ctrl", ModMask::CTRL),
    ("shift", ModMask::SHIFT),
];

impl ModMask {
    /// Exact-name lookup in the modifier registry.
    ///
    /// Not the bitflags-generated `from_name`, which matches flag
    /// identifiers such as `"SHIFT"`.
    pub fn from_modifier(name: &str) -> Option<ModMask> {
        MODIFIERS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, mask)| *mask)
    }
}

impl fmt::Debug for ModMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        write!(f, "{self}")
    }
}

impl fmt::Display for ModMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = MODIFIERS
            .iter()
            .filter(|(_, mask)| self.contains(*mask))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "{}", names.join(" + "))
    }
}

/// A pointer button, numbered as the X server numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// `Button1`
    Left = 1,
    /// `Button2`
    Middle = 2,
    /// `Button3`
    Right = 3,
}

/// Button names accepted in descriptors.
pub const BUTTONS: &[(&str, Button)] = &[
    ("left", Button::Left),
    ("right", Button::Right),
    ("middle", Button::Middle),
];

impl Button {
    /// Exact-name lookup in the button registry.
    pub fn from_name(name: &str) -> Option<Button> {
        BUTTONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, button)| *button)
    }

    /// X11 button number.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Left => "left",
            Button::Middle => "middle",
            Button::Right => "right",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x11_mask_values() {
        assert_eq!(ModMask::SHIFT.bits(), 0x01);
        assert_eq!(ModMask::CTRL.bits(), 0x04);
        assert_eq!(ModMask::ALT.bits(), 0x08);
        assert_eq!(ModMask::SUPER.bits(), 0x40);
    }

    #[test]
    fn test_modifier_lookup_is_exact() {
        assert_eq!(ModMask::from_modifier("super"), Some(ModMask::SUPER));
        assert_eq!(ModMask::from_modifier("Super"), None);
        assert_eq!(ModMask::from_modifier("supe"), None);
        assert_eq!(ModMask::from_modifier("hyper"), None);
        assert_eq!(ModMask::from_modifier("SHIFT"), None);
        assert_eq!(ModMask::from_name("SHIFT"), Some(ModMask::SHIFT));
    }

    #[test]
    fn test_display_order_is_registry_order() {
        let mods = ModMask::SHIFT | ModMask::ALT | ModMask::SUPER;
        assert_eq!(mods.to_string(), "alt + super + shift");
        assert_eq!(format!("{:?}", ModMask::empty()), "NONE");
    }

    #[test]
    fn test_button_numbers() {
        assert_eq!(Button::from_name("left").map(Button::number), Some(1));
        assert_eq!(Button::from_name("middle").map(Button::number), Some(2));
        assert_eq!(Button::from_name("right").map(Button::number), Some(3));
        assert_eq!(Button::from_name("Left"), None);
    }
}
