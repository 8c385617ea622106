//! X11 key-symbol name table.
//!
//! Resolves the symbolic names accepted by the X server's keysym lookup
//! (`p`, `Return`, `F5`, `XF86AudioMute`, ...) to their numeric keysym values.
//! Names are case-sensitive, exactly as the X lookup treats them: `p` and `P`
//! are different keysyms.

use serde::Serialize;
use std::fmt;

/// A resolved X11 keysym value.
///
/// There is no "no symbol" value: an unknown name is reported by
/// [`Keysym::from_name`] returning `None`, never by a sentinel keysym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Keysym(pub u32);

impl Keysym {
    pub const SPACE: Keysym = Keysym(0x0020);
    pub const RETURN: Keysym = Keysym(0xff0d);
    pub const TAB: Keysym = Keysym(0xff09);
    pub const ESCAPE: Keysym = Keysym(0xff1b);

    /// Look up a keysym by its X11 name.
    pub fn from_name(name: &str) -> Option<Keysym> {
        if name.is_empty() {
            return None;
        }
        named(name)
            .or_else(|| latin1(name))
            .or_else(|| function_key(name))
            .or_else(|| numeric(name))
            .map(Keysym)
    }

    /// The canonical X11 name for this keysym, if it is in the table.
    pub fn name(self) -> Option<String> {
        if let Some(c) = char::from_u32(self.0).filter(|c| c.is_ascii_alphanumeric()) {
            return Some(c.to_string());
        }
        if (0xffbe..=0xffe0).contains(&self.0) {
            return Some(format!("F{}", self.0 - 0xffbe + 1));
        }
        NAMES
            .iter()
            .find(|(_, value)| *value == self.0)
            .map(|(name, _)| (*name).to_string())
    }
}

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

fn named(name: &str) -> Option<u32> {
    NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| *value)
}

/// Single ASCII letters and digits name themselves.
fn latin1(name: &str) -> Option<u32> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c as u32),
        _ => None,
    }
}

/// `F1` through `F35`.
fn function_key(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('F')?;
    if digits.starts_with('0') {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(n @ 1..=35) => Some(0xffbe + n - 1),
        _ => None,
    }
}

/// `0x<hex>` raw keysyms and `U<hex>` Unicode keysyms.
fn numeric(name: &str) -> Option<u32> {
    if let Some(hex) = name.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok().filter(|v| *v != 0);
    }
    let hex = name.strip_prefix('U')?;
    if hex.is_empty() || hex.len() > 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let code = u32::from_str_radix(hex, 16).ok()?;
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(code),
        0x100..=0x10ffff => Some(0x0100_0000 | code),
        _ => None,
    }
}

const NAMES: &[(&str, u32)] = &[
    // Latin-1 punctuation
    ("space", 0x0020),
    ("exclam", 0x0021),
    ("quotedbl", 0x0022),
    ("numbersign", 0x0023),
    ("dollar", 0x0024),
    ("percent", 0x0025),
    ("ampersand", 0x0026),
    ("apostrophe", 0x0027),
    ("quoteright", 0x0027),
    ("parenleft", 0x0028),
    ("parenright", 0x0029),
    ("asterisk", 0x002a),
    ("plus", 0x002b),
    ("comma", 0x002c),
    ("minus", 0x002d),
    ("period", 0x002e),
    ("slash", 0x002f),
    ("colon", 0x003a),
    ("semicolon", 0x003b),
    ("less", 0x003c),
    ("equal", 0x003d),
    ("greater", 0x003e),
    ("question", 0x003f),
    ("at", 0x0040),
    ("bracketleft", 0x005b),
    ("backslash", 0x005c),
    ("bracketright", 0x005d),
    ("asciicircum", 0x005e),
    ("underscore", 0x005f),
    ("grave", 0x0060),
    ("quoteleft", 0x0060),
    ("braceleft", 0x007b),
    ("bar", 0x007c),
    ("braceright", 0x007d),
    ("asciitilde", 0x007e),
    // TTY function keys
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Linefeed", 0xff0a),
    ("Clear", 0xff0b),
    ("Return", 0xff0d),
    ("Pause", 0xff13),
    ("Scroll_Lock", 0xff14),
    ("Sys_Req", 0xff15),
    ("Escape", 0xff1b),
    ("Delete", 0xffff),
    // Cursor control
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Prior", 0xff55),
    ("Page_Up", 0xff55),
    ("Next", 0xff56),
    ("Page_Down", 0xff56),
    ("End", 0xff57),
    ("Begin", 0xff58),
    // Misc functions
    ("Select", 0xff60),
    ("Print", 0xff61),
    ("Execute", 0xff62),
    ("Insert", 0xff63),
    ("Undo", 0xff65),
    ("Redo", 0xff66),
    ("Menu", 0xff67),
    ("Find", 0xff68),
    ("Cancel", 0xff69),
    ("Help", 0xff6a),
    ("Break", 0xff6b),
    ("Mode_switch", 0xff7e),
    ("Num_Lock", 0xff7f),
    // Keypad
    ("KP_Space", 0xff80),
    ("KP_Tab", 0xff89),
    ("KP_Enter", 0xff8d),
    ("KP_Home", 0xff95),
    ("KP_Left", 0xff96),
    ("KP_Up", 0xff97),
    ("KP_Right", 0xff98),
    ("KP_Down", 0xff99),
    ("KP_Prior", 0xff9a),
    ("KP_Page_Up", 0xff9a),
    ("KP_Next", 0xff9b),
    ("KP_Page_Down", 0xff9b),
    ("KP_End", 0xff9c),
    ("KP_Begin", 0xff9d),
    ("KP_Insert", 0xff9e),
    ("KP_Delete", 0xff9f),
    ("KP_Multiply", 0xffaa),
    ("KP_Add", 0xffab),
    ("KP_Separator", 0xffac),
    ("KP_Subtract", 0xffad),
    ("KP_Decimal", 0xffae),
    ("KP_Divide", 0xffaf),
    ("KP_0", 0xffb0),
    ("KP_1", 0xffb1),
    ("KP_2", 0xffb2),
    ("KP_3", 0xffb3),
    ("KP_4", 0xffb4),
    ("KP_5", 0xffb5),
    ("KP_6", 0xffb6),
    ("KP_7", 0xffb7),
    ("KP_8", 0xffb8),
    ("KP_9", 0xffb9),
    ("KP_Equal", 0xffbd),
    // Modifier keys
    ("Shift_L", 0xffe1),
    ("Shift_R", 0xffe2),
    ("Control_L", 0xffe3),
    ("Control_R", 0xffe4),
    ("Caps_Lock", 0xffe5),
    ("Shift_Lock", 0xffe6),
    ("Meta_L", 0xffe7),
    ("Meta_R", 0xffe8),
    ("Alt_L", 0xffe9),
    ("Alt_R", 0xffea),
    ("Super_L", 0xffeb),
    ("Super_R", 0xffec),
    ("Hyper_L", 0xffed),
    ("Hyper_R", 0xffee),
    // XF86 vendor keys
    ("XF86MonBrightnessUp", 0x1008_ff02),
    ("XF86MonBrightnessDown", 0x1008_ff03),
    ("XF86AudioLowerVolume", 0x1008_ff11),
    ("XF86AudioMute", 0x1008_ff12),
    ("XF86AudioRaiseVolume", 0x1008_ff13),
    ("XF86AudioPlay", 0x1008_ff14),
    ("XF86AudioStop", 0x1008_ff15),
    ("XF86AudioPrev", 0x1008_ff16),
    ("XF86AudioNext", 0x1008_ff17),
    ("XF86Mail", 0x1008_ff19),
    ("XF86Search", 0x1008_ff1b),
    ("XF86Calculator", 0x1008_ff1d),
    ("XF86Explorer", 0x1008_ff5d),
    ("XF86AudioPause", 0x1008_ff31),
    ("XF86AudioMicMute", 0x1008_ffb2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_are_case_sensitive() {
        assert_eq!(Keysym::from_name("p"), Some(Keysym(0x70)));
        assert_eq!(Keysym::from_name("P"), Some(Keysym(0x50)));
        assert_eq!(Keysym::from_name("return"), None);
        assert_eq!(Keysym::from_name("Return"), Some(Keysym::RETURN));
    }

    #[test]
    fn test_digits_and_punctuation() {
        assert_eq!(Keysym::from_name("0"), Some(Keysym(0x30)));
        assert_eq!(Keysym::from_name("comma"), Some(Keysym(0x2c)));
        assert_eq!(Keysym::from_name("period"), Some(Keysym(0x2e)));
        assert_eq!(Keysym::from_name("space"), Some(Keysym::SPACE));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(Keysym::from_name("F1"), Some(Keysym(0xffbe)));
        assert_eq!(Keysym::from_name("F12"), Some(Keysym(0xffc9)));
        assert_eq!(Keysym::from_name("F35"), Some(Keysym(0xffe0)));
        assert_eq!(Keysym::from_name("F0"), None);
        assert_eq!(Keysym::from_name("F36"), None);
        assert_eq!(Keysym::from_name("F01"), None);
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(Keysym::from_name("0xff0d"), Some(Keysym::RETURN));
        assert_eq!(Keysym::from_name("U20AC"), Some(Keysym(0x0100_20ac)));
        assert_eq!(Keysym::from_name("U0041"), Some(Keysym(0x41)));
        assert_eq!(Keysym::from_name("0x"), None);
        assert_eq!(Keysym::from_name("Uxyz"), None);
    }

    #[test]
    fn test_modifier_names_are_not_keysyms() {
        for name in ["alt", "super", "ctrl", "shift", "left", "middle", "right"] {
            assert_eq!(Keysym::from_name(name), None, "{name}");
        }
    }

    #[test]
    fn test_display_uses_table_name() {
        assert_eq!(Keysym::RETURN.to_string(), "Return");
        assert_eq!(Keysym(0x70).to_string(), "p");
        assert_eq!(Keysym(0xffc2).to_string(), "F5");
        assert_eq!(Keysym(0x0100_20ac).to_string(), "0x10020ac");
    }
}
