//! Binding descriptor parser.
//!
//! Parses human-typed descriptors such as `"super + shift + Return"` or
//! `"ctrl + left"` into a modifier mask plus a terminal symbol.
//!
//! ```text
//! binding  = modseq terminal | terminal
//! modseq   = mod '+' modseq | mod '+'
//! mod      = "alt" | "super" | "ctrl" | "shift"
//! terminal = key | button
//! key      = any X11 keysym name
//! button   = "left" | "right" | "middle"
//! ```
//!
//! Whitespace around tokens and around `+` is ignored. A bare terminal is
//! tried first; if that fails the parser backtracks to the start of the input
//! and reads a modifier sequence followed by the terminal.
//!
//! The two terminals are matched differently. A key name is scanned up to
//! the next whitespace and looked up exactly, and anything left after it is a
//! malformed sequence. A button name must equal the whole remaining input, so
//! trailing text makes the button itself unknown.

use crate::keysym::Keysym;
use crate::modifiers::{Button, MODIFIERS, ModMask};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a binding descriptor was rejected.
///
/// Errors carry no partial result: a descriptor either parses completely or
/// not at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("unknown button '{0}'")]
    UnknownButton(String),

    #[error("malformed binding: {0}")]
    MalformedSequence(String),
}

/// A keyboard binding: modifiers plus a keysym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyBinding {
    pub mods: ModMask,
    pub key: Keysym,
}

/// A pointer binding: modifiers plus a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ButtonBinding {
    pub mods: ModMask,
    pub button: Button,
}

impl KeyBinding {
    pub fn new(mods: ModMask, key: Keysym) -> Self {
        Self { mods, key }
    }
}

impl ButtonBinding {
    pub fn new(mods: ModMask, button: Button) -> Self {
        Self { mods, button }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{} + ", self.mods)?;
        }
        write!(f, "{}", self.key)
    }
}

impl fmt::Display for ButtonBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{} + ", self.mods)?;
        }
        write!(f, "{}", self.button)
    }
}

impl FromStr for KeyBinding {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_binding(s)
    }
}

impl FromStr for ButtonBinding {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_button_binding(s)
    }
}

/// Parse a key descriptor such as `"super + shift + p"`.
pub fn parse_key_binding(s: &str) -> Result<KeyBinding, BindingError> {
    let (mods, key) = parse_binding::<Keysym>(s)?;
    log::trace!("parsed key binding '{}' -> mods={:?} key={}", s, mods, key);
    Ok(KeyBinding { mods, key })
}

/// Parse a button descriptor such as `"super + left"`.
pub fn parse_button_binding(s: &str) -> Result<ButtonBinding, BindingError> {
    let (mods, button) = parse_binding::<Button>(s)?;
    log::trace!(
        "parsed button binding '{}' -> mods={:?} button={}",
        s,
        mods,
        button
    );
    Ok(ButtonBinding { mods, button })
}

/// Read position into the descriptor.
///
/// The cursor is a `Copy` value: every step returns a new cursor and leaves
/// the old one untouched, so a failed alternative can never leak a partial
/// advance into the next attempt.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { rest: input }.skip_blanks()
    }

    fn skip_blanks(self) -> Self {
        Cursor {
            rest: self.rest.trim_start(),
        }
    }

    /// Consume `len` bytes, then any whitespace that follows.
    fn advance(self, len: usize) -> Self {
        Cursor {
            rest: self.rest.get(len..).unwrap_or(""),
        }
        .skip_blanks()
    }

    fn peek(self) -> Option<char> {
        self.rest.chars().next()
    }

    fn is_end(self) -> bool {
        self.rest.is_empty()
    }

    /// The word under the cursor: everything up to `+` or whitespace.
    fn word(self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| c == '+' || c.is_whitespace())
            .unwrap_or(self.rest.len());
        &self.rest[..end]
    }

    /// Whether the word under the cursor is followed by a `+`.
    fn word_precedes_plus(self) -> bool {
        self.advance(self.word().len()).peek() == Some('+')
    }
}

/// A terminal symbol that can close a binding descriptor.
trait Terminal: Sized {
    fn parse(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), BindingError>;
}

impl Terminal for Keysym {
    fn parse(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), BindingError> {
        let end = cursor
            .rest
            .find(char::is_whitespace)
            .unwrap_or(cursor.rest.len());
        let name = &cursor.rest[..end];
        if name.is_empty() {
            return Err(BindingError::MalformedSequence(
                "missing key name".to_string(),
            ));
        }
        match Keysym::from_name(name) {
            Some(sym) => Ok((sym, cursor.advance(end))),
            None => Err(BindingError::UnknownKey(name.to_string())),
        }
    }
}

impl Terminal for Button {
    fn parse(cursor: Cursor<'_>) -> Result<(Self, Cursor<'_>), BindingError> {
        let remainder = cursor.rest.trim_end();
        if remainder.is_empty() {
            return Err(BindingError::MalformedSequence(
                "missing button name".to_string(),
            ));
        }
        match Button::from_name(remainder) {
            Some(button) => Ok((button, cursor.advance(cursor.rest.len()))),
            None => Err(BindingError::UnknownButton(remainder.to_string())),
        }
    }
}

fn parse_binding<T: Terminal>(input: &str) -> Result<(ModMask, T), BindingError> {
    let start = Cursor::new(input);

    let bare_err = match parse_terminal::<T>(start) {
        Ok(terminal) => return Ok((ModMask::empty(), terminal)),
        Err(e) => e,
    };

    // Backtrack: `start` is unchanged by the failed attempt above.
    let (mods, cursor) = match parse_modseq(start) {
        Ok(parsed) => parsed,
        // The first word is not a modifier and nothing suggests it was meant
        // as one, so the bare-terminal diagnosis is the useful one.
        Err(BindingError::UnknownModifier(_)) if !start.word_precedes_plus() => {
            return Err(bare_err);
        }
        Err(e) => return Err(e),
    };

    let terminal = parse_terminal::<T>(cursor)?;
    Ok((mods, terminal))
}

/// A terminal followed by end of input.
fn parse_terminal<T: Terminal>(cursor: Cursor<'_>) -> Result<T, BindingError> {
    let (terminal, cursor) = T::parse(cursor)?;
    if !cursor.is_end() {
        return Err(BindingError::MalformedSequence(format!(
            "unexpected trailing input '{}'",
            cursor.rest
        )));
    }
    Ok(terminal)
}

/// One or more `mod '+'`, OR-ed together.
fn parse_modseq(cursor: Cursor<'_>) -> Result<(ModMask, Cursor<'_>), BindingError> {
    let (mask, cursor) = parse_mod(cursor)?;

    if cursor.peek() != Some('+') {
        return Err(BindingError::MalformedSequence(format!(
            "expected '+' after modifier '{}'",
            mask
        )));
    }
    let cursor = cursor.advance(1);

    // Zero further modifiers is not an error; the failed attempt leaves
    // `cursor` where it was. A word followed by `+` sits in modifier
    // position, so an unknown name there is reported as such.
    match parse_modseq(cursor) {
        Ok((more, next)) => Ok((mask | more, next)),
        Err(e @ BindingError::UnknownModifier(_)) if cursor.word_precedes_plus() => Err(e),
        Err(_) => Ok((mask, cursor)),
    }
}

/// Match a modifier name against the head of the input.
///
/// Each candidate is compared over its own length only, so `"altx"` matches
/// `alt` and leaves `x` for the caller to reject.
fn parse_mod(cursor: Cursor<'_>) -> Result<(ModMask, Cursor<'_>), BindingError> {
    for (name, mask) in MODIFIERS {
        if cursor.rest.starts_with(name) {
            return Ok((*mask, cursor.advance(name.len())));
        }
    }

    let word = cursor.word();
    if word.is_empty() {
        return Err(BindingError::MalformedSequence(
            "expected a modifier name".to_string(),
        ));
    }
    Err(BindingError::UnknownModifier(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Keysym {
        Keysym::from_name(name).unwrap()
    }

    #[test]
    fn test_bare_key() {
        let binding = parse_key_binding("p").unwrap();
        assert_eq!(binding.mods, ModMask::empty());
        assert_eq!(binding.key, key("p"));
    }

    #[test]
    fn test_single_modifier() {
        let binding = parse_key_binding("shift + p").unwrap();
        assert_eq!(binding.mods, ModMask::SHIFT);
        assert_eq!(binding.key, key("p"));
    }

    #[test]
    fn test_all_modifiers() {
        let binding = parse_key_binding("alt + super + ctrl + shift + p").unwrap();
        assert_eq!(binding.mods, ModMask::all());
        assert_eq!(binding.key, key("p"));
    }

    #[test]
    fn test_no_whitespace() {
        let binding = parse_key_binding("super+shift+Return").unwrap();
        assert_eq!(binding.mods, ModMask::SUPER | ModMask::SHIFT);
        assert_eq!(binding.key, Keysym::RETURN);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let binding = parse_key_binding("  super  +\tp  ").unwrap();
        assert_eq!(binding.mods, ModMask::SUPER);
        assert_eq!(binding.key, key("p"));
    }

    #[test]
    fn test_duplicate_modifier_is_idempotent() {
        let binding = parse_key_binding("ctrl + ctrl + c").unwrap();
        assert_eq!(binding.mods, ModMask::CTRL);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_key_binding("super + nosuchkey"),
            Err(BindingError::UnknownKey("nosuchkey".to_string()))
        );
        assert_eq!(
            parse_key_binding("nosuchkey"),
            Err(BindingError::UnknownKey("nosuchkey".to_string()))
        );
    }

    #[test]
    fn test_unknown_modifier() {
        assert_eq!(
            parse_key_binding("hyper + p"),
            Err(BindingError::UnknownModifier("hyper".to_string()))
        );
    }

    #[test]
    fn test_unknown_inner_modifier() {
        assert_eq!(
            parse_key_binding("super + hyper + p"),
            Err(BindingError::UnknownModifier("hyper".to_string()))
        );
        assert_eq!(
            parse_key_binding("super+hyper+p"),
            Err(BindingError::UnknownModifier("hyper".to_string()))
        );
        assert_eq!(
            parse_key_binding("super + ctrl + meta + p"),
            Err(BindingError::UnknownModifier("meta".to_string()))
        );
        assert_eq!(
            parse_button_binding("ctrl + meta + left"),
            Err(BindingError::UnknownModifier("meta".to_string()))
        );
    }

    #[test]
    fn test_modifier_prefix_match_fails_cleanly() {
        let err = parse_key_binding("altx+p").unwrap_err();
        assert!(matches!(err, BindingError::MalformedSequence(_)), "{err:?}");
    }

    #[test]
    fn test_failed_inner_modifier_does_not_leak_progress() {
        // The inner attempt matches `alt` and then fails on `x`. The parser
        // must resume at `altx`, not at the `x` the failed attempt reached.
        assert_eq!(
            parse_key_binding("super + altx"),
            Err(BindingError::UnknownKey("altx".to_string()))
        );
    }

    #[test]
    fn test_missing_key() {
        let err = parse_key_binding("super +").unwrap_err();
        assert!(matches!(err, BindingError::MalformedSequence(_)), "{err:?}");
        let err = parse_key_binding("").unwrap_err();
        assert!(matches!(err, BindingError::MalformedSequence(_)), "{err:?}");
    }

    #[test]
    fn test_trailing_text_after_key() {
        let err = parse_key_binding("super + p q").unwrap_err();
        assert!(matches!(err, BindingError::MalformedSequence(_)), "{err:?}");
    }

    #[test]
    fn test_buttons() {
        let binding = parse_button_binding("left").unwrap();
        assert_eq!(binding, ButtonBinding::new(ModMask::empty(), Button::Left));

        let binding = parse_button_binding("shift + middle").unwrap();
        assert_eq!(binding, ButtonBinding::new(ModMask::SHIFT, Button::Middle));

        let binding = parse_button_binding("super+right").unwrap();
        assert_eq!(binding, ButtonBinding::new(ModMask::SUPER, Button::Right));
    }

    #[test]
    fn test_button_requires_whole_remainder() {
        // Matching is against the entire rest of the input, not a prefix.
        assert_eq!(
            parse_button_binding("super + left x"),
            Err(BindingError::UnknownButton("left x".to_string()))
        );
        assert_eq!(
            parse_button_binding("lef"),
            Err(BindingError::UnknownButton("lef".to_string()))
        );
        assert!(parse_button_binding("super +").is_err());
    }

    #[test]
    fn test_display() {
        let binding = parse_key_binding("shift + super + Return").unwrap();
        assert_eq!(binding.to_string(), "super + shift + Return");
        let binding = parse_button_binding("middle").unwrap();
        assert_eq!(binding.to_string(), "middle");
    }

    #[test]
    fn test_from_str() {
        let binding: KeyBinding = "ctrl + F5".parse().unwrap();
        assert_eq!(binding.mods, ModMask::CTRL);
        assert_eq!(binding.key, key("F5"));
    }
}
