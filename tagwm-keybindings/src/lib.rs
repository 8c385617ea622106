//! Binding descriptor parsing for tagwm.
//!
//! Turns the human-typed trigger strings found in the config file
//! (`"super + shift + Return"`, `"ctrl + left"`) into structured bindings.
//!
//! Features:
//! - Recursive-descent parser with backtracking over an immutable cursor
//! - X11 keysym name table (Latin-1, function, keypad, XF86 media keys)
//! - Closed modifier (`alt`, `super`, `ctrl`, `shift`) and button
//!   (`left`, `middle`, `right`) registries

pub mod keysym;
pub mod modifiers;
pub mod parser;

pub use keysym::Keysym;
pub use modifiers::{BUTTONS, Button, MODIFIERS, ModMask};
pub use parser::{
    BindingError, ButtonBinding, KeyBinding, parse_button_binding, parse_key_binding,
};
