//! Built-in default configuration.
//!
//! The default snapshot is built once per process and lives for the rest of
//! it. It is current until the first successful load and is never released.

use crate::arg::ArgValue;
use crate::config::{
    Appearance, ButtonCommand, ColorScheme, Colors, Config, KeyCommand, LayoutSettings, Rule,
};
use crate::registry::{Action, Click, LayoutRef};
use std::path::PathBuf;
use std::sync::LazyLock;
use tagwm_keybindings::{Button, ButtonBinding, KeyBinding, Keysym, ModMask};

const COL_GRAY1: &str = "#222222";
const COL_GRAY2: &str = "#444444";
const COL_GRAY3: &str = "#bbbbbb";
const COL_GRAY4: &str = "#eeeeee";
const COL_CYAN: &str = "#005577";

const LAUNCHER_CMD: &str = "rofi -show drun";
const TERMINAL_CMD: &str = "st";

const MODKEY: ModMask = ModMask::SUPER;

/// Tag mask selecting every tag.
pub const ALL_TAGS: i64 = u32::MAX as i64;

static BUILTIN: LazyLock<Config> = LazyLock::new(build_builtin);

/// The built-in default configuration.
pub fn builtin() -> &'static Config {
    &BUILTIN
}

/// Default location of the user's config file: `~/.config/tagwm/tagwm.yaml`.
pub fn config_path() -> PathBuf {
    config_dir().join("tagwm.yaml")
}

/// Directory holding the user's config file.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("tagwm")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join("tagwm")
    } else {
        PathBuf::from(".")
    }
}

pub fn appearance() -> Appearance {
    Appearance {
        borderpx: 1,
        snap: 32,
        showbar: true,
        topbar: true,
        gappx: 4,
        fonts: vec!["monospace:size=10".to_string()],
        colors: Colors {
            norm: ColorScheme::new(COL_GRAY3, COL_GRAY1, COL_GRAY2),
            sel: ColorScheme::new(COL_GRAY4, COL_CYAN, COL_CYAN),
        },
    }
}

pub fn layout_settings() -> LayoutSettings {
    LayoutSettings {
        mfact: 0.55,
        nmaster: 1,
        resizehints: true,
        lockfullscreen: true,
        refreshrate: 120,
    }
}

pub fn tags() -> Vec<String> {
    (1..=9).map(|n| n.to_string()).collect()
}

fn key(mods: ModMask, c: char, action: Action, arg: ArgValue) -> KeyCommand {
    keysym(mods, Keysym(c as u32), action, arg)
}

fn keysym(mods: ModMask, sym: Keysym, action: Action, arg: ArgValue) -> KeyCommand {
    KeyCommand {
        binding: KeyBinding::new(mods, sym),
        action,
        arg,
    }
}

fn button(
    click: Click,
    mods: ModMask,
    button: Button,
    action: Action,
    arg: ArgValue,
) -> ButtonCommand {
    ButtonCommand {
        click,
        binding: ButtonBinding::new(mods, button),
        action,
        arg,
    }
}

fn keys() -> Vec<KeyCommand> {
    let shift = MODKEY | ModMask::SHIFT;
    let ctrl = MODKEY | ModMask::CTRL;
    let ctrl_shift = MODKEY | ModMask::CTRL | ModMask::SHIFT;

    let mut keys = vec![
        key(MODKEY, 'p', Action::Spawn, ArgValue::text(LAUNCHER_CMD)),
        keysym(
            shift,
            Keysym::RETURN,
            Action::Spawn,
            ArgValue::text(TERMINAL_CMD),
        ),
        key(MODKEY, 'b', Action::ToggleBar, ArgValue::empty()),
        key(MODKEY, 'j', Action::FocusStack, ArgValue::int(1)),
        key(MODKEY, 'k', Action::FocusStack, ArgValue::int(-1)),
        key(MODKEY, 'i', Action::IncNMaster, ArgValue::int(1)),
        key(MODKEY, 'd', Action::IncNMaster, ArgValue::int(-1)),
        key(MODKEY, 'h', Action::SetMFact, ArgValue::float(-0.05)),
        key(MODKEY, 'l', Action::SetMFact, ArgValue::float(0.05)),
        keysym(MODKEY, Keysym::RETURN, Action::Zoom, ArgValue::empty()),
        keysym(MODKEY, Keysym::TAB, Action::View, ArgValue::empty()),
        key(shift, 'c', Action::KillClient, ArgValue::empty()),
        key(
            MODKEY,
            't',
            Action::SetLayout,
            ArgValue::layout(LayoutRef::TILED),
        ),
        key(
            MODKEY,
            'f',
            Action::SetLayout,
            ArgValue::layout(LayoutRef::FLOATING),
        ),
        key(
            MODKEY,
            'm',
            Action::SetLayout,
            ArgValue::layout(LayoutRef::MONOCLE),
        ),
        keysym(MODKEY, Keysym::SPACE, Action::SetLayout, ArgValue::empty()),
        keysym(
            shift,
            Keysym::SPACE,
            Action::ToggleFloating,
            ArgValue::empty(),
        ),
        key(MODKEY, '0', Action::View, ArgValue::int(ALL_TAGS)),
        key(shift, '0', Action::Tag, ArgValue::int(ALL_TAGS)),
        key(MODKEY, ',', Action::FocusMon, ArgValue::int(-1)),
        key(MODKEY, '.', Action::FocusMon, ArgValue::int(1)),
        key(shift, ',', Action::TagMon, ArgValue::int(-1)),
        key(shift, '.', Action::TagMon, ArgValue::int(1)),
    ];

    for (tag, c) in ('1'..='9').enumerate() {
        let mask = ArgValue::int(1 << tag);
        keys.push(key(MODKEY, c, Action::View, mask.clone()));
        keys.push(key(ctrl, c, Action::ToggleView, mask.clone()));
        keys.push(key(shift, c, Action::Tag, mask.clone()));
        keys.push(key(ctrl_shift, c, Action::ToggleTag, mask));
    }

    keys.push(key(shift, 'q', Action::Quit, ArgValue::empty()));
    keys.push(key(shift, 'r', Action::Restart, ArgValue::empty()));
    keys
}

fn buttons() -> Vec<ButtonCommand> {
    let none = ModMask::empty();
    vec![
        button(
            Click::LtSymbol,
            none,
            Button::Left,
            Action::SetLayout,
            ArgValue::empty(),
        ),
        button(
            Click::LtSymbol,
            none,
            Button::Right,
            Action::SetLayout,
            ArgValue::layout(LayoutRef::MONOCLE),
        ),
        button(
            Click::WinTitle,
            none,
            Button::Middle,
            Action::Zoom,
            ArgValue::empty(),
        ),
        button(
            Click::StatusText,
            none,
            Button::Middle,
            Action::Spawn,
            ArgValue::text(TERMINAL_CMD),
        ),
        button(
            Click::ClientWin,
            MODKEY,
            Button::Left,
            Action::MoveMouse,
            ArgValue::empty(),
        ),
        button(
            Click::ClientWin,
            MODKEY,
            Button::Middle,
            Action::ToggleFloating,
            ArgValue::empty(),
        ),
        button(
            Click::ClientWin,
            MODKEY,
            Button::Right,
            Action::ResizeMouse,
            ArgValue::empty(),
        ),
        button(
            Click::TagBar,
            none,
            Button::Left,
            Action::View,
            ArgValue::empty(),
        ),
        button(
            Click::TagBar,
            none,
            Button::Right,
            Action::ToggleView,
            ArgValue::empty(),
        ),
        button(
            Click::TagBar,
            MODKEY,
            Button::Left,
            Action::Tag,
            ArgValue::empty(),
        ),
        button(
            Click::TagBar,
            MODKEY,
            Button::Right,
            Action::ToggleTag,
            ArgValue::empty(),
        ),
    ]
}

fn rules() -> Vec<Rule> {
    vec![
        Rule {
            class: Some("Gimp".to_string()),
            instance: None,
            title: None,
            tags: 0,
            isfloating: true,
            monitor: -1,
        },
        Rule {
            class: Some("Firefox".to_string()),
            instance: None,
            title: None,
            tags: 1 << 8,
            isfloating: false,
            monitor: -1,
        },
    ]
}

fn build_builtin() -> Config {
    let config = Config {
        appearance: appearance(),
        layout: layout_settings(),
        tags: tags(),
        rules: rules(),
        keys: keys(),
        buttons: buttons(),
    };
    log::debug!(
        "built-in config ready: {} keys, {} buttons",
        config.keys.len(),
        config.buttons.len()
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_shared() {
        assert!(std::ptr::eq(builtin(), builtin()));
    }

    #[test]
    fn test_builtin_tables() {
        let config = builtin();
        assert_eq!(config.tags.len(), 9);
        assert_eq!(config.rules.len(), 2);
        // 23 fixed keys, 4 per tag, quit and restart.
        assert_eq!(config.keys.len(), 23 + 9 * 4 + 2);
        assert_eq!(config.buttons.len(), 11);
    }

    #[test]
    fn test_builtin_launcher_key() {
        let first = &builtin().keys[0];
        assert_eq!(first.binding.mods, ModMask::SUPER);
        assert_eq!(Some(first.binding.key), Keysym::from_name("p"));
        assert_eq!(first.action, Action::Spawn);
        assert_eq!(first.arg.as_text(), Some(LAUNCHER_CMD));
    }

    #[test]
    fn test_tag_keys_carry_masks() {
        let view_keys: Vec<&KeyCommand> = builtin()
            .keys
            .iter()
            .filter(|k| k.action == Action::View && k.binding.mods == MODKEY)
            .collect();
        let masks: Vec<Option<i64>> = view_keys.iter().map(|k| k.arg.as_int()).collect();
        assert!(masks.contains(&Some(ALL_TAGS)));
        assert!(masks.contains(&Some(1)));
        assert!(masks.contains(&Some(1 << 8)));
    }

    #[test]
    fn test_config_path_file_name() {
        assert!(config_path().ends_with("tagwm/tagwm.yaml"));
    }
}
