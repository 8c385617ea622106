//! Integration tests for reading, building and managing config files.

use std::fs;
use std::path::PathBuf;
use tagwm_config::source::MAX_INCLUDE_DEPTH;
use tagwm_config::{
    Action, Click, Config, ConfigError, ConfigManager, Document, EntryErrorKind, LayoutRef, State,
    builder,
};
use tagwm_keybindings::{Button, Keysym, ModMask};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write config");
    path
}

const TOML: &str = r##"
# tagwm test configuration
tags = ["1", "2", "3", "4"]

[appearance]
borderpx = 2
gappx = 6
fonts = ["monospace:size=11"]

[appearance.colors]
norm = ["#bbbbbb", "#222222", "#444444"]
sel = ["#eeeeee", "#005577", "#005577"]

[layout]
mfact = 0.5
nmaster = 1
resizehints = false

[[rule]]
class = "Gimp"
floating = true
monitor = -1

[[rule]]
class = "Firefox"
tagmask = 0x8

[[key]]
bind = "super + p"
func = "spawn"
cmd = "rofi -show drun"

[[key]]
bind = "super + shift + Return"
func = "spawn"
cmd = "st"

[[key]]
bind = "super + j"
func = "focusstack"
i = 1

[[key]]
bind = "super + h"
func = "setmfact"
f = -0.05

[[key]]
bind = "super + m"
func = "setlayout"
layout = "monocle"

[[button]]
click = "clientwin"
bind = "super + left"
func = "movemouse"

[[button]]
click = "tagbar"
bind = "right"
func = "toggleview"
"##;

const YAML: &str = r##"
appearance:
  borderpx: 2
  gappx: 6
  fonts: ["monospace:size=11"]
  colors:
    norm: ["#bbbbbb", "#222222", "#444444"]
    sel: ["#eeeeee", "#005577", "#005577"]
layout:
  mfact: 0.5
  nmaster: 1
  resizehints: false
tags: ["1", "2", "3", "4"]
rule:
  - class: Gimp
    floating: true
    monitor: -1
  - class: Firefox
    tagmask: 8
key:
  - bind: "super + p"
    func: spawn
    cmd: "rofi -show drun"
  - bind: "super + shift + Return"
    func: spawn
    cmd: st
  - bind: "super + j"
    func: focusstack
    i: 1
  - bind: "super + h"
    func: setmfact
    f: -0.05
  - bind: "super + m"
    func: setlayout
    layout: monocle
button:
  - click: clientwin
    bind: "super + left"
    func: movemouse
  - click: tagbar
    bind: right
    func: toggleview
"##;

#[test]
fn test_yaml_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "tagwm.yaml", YAML);
    let config = Config::load(&path).expect("build");

    assert_eq!(config.appearance.borderpx, 2);
    assert_eq!(config.appearance.gappx, 6);
    assert_eq!(config.layout.mfact, 0.5);
    assert!(!config.layout.resizehints);
    assert_eq!(config.tags.len(), 4);
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.rules[1].tags, 0x8);
    assert!(!config.rules[1].isfloating);
    assert_eq!(config.rules[1].monitor, -1);

    assert_eq!(config.keys.len(), 5);
    let terminal = &config.keys[1];
    assert_eq!(terminal.binding.mods, ModMask::SUPER | ModMask::SHIFT);
    assert_eq!(terminal.binding.key, Keysym::RETURN);
    assert_eq!(terminal.arg.as_text(), Some("st"));
    assert_eq!(config.keys[2].arg.as_int(), Some(1));
    assert_eq!(config.keys[3].arg.as_float(), Some(-0.05));
    assert_eq!(config.keys[4].arg.as_layout(), Some(LayoutRef::MONOCLE));

    assert_eq!(config.buttons.len(), 2);
    assert_eq!(config.buttons[1].click, Click::TagBar);
    assert_eq!(config.buttons[1].binding.mods, ModMask::empty());
    assert_eq!(config.buttons[1].binding.button, Button::Right);
    assert_eq!(config.buttons[1].action, Action::ToggleView);
}

#[test]
fn test_yaml_and_toml_agree() {
    let dir = TempDir::new().expect("temp dir");
    let yaml = write(&dir, "tagwm.yaml", YAML);
    let toml = write(&dir, "tagwm.toml", TOML);
    assert_eq!(
        Config::load(&yaml).expect("yaml"),
        Config::load(&toml).expect("toml")
    );
}

#[test]
fn test_include_is_transparent() {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("conf.d")).expect("mkdir");
    write(
        &dir,
        "conf.d/keys.yaml",
        "key:\n  - {bind: \"super + q\", func: killclient}\n",
    );
    let main = write(
        &dir,
        "tagwm.yaml",
        r#"
key:
  - {bind: "super + p", func: spawn, cmd: st}
include: conf.d/keys.yaml
tags: [a, b]
"#,
    );

    let doc = Document::load(&main).expect("read");
    assert_eq!(doc.files.len(), 2);
    let config = builder::build(&doc).expect("build");
    let actions: Vec<Action> = config.keys.iter().map(|k| k.action).collect();
    assert_eq!(actions, vec![Action::Spawn, Action::KillClient]);
    assert_eq!(config.tags, vec!["a", "b"]);
}

#[test]
fn test_toml_includes_yaml() {
    let dir = TempDir::new().expect("temp dir");
    write(
        &dir,
        "rules.yaml",
        "rule:\n  - class: Gimp\n    floating: true\n",
    );
    let main = write(
        &dir,
        "tagwm.toml",
        r#"
include = ["rules.yaml"]
tags = ["a"]

[[key]]
bind = "super + b"
func = "togglebar"
"#,
    );

    let config = Config::load(&main).expect("build");
    assert_eq!(config.rules.len(), 1);
    assert!(config.rules[0].isfloating);
    assert_eq!(config.tags, vec!["a"]);
    assert_eq!(config.keys[0].action, Action::ToggleBar);
}

#[test]
fn test_include_cycle() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "a.yaml", "include: b.yaml\n");
    write(&dir, "b.yaml", "include: a.yaml\n");

    let err = Config::load(&dir.path().join("a.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IncludeCycle { .. }), "{err}");
}

#[test]
fn test_include_depth() {
    let dir = TempDir::new().expect("temp dir");
    let levels = MAX_INCLUDE_DEPTH + 2;
    for level in 0..levels {
        write(
            &dir,
            &format!("level{level}.yaml"),
            &format!("include: level{}.yaml\n", level + 1),
        );
    }
    write(&dir, &format!("level{levels}.yaml"), "");

    let err = Config::load(&dir.path().join("level0.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IncludeDepth { .. }), "{err}");
}

#[test]
fn test_missing_include() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(&dir, "tagwm.yaml", "include: nowhere.yaml\n");
    assert!(matches!(
        Config::load(&main),
        Err(ConfigError::Unreadable { .. })
    ));
}

#[test]
fn test_syntax_error_reports_file_and_line() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(&dir, "tagwm.toml", "tags = [\"1\"]\n\n[layout]\nmfact = \n");
    match Config::load(&main) {
        Err(ConfigError::Syntax { path, line, .. }) => {
            assert_eq!(path, main);
            assert_eq!(line, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let main = write(&dir, "tagwm.yaml", "tags: [\"1\"\nlayout: {mfact: 0.5}\n");
    match Config::load(&main) {
        Err(ConfigError::Syntax { path, line, .. }) => {
            assert_eq!(path, main);
            assert!(line > 0);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_error_message_names_entry() {
    let dir = TempDir::new().expect("temp dir");
    let main = write(
        &dir,
        "tagwm.yaml",
        r#"
key:
  - {bind: "super + p", func: spawn}
  - {bind: "super + q", func: quit}
  - {bind: "super + altx", func: zoom}
"#,
    );
    let err = Config::load(&main).unwrap_err();
    assert!(
        err.to_string().starts_with("key[2].bind: invalid binding"),
        "{err}"
    );
    assert!(matches!(err.kind(), Some(EntryErrorKind::Binding { .. })));
}

#[test]
fn test_manager_reload_cycle() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "tagwm.yaml", YAML);

    let mut manager = ConfigManager::with_builtin();
    manager.load(&path).expect("first load");
    let loaded = manager.current().clone();

    // A broken edit is rejected and the previous snapshot stays current.
    fs::write(&path, "key: [{bind: \"super + p\", func: spawn\n").expect("break config");
    assert!(manager.reload().is_err());
    assert_eq!(manager.current(), &loaded);
    assert_eq!(manager.state(), State::Loaded);

    // Fixing the file makes the next reload succeed.
    fs::write(&path, YAML).expect("fix config");
    manager.reload().expect("reload");
    assert_eq!(manager.current(), &loaded);
    assert_eq!(manager.generation(), 2);
    assert_eq!(manager.released(), 1);
}
