//! The configuration snapshot.
//!
//! A [`Config`] is one fully-built, immutable description of everything the
//! user can configure. It owns all of its collections; nothing in one
//! snapshot aliases another.

use crate::arg::ArgValue;
use crate::builder;
use crate::error::ConfigError;
use crate::registry::{Action, Click, Layout, LayoutRef};
use serde::Serialize;
use std::path::Path;
use tagwm_keybindings::{ButtonBinding, KeyBinding};

/// Foreground, background and border colour of one scheme, as `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub fg: String,
    pub bg: String,
    pub border: String,
}

impl ColorScheme {
    pub fn new(fg: &str, bg: &str, border: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            border: border.to_string(),
        }
    }
}

/// Colour schemes for unfocused (`norm`) and focused (`sel`) elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Colors {
    pub norm: ColorScheme,
    pub sel: ColorScheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appearance {
    /// Border width of windows, in pixels.
    pub borderpx: u32,
    /// Snap distance, in pixels.
    pub snap: u32,
    pub showbar: bool,
    /// `false` puts the bar at the bottom.
    pub topbar: bool,
    /// Gap between windows, in pixels.
    pub gappx: u32,
    pub fonts: Vec<String>,
    pub colors: Colors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSettings {
    /// Master-area fraction, within `[0.05, 0.95]`.
    pub mfact: f32,
    /// Number of clients in the master area.
    pub nmaster: u32,
    /// Respect size hints in tiled resizes.
    pub resizehints: bool,
    /// Force focus on the fullscreen window.
    pub lockfullscreen: bool,
    /// Move/resize refresh rate, per second.
    pub refreshrate: u32,
}

/// Window-matching rule applied when a client is managed.
///
/// `None` patterns match anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub title: Option<String>,
    pub tags: u32,
    pub isfloating: bool,
    /// Target monitor index, `-1` for unspecified.
    pub monitor: i32,
}

impl Rule {
    /// Whether this rule applies to a client. Patterns match as substrings.
    pub fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        let hit = |pattern: &Option<String>, value: &str| {
            pattern.as_deref().is_none_or(|p| value.contains(p))
        };
        hit(&self.class, class) && hit(&self.instance, instance) && hit(&self.title, title)
    }
}

/// A key binding and the action it triggers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyCommand {
    pub binding: KeyBinding,
    pub action: Action,
    pub arg: ArgValue,
}

/// A button binding, the region it applies to, and the action it triggers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonCommand {
    pub click: Click,
    pub binding: ButtonBinding,
    pub action: Action,
    pub arg: ArgValue,
}

/// One complete configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub appearance: Appearance,
    pub layout: LayoutSettings,
    /// Tag names; a tag's bit in a tag mask is its index here.
    pub tags: Vec<String>,
    pub rules: Vec<Rule>,
    pub keys: Vec<KeyCommand>,
    pub buttons: Vec<ButtonCommand>,
}

impl Config {
    /// Read and build the config file at `path`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        builder::load(path)
    }

    /// Mask with one bit set for every configured tag.
    pub fn tag_mask(&self) -> u32 {
        match self.tags.len() {
            0 => 0,
            n if n >= 32 => u32::MAX,
            n => (1u32 << n) - 1,
        }
    }

    /// Layout selected on a fresh monitor.
    pub fn default_layout(&self) -> LayoutRef {
        LayoutRef::default()
    }

    pub fn layout(&self, layout: LayoutRef) -> &'static Layout {
        layout.layout()
    }

    /// Rules that apply to a client, in file order.
    pub fn rules_for<'a>(
        &'a self,
        class: &'a str,
        instance: &'a str,
        title: &'a str,
    ) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(class, instance, title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_tag_mask() {
        let mut config = defaults::builtin().clone();
        assert_eq!(config.tag_mask(), 0x1ff);
        config.tags.clear();
        assert_eq!(config.tag_mask(), 0);
        config.tags = (0..32).map(|i| i.to_string()).collect();
        assert_eq!(config.tag_mask(), u32::MAX);
    }

    #[test]
    fn test_rule_matching() {
        let rule = Rule {
            class: Some("Gimp".to_string()),
            instance: None,
            title: None,
            tags: 0,
            isfloating: true,
            monitor: -1,
        };
        assert!(rule.matches(
            "Gimp",
            "gimp",
            "GNU Image Manipulation Program"
        ));
        assert!(rule.matches("Gimp-2.10", "", ""));
        assert!(!rule.matches("firefox", "Navigator", "Mozilla Firefox"));
    }

    #[test]
    fn test_default_layout_is_tiled() {
        let config = defaults::builtin();
        let layout = config.layout(config.default_layout());
        assert_eq!(layout.name, "tiled");
        assert_eq!(layout.symbol, "[]=");
    }

    #[test]
    fn test_rules_for() {
        let config = defaults::builtin();
        let hits: Vec<&Rule> = config.rules_for("Firefox", "Navigator", "").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tags, 1 << 8);
    }
}
