//! Keyboard input filtering.
//!
//! The host is plain text only. Browsers still map some key combinations to
//! rich-text formatting commands on `contenteditable` elements, so those are
//! blocked before they reach the element.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Key values for keyboard input.
///
/// Platform-agnostic key representation. Platform code converts from native
/// key events to this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),
    /// Any named key (`Enter`, `ArrowLeft`, `Shift`, ...).
    Named(SmolStr),
    /// Unknown/unidentified key.
    Unidentified,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Convert a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Self::Unidentified,
            (Some(_), None) => Self::Character(SmolStr::new(key)),
            _ if key == "Unidentified" => Self::Unidentified,
            _ => Self::Named(SmolStr::new(key)),
        }
    }

    /// Whether this is the character `c`, ignoring case.
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(k), None) if k.to_lowercase().eq(c.to_lowercase()))
            }
            _ => false,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Ctrl or Cmd held: the modifiers browsers use for editing commands.
    pub fn has_command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::CTRL)
    }

    pub fn meta(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::META)
    }
}

/// Formatting commands a browser would apply for Ctrl/Cmd + key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormattingShortcut {
    Bold,
    Italic,
    Underline,
    Link,
}

impl FormattingShortcut {
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underline, Self::Link];

    pub fn key(self) -> char {
        match self {
            Self::Bold => 'b',
            Self::Italic => 'i',
            Self::Underline => 'u',
            Self::Link => 'k',
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Default action must be prevented.
    Handled,
    /// Let the platform handle it.
    NotHandled,
}

/// Which formatting shortcuts are blocked on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutFilter {
    blocked: Vec<FormattingShortcut>,
}

impl Default for ShortcutFilter {
    fn default() -> Self {
        Self::new(FormattingShortcut::ALL)
    }
}

impl ShortcutFilter {
    pub fn new(blocked: impl IntoIterator<Item = FormattingShortcut>) -> Self {
        let mut list: Vec<FormattingShortcut> = Vec::new();
        for shortcut in blocked {
            if !list.contains(&shortcut) {
                list.push(shortcut);
            }
        }
        Self { blocked: list }
    }

    /// The blocked shortcut this combo triggers, if any.
    pub fn matching(&self, combo: &KeyCombo) -> Option<FormattingShortcut> {
        if !combo.modifiers.has_command() {
            return None;
        }
        self.blocked
            .iter()
            .copied()
            .find(|shortcut| combo.key.is_char_ignore_case(shortcut.key()))
    }

    pub fn handle(&self, combo: &KeyCombo) -> KeydownResult {
        match self.matching(combo) {
            Some(shortcut) => {
                tracing::debug!(?shortcut, "blocked formatting shortcut");
                KeydownResult::Handled
            }
            None => KeydownResult::NotHandled,
        }
    }

    pub fn blocked(&self) -> &[FormattingShortcut] {
        &self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("b"), Key::character("b"));
        assert_eq!(Key::from_dom("é"), Key::character("é"));
        assert_eq!(Key::from_dom("Enter"), Key::Named("Enter".into()));
        assert_eq!(Key::from_dom(""), Key::Unidentified);
        assert_eq!(Key::from_dom("Unidentified"), Key::Unidentified);
    }

    #[test]
    fn test_blocks_formatting_with_ctrl_or_meta() {
        let filter = ShortcutFilter::default();
        for c in ["b", "i", "u", "k"] {
            assert_eq!(
                filter.handle(&KeyCombo::ctrl(Key::from_dom(c))),
                KeydownResult::Handled,
                "ctrl+{c}"
            );
            assert_eq!(
                filter.handle(&KeyCombo::meta(Key::from_dom(c))),
                KeydownResult::Handled,
                "meta+{c}"
            );
        }
    }

    #[test]
    fn test_uppercase_key_matches() {
        // Shift or caps lock reports "B".
        let combo = KeyCombo::with_modifiers(
            Key::from_dom("B"),
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(
            ShortcutFilter::default().matching(&combo),
            Some(FormattingShortcut::Bold)
        );
    }

    #[test]
    fn test_plain_keys_pass_through() {
        let filter = ShortcutFilter::default();
        for c in ["b", "i", "u", "k"] {
            assert_eq!(
                filter.handle(&KeyCombo::new(Key::from_dom(c))),
                KeydownResult::NotHandled
            );
        }
        let shifted = KeyCombo::with_modifiers(Key::from_dom("B"), Modifiers::SHIFT);
        assert_eq!(filter.handle(&shifted), KeydownResult::NotHandled);
    }

    #[test]
    fn test_other_shortcuts_pass_through() {
        let filter = ShortcutFilter::default();
        assert_eq!(
            filter.handle(&KeyCombo::ctrl(Key::from_dom("c"))),
            KeydownResult::NotHandled
        );
        assert_eq!(
            filter.handle(&KeyCombo::ctrl(Key::from_dom("z"))),
            KeydownResult::NotHandled
        );
        assert_eq!(
            filter.handle(&KeyCombo::ctrl(Key::from_dom("Enter"))),
            KeydownResult::NotHandled
        );
    }

    #[test]
    fn test_custom_filter() {
        let filter = ShortcutFilter::new([FormattingShortcut::Bold, FormattingShortcut::Bold]);
        assert_eq!(filter.blocked(), &[FormattingShortcut::Bold]);
        assert_eq!(
            filter.handle(&KeyCombo::ctrl(Key::from_dom("k"))),
            KeydownResult::NotHandled
        );
    }
}
