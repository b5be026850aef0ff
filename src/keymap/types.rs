//! Core types for the chord model: Modifier, Modifiers, KeyCode, KeyChord, KeyChordSequence

use std::fmt;

/// A single modifier key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Cmd on macOS, Win on Windows, Super/Meta elsewhere
    Meta,
    Ctrl,
    Shift,
    Alt,
}

impl Modifier {
    /// Canonical formatting order
    pub const ORDER: [Modifier; 4] = [Modifier::Meta, Modifier::Ctrl, Modifier::Shift, Modifier::Alt];

    const fn bit(self) -> u8 {
        match self {
            Modifier::Ctrl => 0b0001,
            Modifier::Shift => 0b0010,
            Modifier::Alt => 0b0100,
            Modifier::Meta => 0b1000,
        }
    }
}

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Set containing exactly one modifier
    pub const fn only(modifier: Modifier) -> Self {
        Modifiers(modifier.bit())
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn has(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Number of modifiers held
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Held modifiers in canonical order (Meta, Ctrl, Shift, Alt)
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ORDER.into_iter().filter(move |m| self.has(*m))
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl From<Modifier> for Modifiers {
    fn from(modifier: Modifier) -> Self {
        Modifiers::only(modifier)
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut mods = Modifiers::NONE;
        for m in iter {
            mods.insert(m);
        }
        mods
    }
}

/// A key code representing a physical or logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// No key; only valid on a chord made of exactly one modifier
    Unspecified,

    /// A printable character key (letters, digits, punctuation), lowercase
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,
    Insert,
    CapsLock,
    Fn,
    Help,

    // Right-hand modifier keys used as plain keys
    RightCmd,
    RightAlt,
    RightCtrl,
    RightShift,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,

    // Media
    Mute,
    VolumeUp,
    VolumeDown,

    // Function keys
    F(u8), // F1-F20

    // Numpad (physical keys)
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,
    NumpadDecimal,
    NumpadClear,
    NumpadEquals,
}

/// Highest function key the grammar knows about
pub const MAX_FUNCTION_KEY: u8 = 20;

impl KeyCode {
    /// Every key with a multi-character name
    pub fn named() -> impl Iterator<Item = KeyCode> {
        const FIXED: [KeyCode; 43] = [
            KeyCode::Enter,
            KeyCode::Escape,
            KeyCode::Tab,
            KeyCode::Backspace,
            KeyCode::Delete,
            KeyCode::Space,
            KeyCode::Insert,
            KeyCode::CapsLock,
            KeyCode::Fn,
            KeyCode::Help,
            KeyCode::RightCmd,
            KeyCode::RightAlt,
            KeyCode::RightCtrl,
            KeyCode::RightShift,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Mute,
            KeyCode::VolumeUp,
            KeyCode::VolumeDown,
            KeyCode::Numpad0,
            KeyCode::Numpad1,
            KeyCode::Numpad2,
            KeyCode::Numpad3,
            KeyCode::Numpad4,
            KeyCode::Numpad5,
            KeyCode::Numpad6,
            KeyCode::Numpad7,
            KeyCode::Numpad8,
            KeyCode::Numpad9,
            KeyCode::NumpadAdd,
            KeyCode::NumpadSubtract,
            KeyCode::NumpadMultiply,
            KeyCode::NumpadDivide,
            KeyCode::NumpadEnter,
            KeyCode::NumpadDecimal,
            KeyCode::NumpadClear,
            KeyCode::NumpadEquals,
        ];
        FIXED
            .into_iter()
            .chain((1..=MAX_FUNCTION_KEY).map(KeyCode::F))
    }

    /// Canonical lower-case spelling used by the chord grammar
    ///
    /// Returns `None` for `Unspecified`, for `Char` (which formats as the
    /// character itself) and for out-of-range function keys.
    pub fn name(self) -> Option<&'static str> {
        const F_NAMES: [&str; 20] = [
            "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12", "f13",
            "f14", "f15", "f16", "f17", "f18", "f19", "f20",
        ];
        let name = match self {
            KeyCode::Unspecified | KeyCode::Char(_) => return None,
            KeyCode::Enter => "enter",
            KeyCode::Escape => "escape",
            KeyCode::Tab => "tab",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Space => "space",
            KeyCode::Insert => "insert",
            KeyCode::CapsLock => "capslock",
            KeyCode::Fn => "fn",
            KeyCode::Help => "help",
            KeyCode::RightCmd => "rightcmd",
            KeyCode::RightAlt => "rightalt",
            KeyCode::RightCtrl => "rightctrl",
            KeyCode::RightShift => "rightshift",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "pageup",
            KeyCode::PageDown => "pagedown",
            KeyCode::Mute => "mute",
            KeyCode::VolumeUp => "volumeup",
            KeyCode::VolumeDown => "volumedown",
            KeyCode::F(n) => return F_NAMES.get(usize::from(n).checked_sub(1)?).copied(),
            KeyCode::Numpad0 => "numpad0",
            KeyCode::Numpad1 => "numpad1",
            KeyCode::Numpad2 => "numpad2",
            KeyCode::Numpad3 => "numpad3",
            KeyCode::Numpad4 => "numpad4",
            KeyCode::Numpad5 => "numpad5",
            KeyCode::Numpad6 => "numpad6",
            KeyCode::Numpad7 => "numpad7",
            KeyCode::Numpad8 => "numpad8",
            KeyCode::Numpad9 => "numpad9",
            KeyCode::NumpadAdd => "numpad_add",
            KeyCode::NumpadSubtract => "numpad_subtract",
            KeyCode::NumpadMultiply => "numpad_multiply",
            KeyCode::NumpadDivide => "numpad_divide",
            KeyCode::NumpadEnter => "numpad_enter",
            KeyCode::NumpadDecimal => "numpad_decimal",
            KeyCode::NumpadClear => "numpad_clear",
            KeyCode::NumpadEquals => "numpad_equals",
        };
        Some(name)
    }

    #[inline]
    pub fn is_unspecified(self) -> bool {
        self == KeyCode::Unspecified
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.name()) {
            (KeyCode::Char(c), _) => write!(f, "{}", c),
            (_, Some(name)) => f.write_str(name),
            (KeyCode::F(n), None) => write!(f, "f{}", n),
            _ => Ok(()),
        }
    }
}

/// One step of a key sequence: a key with modifiers held
///
/// Either `key` is set, or the chord is a bare single modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl KeyChord {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Chord with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Chord with a character key, normalized to lowercase
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c.to_ascii_lowercase()))
    }

    /// Chord with a character key and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), mods)
    }

    /// A chord consisting only of one modifier, e.g. `shift`
    pub const fn modifier(modifier: Modifier) -> Self {
        Self::new(KeyCode::Unspecified, Modifiers::only(modifier))
    }

    /// Whether the chord respects the key/modifier invariant
    pub fn is_valid(&self) -> bool {
        !self.key.is_unspecified() || self.mods.len() == 1
    }
}

/// Ordered chords pressed one after another, e.g. `ctrl+k ctrl+s`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyChordSequence(Vec<KeyChord>);

impl KeyChordSequence {
    pub fn new(chords: Vec<KeyChord>) -> Self {
        Self(chords)
    }

    /// Sequence with exactly one chord
    pub fn single(chord: KeyChord) -> Self {
        Self(vec![chord])
    }

    pub fn chords(&self) -> &[KeyChord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_multi_chord(&self) -> bool {
        self.0.len() > 1
    }
}

impl From<Vec<KeyChord>> for KeyChordSequence {
    fn from(chords: Vec<KeyChord>) -> Self {
        Self(chords)
    }
}

impl From<KeyChord> for KeyChordSequence {
    fn from(chord: KeyChord) -> Self {
        Self::single(chord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_new() {
        let mods = Modifiers::new(true, false, true, false);
        assert!(mods.ctrl());
        assert!(!mods.shift());
        assert!(mods.alt());
        assert!(!mods.meta());
        assert_eq!(mods.len(), 2);
    }

    #[test]
    fn test_modifiers_bitor() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
    }

    #[test]
    fn test_modifiers_iterate_in_canonical_order() {
        let mods: Modifiers = [Modifier::Alt, Modifier::Shift, Modifier::Meta, Modifier::Ctrl]
            .into_iter()
            .collect();
        let order: Vec<_> = mods.iter().collect();
        assert_eq!(
            order,
            vec![Modifier::Meta, Modifier::Ctrl, Modifier::Shift, Modifier::Alt]
        );
    }

    #[test]
    fn test_modifiers_contains() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
        assert!(mods.has(Modifier::Shift));
    }

    #[test]
    fn test_keychord_char_lowercases() {
        let chord = KeyChord::char('A');
        assert_eq!(chord.key, KeyCode::Char('a'));
        assert!(chord.mods.is_empty());
    }

    #[test]
    fn test_keychord_validity() {
        assert!(KeyChord::char('a').is_valid());
        assert!(KeyChord::modifier(Modifier::Shift).is_valid());
        assert!(!KeyChord::new(KeyCode::Unspecified, Modifiers::NONE).is_valid());
        assert!(!KeyChord::new(KeyCode::Unspecified, Modifiers::CTRL | Modifiers::ALT).is_valid());
    }

    #[test]
    fn test_named_keys_have_names() {
        for key in KeyCode::named() {
            assert!(key.name().is_some(), "{:?} has no name", key);
        }
        assert_eq!(KeyCode::named().filter(|k| matches!(k, KeyCode::F(_))).count(), 20);
    }

    #[test]
    fn test_keycode_display() {
        assert_eq!(KeyCode::Char('/').to_string(), "/");
        assert_eq!(KeyCode::F(12).to_string(), "f12");
        assert_eq!(KeyCode::NumpadAdd.to_string(), "numpad_add");
        assert_eq!(KeyCode::Unspecified.to_string(), "");
    }

    #[test]
    fn test_sequence_basics() {
        let seq = KeyChordSequence::new(vec![
            KeyChord::char_with_mods('k', Modifiers::CTRL),
            KeyChord::char_with_mods('s', Modifiers::CTRL),
        ]);
        assert_eq!(seq.len(), 2);
        assert!(seq.is_multi_chord());
        assert!(KeyChordSequence::default().is_empty());
    }
}
