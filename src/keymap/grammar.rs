//! Chord grammar: human-readable strings ↔ chord model
//!
//! `"ctrl+k ctrl+s"` parses into a two-chord sequence. Chords are separated by
//! a single space; keys within a chord by a configurable separator (`+` for
//! most editors, `-` for Zed and Helix).

use std::fmt;
use std::sync::OnceLock;

use crate::bimap::BiMap;
use crate::platform::Platform;

use super::types::{KeyChord, KeyChordSequence, KeyCode, Modifier, Modifiers};

/// Separator used inside a chord unless an editor needs another one
pub const DEFAULT_SEPARATOR: &str = "+";

/// Errors produced by the chord grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input (or one chord of it) was empty
    EmptyInput,
    /// A non-modifier appeared before the key of a chord
    MultipleKeyCodes { first: String, second: String },
    /// A multi-character key name outside the known set
    UnknownKeyCode(String),
    /// A chord made only of modifiers, but not exactly one
    NoKeyCodeFound(String),
    /// Formatting a chord that has no key and not exactly one modifier
    EmptyKeyCode,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "cannot parse empty key chord"),
            ParseError::MultipleKeyCodes { first, second } => write!(
                f,
                "invalid key chord: multiple key codes found ('{}' and '{}')",
                first, second
            ),
            ParseError::UnknownKeyCode(k) => write!(f, "invalid key code: '{}'", k),
            ParseError::NoKeyCodeFound(chord) => {
                write!(f, "invalid key chord: no key code found in '{}'", chord)
            }
            ParseError::EmptyKeyCode => {
                write!(f, "key chord has no key code and not exactly one modifier")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Lookup table between named keys and their spelling
fn key_names() -> &'static BiMap<KeyCode, &'static str> {
    static TABLE: OnceLock<BiMap<KeyCode, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BiMap::from_pairs(
            KeyCode::named().filter_map(|key| key.name().map(|name| (key, name))),
        )
    })
}

/// Parse a modifier name, accepting the platform aliases for Meta
pub fn parse_modifier(name: &str) -> Option<Modifier> {
    match name {
        "ctrl" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" => Some(Modifier::Alt),
        "meta" | "cmd" | "win" => Some(Modifier::Meta),
        _ => None,
    }
}

/// Spelling of a modifier on the given platform
pub fn modifier_name(modifier: Modifier, platform: Platform) -> &'static str {
    match modifier {
        Modifier::Meta => match platform {
            Platform::MacOS => "cmd",
            Platform::Windows => "win",
            Platform::Linux => "meta",
        },
        Modifier::Ctrl => "ctrl",
        Modifier::Shift => "shift",
        Modifier::Alt => "alt",
    }
}

/// Parse a key code: any single character, or a known key name
pub fn parse_key_code(name: &str) -> Result<KeyCode, ParseError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    key_names()
        .get_inverse(name)
        .copied()
        .ok_or_else(|| ParseError::UnknownKeyCode(name.to_string()))
}

/// Parse a whole key sequence such as `"ctrl+k ctrl+s"`
pub fn parse(text: &str, separator: &str) -> Result<KeyChordSequence, ParseError> {
    if text.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let lower = text.to_lowercase();
    let chords = lower
        .split(' ')
        .map(|token| parse_chord(token, separator))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(KeyChordSequence::new(chords))
}

/// Parse a single chord such as `"ctrl+shift+p"`; input must already be lowercase
pub fn parse_chord(token: &str, separator: &str) -> Result<KeyChord, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let separator = if separator.is_empty() {
        DEFAULT_SEPARATOR
    } else {
        separator
    };

    let parts: Vec<&str> = token.split(separator).collect();
    let (last, leading) = match parts.split_last() {
        Some(split) => split,
        None => return Err(ParseError::EmptyInput),
    };

    let mut mods = Modifiers::NONE;
    let mut key = KeyCode::Unspecified;

    if last.is_empty() && token.ends_with(separator) {
        // "ctrl+alt++": the separator itself is the key
        key = parse_key_code(separator)?;
    } else if let Some(modifier) = parse_modifier(last) {
        mods.insert(modifier);
    } else {
        key = parse_key_code(last)?;
    }

    for part in leading.iter().filter(|p| !p.is_empty()) {
        match parse_modifier(part) {
            Some(modifier) => mods.insert(modifier),
            None => {
                return Err(ParseError::MultipleKeyCodes {
                    first: part.to_string(),
                    second: if key.is_unspecified() {
                        last.to_string()
                    } else {
                        key.to_string()
                    },
                })
            }
        }
    }

    let chord = KeyChord::new(key, mods);
    if !chord.is_valid() {
        return Err(ParseError::NoKeyCodeFound(token.to_string()));
    }
    Ok(chord)
}

/// Format a single chord with modifiers in canonical order
pub fn format_chord(
    chord: &KeyChord,
    platform: Platform,
    separator: &str,
) -> Result<String, ParseError> {
    let mut parts: Vec<String> = chord
        .mods
        .iter()
        .map(|m| modifier_name(m, platform).to_string())
        .collect();

    if chord.key.is_unspecified() {
        if chord.mods.len() != 1 {
            return Err(ParseError::EmptyKeyCode);
        }
    } else {
        parts.push(chord.key.to_string());
    }

    Ok(parts.join(separator))
}

/// Format a key sequence; chords are joined with a single space
pub fn format(
    sequence: &KeyChordSequence,
    platform: Platform,
    separator: &str,
) -> Result<String, ParseError> {
    let chords = sequence
        .chords()
        .iter()
        .map(|chord| format_chord(chord, platform, separator))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(chords.join(" "))
}
