//! Universal keymap file (JSON)
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "keymaps": [
//!     { "id": "actions.edit.copy", "keybinding": "cmd+c" },
//!     { "id": "actions.edit.paste", "keybinding": ["cmd+v", "shift+insert"] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

use super::action::{Action, Binding, Keymap, REFERENCE_PLATFORM};
use super::grammar::{self, ParseError, DEFAULT_SEPARATOR};

/// Current file format version
pub const FORMAT_VERSION: &str = "1.0";

/// Root structure of a universal keymap file
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub keymaps: Vec<KeymapEntry>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// One action entry of the file
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybinding: Option<Keybindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `keybinding` accepts a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keybindings {
    One(String),
    Many(Vec<String>),
}

impl Keybindings {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Keybindings::One(s) => std::slice::from_ref(s),
            Keybindings::Many(v) => v,
        }
    }

    fn from_vec(mut keys: Vec<String>) -> Option<Self> {
        match keys.len() {
            0 => None,
            1 => keys.pop().map(Keybindings::One),
            _ => Some(Keybindings::Many(keys)),
        }
    }
}

/// Options for writing a keymap file
#[derive(Debug, Clone, Copy)]
pub struct SaveOptions {
    /// Platform used to spell the Meta modifier
    pub platform: Platform,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            platform: REFERENCE_PLATFORM,
        }
    }
}

/// Errors that can occur reading or writing a keymap file
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedVersion(String),
    InvalidKeybinding {
        id: String,
        keybinding: String,
        source: ParseError,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "IO error: {}", e),
            PersistError::Json(e) => write!(f, "Invalid keymap file: {}", e),
            PersistError::UnsupportedVersion(v) => {
                write!(f, "Unsupported keymap file version: {}", v)
            }
            PersistError::InvalidKeybinding {
                id,
                keybinding,
                source,
            } => write!(
                f,
                "Failed to parse keybinding '{}' for id '{}': {}",
                keybinding, id, source
            ),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Json(e) => Some(e),
            PersistError::InvalidKeybinding { source, .. } => Some(source),
            PersistError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

/// Load a keymap file from disk
pub fn load_keymap_file(path: &Path) -> Result<Keymap, PersistError> {
    let content = std::fs::read_to_string(path)?;
    let keymap = load_keymap(&content)?;
    tracing::info!(
        "Loaded keymap from {} ({} actions)",
        path.display(),
        keymap.len()
    );
    Ok(keymap)
}

/// Parse a keymap file
///
/// Empty input yields an empty keymap. Entries sharing an id are merged into one
/// action in first-seen order; the first non-empty metadata wins.
pub fn load_keymap(json: &str) -> Result<Keymap, PersistError> {
    if json.trim().is_empty() {
        return Ok(Keymap::default());
    }

    let file: KeymapFile = serde_json::from_str(json)?;
    if file.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(file.version));
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut actions: Vec<Action> = Vec::new();

    for entry in file.keymaps {
        let pos = *index.entry(entry.id.clone()).or_insert_with(|| {
            actions.push(Action::new(entry.id.clone()));
            actions.len() - 1
        });
        let action = &mut actions[pos];

        fill_if_empty(&mut action.display_name, entry.name);
        fill_if_empty(&mut action.description, entry.description);
        if action.comment.is_none() {
            action.comment = entry.comment.filter(|c| !c.is_empty());
        }

        let Some(keys) = entry.keybinding else {
            continue;
        };
        for text in keys.as_slice() {
            let chords = grammar::parse(text, DEFAULT_SEPARATOR).map_err(|source| {
                PersistError::InvalidKeybinding {
                    id: entry.id.clone(),
                    keybinding: text.clone(),
                    source,
                }
            })?;
            action.bindings.push(Binding {
                chords,
                readable: text.clone(),
                comment: None,
            });
        }
    }

    Ok(Keymap::new(actions))
}

fn fill_if_empty(slot: &mut String, value: Option<String>) {
    if slot.is_empty() {
        if let Some(v) = value {
            *slot = v;
        }
    }
}

/// Serialize a keymap, one entry per action id, sorted by id
pub fn save_keymap(keymap: &Keymap, options: SaveOptions) -> Result<String, PersistError> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, KeymapEntry> = HashMap::new();
    let mut keys_by_id: HashMap<String, Vec<String>> = HashMap::new();

    for action in &keymap.actions {
        if !grouped.contains_key(&action.name) {
            order.push(action.name.clone());
            grouped.insert(
                action.name.clone(),
                KeymapEntry {
                    id: action.name.clone(),
                    keybinding: None,
                    comment: non_empty(action.comment.clone().unwrap_or_default()),
                    description: non_empty(action.description.clone()),
                    name: non_empty(action.display_name.clone()),
                },
            );
        }
        let keys = keys_by_id.entry(action.name.clone()).or_default();
        for binding in action.bindings.iter().filter(|b| b.has_chords()) {
            let text = binding
                .format(options.platform, DEFAULT_SEPARATOR)
                .map_err(|source| PersistError::InvalidKeybinding {
                    id: action.name.clone(),
                    keybinding: format!("{:?}", binding.chords),
                    source,
                })?;
            keys.push(text);
        }
    }

    order.sort();
    let mut keymaps = Vec::with_capacity(order.len());
    for id in order {
        if let Some(mut entry) = grouped.remove(&id) {
            entry.keybinding = Keybindings::from_vec(keys_by_id.remove(&id).unwrap_or_default());
            keymaps.push(entry);
        }
    }

    let file = KeymapFile {
        version: FORMAT_VERSION.to_string(),
        keymaps,
    };
    let mut out = serde_json::to_string_pretty(&file)?;
    out.push('\n');
    Ok(out)
}

/// Write a keymap file to disk, creating the parent directory
pub fn save_keymap_file(
    path: &Path,
    keymap: &Keymap,
    options: SaveOptions,
) -> Result<(), PersistError> {
    let content = save_keymap(keymap, options)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    tracing::info!("Saved keymap to {}", path.display());
    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
