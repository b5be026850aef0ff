//! Universal keymap model
//!
//! Editor-independent bindings keyed by universal action ids such as
//! `actions.edit.copy`.
//!
//! # Architecture
//!
//! ```text
//! "cmd+k cmd+s" ⇄ grammar ⇄ KeyChordSequence → Binding → Action → Keymap
//!                                                                   ⇅
//!                                                          persist (keymap.json)
//! ```

mod action;
pub mod grammar;
pub mod persist;
mod types;

pub use action::{Action, Binding, Keymap, PairKey, REFERENCE_PLATFORM};
pub use grammar::{ParseError, DEFAULT_SEPARATOR};
pub use persist::{
    load_keymap, load_keymap_file, save_keymap, save_keymap_file, PersistError, SaveOptions,
    FORMAT_VERSION,
};
pub use types::{KeyChord, KeyChordSequence, KeyCode, Modifier, Modifiers, MAX_FUNCTION_KEY};
