//! keybridge - move keybindings between editors
//!
//! Editor keymaps are imported into a universal keymap keyed by action ids
//! such as `actions.edit.copy`, and exported back into any editor's native
//! config through a declarative action mapping table.

pub mod bimap;
pub mod changes;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editor;
pub mod export;
pub mod import;
pub mod keymap;
pub mod mappings;
pub mod platform;
pub mod plugin;
pub mod tracing;
pub mod validate;

// Re-export commonly used types
pub use changes::{classify, BindingUpdate, KeymapChanges};
pub use config::AppConfig;
pub use editor::{EditorType, MappingFamily};
pub use keymap::{Action, Binding, Keymap, PairKey};
pub use mappings::ActionMappingTable;
pub use platform::Platform;
pub use plugin::Registry;
pub use validate::{ValidationReport, Validator};
