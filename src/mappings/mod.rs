//! Action mapping table
//!
//! Universal action ids mapped to per-editor command descriptors, loaded from a
//! declarative YAML source and checked for ambiguity at build time.

mod config;
mod defaults;
mod table;

pub use config::{
    parse_mapping_yaml, ActionMappingConfig, Args, EditorFlags, IntellijMapping, MappingError,
    MappingSource, ModalMapping, VscodeMapping, XcodeMapping, ZedMapping,
};
pub use defaults::{embedded_mappings_yaml, load_mapping_table, load_mapping_table_from_str};
pub use table::{
    args_match, ActionDescriptor, ActionMapping, ActionMappingTable, ReverseQuery,
    NOT_SUPPORTED_NOTE, XCODE_TEXT_MODE,
};
