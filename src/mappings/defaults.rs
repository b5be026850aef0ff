//! Bundled mapping source and layered loading
//!
//! The bundled YAML is embedded at compile time. Extra sources are appended as
//! further documents of the same stream, so a repeated id in a user file is an
//! error rather than an override.

use std::path::PathBuf;

use super::config::{parse_mapping_yaml, MappingError};
use super::table::ActionMappingTable;

const EMBEDDED_MAPPINGS: &str = include_str!("../../action_mappings.yaml");

/// The bundled mapping YAML source
pub fn embedded_mappings_yaml() -> &'static str {
    EMBEDDED_MAPPINGS
}

/// Build a table from the bundled source plus `extra` YAML files
pub fn load_mapping_table(extra: &[PathBuf]) -> Result<ActionMappingTable, MappingError> {
    let mut stream = String::from(EMBEDDED_MAPPINGS);
    for path in extra {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MappingError::Io(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Loaded extra action mappings from {}", path.display());
        stream.push_str("\n---\n");
        stream.push_str(&content);
    }
    load_mapping_table_from_str(&stream)
}

/// Build a table from an in-memory YAML stream
pub fn load_mapping_table_from_str(yaml: &str) -> Result<ActionMappingTable, MappingError> {
    let entries = parse_mapping_yaml(yaml)?;
    let table = ActionMappingTable::build(entries)?;
    tracing::debug!("Built action mapping table with {} actions", table.len());
    Ok(table)
}
