//! YAML source format for action mappings
//!
//! A source is a stream of YAML documents, each with a `mappings:` list. Every
//! per-editor field accepts either one mapping object or a list of them:
//!
//! ```yaml
//! mappings:
//!   - id: actions.edit.copy
//!     name: Copy
//!     category: Edit
//!     vscode:
//!       command: editor.action.clipboardCopyAction
//!       when: editorTextFocus
//!     zed:
//!       - action: editor::Copy
//!         context: Editor
//!     intellij:
//!       action: $Copy
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::editor::MappingFamily;

/// Argument payload attached to an editor command
pub type Args = serde_json::Map<String, serde_json::Value>;

/// Root structure of one YAML document
#[derive(Debug, Default, Deserialize)]
pub struct MappingSource {
    #[serde(default)]
    pub mappings: Vec<ActionMappingConfig>,
}

/// A single action entry from YAML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMappingConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub featured_reason: String,
    /// Ids consulted on export when this action has nothing for the target editor
    #[serde(default)]
    pub fallbacks: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub vscode: Vec<VscodeMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub windsurf: Vec<VscodeMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub cursor: Vec<VscodeMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub zed: Vec<ZedMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub intellij: Vec<IntellijMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub vim: Vec<ModalMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub helix: Vec<ModalMapping>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub xcode: Vec<XcodeMapping>,
}

/// Flags shared by every per-editor mapping object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFlags {
    /// Prefer this entry when importing; other entries of the action are ignored for import
    #[serde(default)]
    pub for_import: bool,
    /// Export-only entry
    #[serde(default)]
    pub disable_import: bool,
    #[serde(default)]
    pub not_supported: bool,
    #[serde(default)]
    pub not_supported_reason: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VscodeMapping {
    #[serde(flatten)]
    pub flags: EditorFlags,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub args: Option<Args>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZedMapping {
    #[serde(flatten)]
    pub flags: EditorFlags,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub args: Option<Args>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntellijMapping {
    #[serde(flatten)]
    pub flags: EditorFlags,
    #[serde(default)]
    pub action: String,
}

/// Vim and Helix: a command plus the mode it is bound in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalMapping {
    #[serde(flatten)]
    pub flags: EditorFlags,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub mode: String,
}

/// Xcode: either a menu action (`action` + `commandID`) or text actions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XcodeMapping {
    #[serde(flatten)]
    pub flags: EditorFlags,
    #[serde(default)]
    pub action: String,
    #[serde(default, rename = "commandID")]
    pub command_id: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub text_action: Vec<String>,
}

/// Accept `field: {..}` as well as `field: [{..}, ..]`
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Parse a multi-document YAML stream into its action entries
pub fn parse_mapping_yaml(yaml: &str) -> Result<Vec<ActionMappingConfig>, MappingError> {
    let mut entries = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        let source = Option::<MappingSource>::deserialize(document)
            .map_err(|e| MappingError::Yaml(e.to_string()))?;
        if let Some(source) = source {
            entries.extend(source.mappings);
        }
    }
    Ok(entries)
}

/// Errors that can occur when building the mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    Io(String),
    Yaml(String),
    /// The same universal id is declared twice across sources
    DuplicateActionId(String),
    /// Two universal ids map to the same editor command
    DuplicateActionMapping {
        editor: MappingFamily,
        /// Colliding descriptor key → universal ids sharing it
        duplicates: BTreeMap<String, Vec<String>>,
    },
    InvalidXcodeTextAction {
        id: String,
        reason: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Io(e) => write!(f, "IO error: {}", e),
            MappingError::Yaml(e) => write!(f, "Failed to parse mapping YAML: {}", e),
            MappingError::DuplicateActionId(id) => {
                write!(f, "Duplicate action id '{}' found in mapping sources", id)
            }
            MappingError::DuplicateActionMapping { editor, duplicates } => {
                write!(f, "Duplicate {} action mappings:", editor)?;
                for (key, ids) in duplicates {
                    write!(f, " {} => [{}];", key, ids.join(", "))?;
                }
                Ok(())
            }
            MappingError::InvalidXcodeTextAction { id, reason } => {
                write!(f, "Invalid xcode text action for '{}': {}", id, reason)
            }
        }
    }
}

impl std::error::Error for MappingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_and_list_editor_fields() {
        let yaml = r#"
mappings:
  - id: actions.edit.copy
    name: Copy
    vscode:
      command: editor.action.clipboardCopyAction
      when: editorTextFocus
    zed:
      - action: editor::Copy
        context: Editor
      - action: terminal::Copy
        context: Terminal
"#;
        let entries = parse_mapping_yaml(yaml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].vscode.len(), 1);
        assert_eq!(entries[0].zed.len(), 2);
        assert_eq!(entries[0].zed[1].context, "Terminal");
        assert!(entries[0].intellij.is_empty());
    }

    #[test]
    fn test_parse_flags_and_args() {
        let yaml = r#"
mappings:
  - id: actions.cursor.lineEnd
    featuredReason: common
    fallbacks: [actions.cursor.end]
    vscode:
      command: cursorEnd
      args:
        sticky: false
      forImport: true
    helix:
      notSupported: true
      notSupportedReason: no sticky cursor
"#;
        let entries = parse_mapping_yaml(yaml).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.featured_reason, "common");
        assert_eq!(entry.fallbacks, vec!["actions.cursor.end".to_string()]);
        assert!(entry.vscode[0].flags.for_import);
        let args = entry.vscode[0].args.as_ref().unwrap();
        assert_eq!(args.get("sticky"), Some(&serde_json::Value::Bool(false)));
        assert!(entry.helix[0].flags.not_supported);
        assert_eq!(entry.helix[0].flags.not_supported_reason, "no sticky cursor");
    }

    #[test]
    fn test_parse_xcode_text_action_forms() {
        let yaml = r#"
mappings:
  - id: a
    xcode:
      textAction: "moveWordLeft:"
  - id: b
    xcode:
      disableImport: true
      textAction: ["moveToEndOfLine:", "moveRight:"]
  - id: c
    xcode:
      action: "toggleComments:"
      commandID: Xcode.IDEKit.CmdDefinition.ToggleComments
"#;
        let entries = parse_mapping_yaml(yaml).unwrap();
        assert_eq!(entries[0].xcode[0].text_action, vec!["moveWordLeft:"]);
        assert_eq!(entries[1].xcode[0].text_action.len(), 2);
        assert_eq!(
            entries[2].xcode[0].command_id,
            "Xcode.IDEKit.CmdDefinition.ToggleComments"
        );
    }

    #[test]
    fn test_parse_multi_document_stream() {
        let yaml = "mappings:\n  - id: a\n---\nmappings:\n  - id: b\n---\n";
        let entries = parse_mapping_yaml(yaml).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_empty_stream() {
        assert!(parse_mapping_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let yaml = "mappings:\n  - id: a\n    vscode: [\n";
        assert!(matches!(
            parse_mapping_yaml(yaml),
            Err(MappingError::Yaml(_))
        ));
    }
}
