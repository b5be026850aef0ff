//! The merged action mapping table
//!
//! Built once from declarative entries and immutable afterwards. Lookups go
//! both ways: universal id → editor descriptors for export, and editor command
//! → universal id for import.

use std::collections::{BTreeMap, HashMap};

use crate::editor::MappingFamily;

use super::config::{
    ActionMappingConfig, Args, EditorFlags, IntellijMapping, MappingError, ModalMapping,
    VscodeMapping, XcodeMapping, ZedMapping,
};

/// One editor-native command an action maps to
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// Command or action name in the editor's vocabulary
    pub command: String,
    /// `when` clause, Zed context or Xcode command id
    pub context: Option<String>,
    pub args: Option<Args>,
    /// Vim/Helix mode, or `text` for Xcode text actions
    pub mode: Option<String>,
    /// Eligible for reverse resolution
    pub import_enabled: bool,
    /// Eligible for forward resolution
    pub export_enabled: bool,
    /// Preferred entry for import within its action
    pub for_import: bool,
    pub note: Option<String>,
}

impl ActionDescriptor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            context: None,
            args: None,
            mode: None,
            import_enabled: true,
            export_enabled: true,
            for_import: false,
            note: None,
        }
    }

    /// Builder method to set the context (`when` clause, Zed context)
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = non_empty(context.into());
        self
    }

    pub fn args(mut self, args: Args) -> Self {
        self.args = Some(args);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = non_empty(mode.into());
        self
    }

    fn with_flags(mut self, flags: &EditorFlags) -> Self {
        self.import_enabled = !flags.disable_import && !flags.not_supported;
        self.export_enabled = !flags.not_supported;
        self.for_import = flags.for_import;
        self.note = non_empty(flags.note.clone());
        self
    }

    /// Whether an editor entry with these fields is this descriptor
    pub fn matches(&self, query: &ReverseQuery<'_>) -> bool {
        self.command == query.command
            && self.context.as_deref() == query.context.filter(|c| !c.is_empty())
            && self.mode.as_deref() == query.mode.filter(|m| !m.is_empty())
            && args_match(self.args.as_ref(), query.args)
    }
}

/// Absent and present args never match; present args compare structurally
pub fn args_match(a: Option<&Args>, b: Option<&Args>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Stable text form of args used for duplicate detection
fn canonical_args(args: Option<&Args>) -> String {
    args.and_then(|a| serde_json::to_string(a).ok())
        .unwrap_or_default()
}

/// Editor entry to look up during import
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseQuery<'a> {
    pub command: &'a str,
    pub context: Option<&'a str>,
    pub args: Option<&'a Args>,
    pub mode: Option<&'a str>,
}

impl<'a> ReverseQuery<'a> {
    pub fn command(command: &'a str) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_args(mut self, args: Option<&'a Args>) -> Self {
        self.args = args;
        self
    }

    pub fn with_mode(mut self, mode: &'a str) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Everything the table knows about one universal action
#[derive(Debug, Clone, Default)]
pub struct ActionMapping {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub featured: bool,
    pub featured_reason: String,
    pub fallbacks: Vec<String>,
    editors: BTreeMap<MappingFamily, EditorMapping>,
}

#[derive(Debug, Clone, Default)]
struct EditorMapping {
    descriptors: Vec<ActionDescriptor>,
    /// Set when the editor is explicitly marked as not supporting the action
    not_supported: Option<String>,
}

/// Note attached to an explicit `notSupported` entry without a reason
pub const NOT_SUPPORTED_NOTE: &str = "explicitly marked as not supported";

impl ActionMapping {
    fn editor(&self, family: MappingFamily) -> Option<&EditorMapping> {
        let own = self.editors.get(&family);
        match family {
            // Windsurf and Cursor inherit VSCode mappings unless they declare their own
            MappingFamily::Windsurf | MappingFamily::Cursor if own.is_none() => {
                self.editors.get(&MappingFamily::VSCode)
            }
            _ => own,
        }
    }

    /// Descriptors usable for export, empty when unmapped or not supported
    pub fn descriptors(&self, family: MappingFamily) -> Vec<&ActionDescriptor> {
        match self.editor(family) {
            Some(editor) if editor.not_supported.is_none() => editor
                .descriptors
                .iter()
                .filter(|d| d.export_enabled && !d.command.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Descriptors eligible for reverse resolution
    ///
    /// When any descriptor is marked `forImport`, only those are eligible.
    pub fn import_descriptors(&self, family: MappingFamily) -> Vec<&ActionDescriptor> {
        let Some(editor) = self.editor(family) else {
            return Vec::new();
        };
        let eligible = editor
            .descriptors
            .iter()
            .filter(|d| d.import_enabled && !d.command.is_empty());
        if editor.descriptors.iter().any(|d| d.for_import) {
            eligible.filter(|d| d.for_import).collect()
        } else {
            eligible.collect()
        }
    }

    /// Whether the action can be exported to the editor, with an explanatory note
    pub fn is_supported(&self, family: MappingFamily) -> (bool, String) {
        let Some(editor) = self.editor(family) else {
            return (false, String::new());
        };
        if let Some(reason) = &editor.not_supported {
            return (false, reason.clone());
        }
        let descriptors = self.descriptors(family);
        let note = descriptors
            .iter()
            .find_map(|d| d.note.clone())
            .unwrap_or_default();
        (!descriptors.is_empty(), note)
    }
}

/// The merged, validated table of universal actions
#[derive(Debug, Clone, Default)]
pub struct ActionMappingTable {
    mappings: BTreeMap<String, ActionMapping>,
}

impl ActionMappingTable {
    /// Build from raw entries, rejecting repeated ids and colliding editor commands
    pub fn build(entries: Vec<ActionMappingConfig>) -> Result<Self, MappingError> {
        let mut mappings = BTreeMap::new();
        for entry in entries {
            if mappings.contains_key(&entry.id) {
                return Err(MappingError::DuplicateActionId(entry.id));
            }
            validate_xcode(&entry)?;
            let mapping = convert(&entry);
            mappings.insert(entry.id, mapping);
        }

        let table = Self { mappings };
        table.check_duplicates()?;
        Ok(table)
    }

    pub fn get(&self, id: &str) -> Option<&ActionMapping> {
        self.mappings.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mappings.contains_key(id)
    }

    /// All universal ids, ascending
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub fn mappings(&self) -> impl Iterator<Item = &ActionMapping> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Export descriptors for an action; empty if unmapped or not supported
    pub fn resolve(&self, id: &str, family: MappingFamily) -> Vec<&ActionDescriptor> {
        self.get(id)
            .map(|m| m.descriptors(family))
            .unwrap_or_default()
    }

    /// Like [`resolve`](Self::resolve), then tries the action's fallbacks in order
    ///
    /// Returns the id whose descriptors were used.
    pub fn resolve_for_export<'a>(
        &'a self,
        id: &'a str,
        family: MappingFamily,
    ) -> Option<(&'a str, Vec<&'a ActionDescriptor>)> {
        let mapping = self.get(id)?;
        let own = mapping.descriptors(family);
        if !own.is_empty() {
            return Some((id, own));
        }
        mapping.fallbacks.iter().find_map(|fallback| {
            let descriptors = self.resolve(fallback, family);
            (!descriptors.is_empty()).then_some((fallback.as_str(), descriptors))
        })
    }

    /// Find the universal id an editor entry belongs to
    ///
    /// Ids are scanned in ascending order and the first match is returned.
    pub fn reverse_resolve(&self, family: MappingFamily, query: &ReverseQuery<'_>) -> Option<&str> {
        self.mappings
            .values()
            .find(|m| m.import_descriptors(family).iter().any(|d| d.matches(query)))
            .map(|m| m.id.as_str())
    }

    /// Whether any current descriptor, import-enabled or not, produces this entry
    pub fn is_managed(&self, family: MappingFamily, query: &ReverseQuery<'_>) -> bool {
        self.mappings
            .values()
            .any(|m| m.descriptors(family).iter().any(|d| d.matches(query)))
    }

    pub fn is_supported(&self, id: &str, family: MappingFamily) -> (bool, String) {
        self.get(id)
            .map(|m| m.is_supported(family))
            .unwrap_or((false, String::new()))
    }

    fn check_duplicates(&self) -> Result<(), MappingError> {
        for family in MappingFamily::ALL {
            let mut seen: HashMap<String, String> = HashMap::new();
            let mut duplicates: BTreeMap<String, Vec<String>> = BTreeMap::new();

            for mapping in self.mappings.values() {
                let Some(editor) = mapping.editors.get(&family) else {
                    continue;
                };
                for descriptor in editor
                    .descriptors
                    .iter()
                    .filter(|d| d.import_enabled && !d.command.is_empty())
                {
                    let key = duplicate_key(family, descriptor);
                    match seen.get(&key) {
                        Some(first) if first != &mapping.id => {
                            let ids = duplicates
                                .entry(key)
                                .or_insert_with(|| vec![first.clone()]);
                            if !ids.contains(&mapping.id) {
                                ids.push(mapping.id.clone());
                            }
                        }
                        Some(_) => {}
                        None => {
                            seen.insert(key, mapping.id.clone());
                        }
                    }
                }
            }

            if !duplicates.is_empty() {
                return Err(MappingError::DuplicateActionMapping {
                    editor: family,
                    duplicates,
                });
            }
        }
        Ok(())
    }
}

/// Fields that identify an editor command for duplicate detection
fn duplicate_key(family: MappingFamily, d: &ActionDescriptor) -> String {
    let context = d.context.as_deref().unwrap_or_default();
    match family {
        MappingFamily::VSCode | MappingFamily::Windsurf | MappingFamily::Cursor => format!(
            "{{\"command\":{:?},\"when\":{:?},\"args\":{:?}}}",
            d.command,
            context,
            canonical_args(d.args.as_ref())
        ),
        MappingFamily::Zed => format!(
            "{{\"action\":{:?},\"context\":{:?},\"args\":{:?}}}",
            d.command,
            context,
            canonical_args(d.args.as_ref())
        ),
        MappingFamily::IntelliJ => format!("{{\"action\":{:?}}}", d.command),
        MappingFamily::Vim | MappingFamily::Helix => format!(
            "{{\"command\":{:?},\"mode\":{:?}}}",
            d.command,
            d.mode.as_deref().unwrap_or_default()
        ),
        MappingFamily::Xcode if d.mode.as_deref() == Some(XCODE_TEXT_MODE) => {
            format!("{{\"textAction\":{:?}}}", d.command)
        }
        MappingFamily::Xcode => format!(
            "{{\"action\":{:?},\"commandID\":{:?}}}",
            d.command, context
        ),
    }
}

/// Mode marking Xcode text-action descriptors
pub const XCODE_TEXT_MODE: &str = "text";

fn validate_xcode(entry: &ActionMappingConfig) -> Result<(), MappingError> {
    for xcode in &entry.xcode {
        if let Some(bad) = xcode.text_action.iter().find(|t| !t.ends_with(':')) {
            return Err(MappingError::InvalidXcodeTextAction {
                id: entry.id.clone(),
                reason: format!("'{}' must end with ':'", bad),
            });
        }
        if xcode.text_action.len() > 1 && !xcode.flags.disable_import {
            return Err(MappingError::InvalidXcodeTextAction {
                id: entry.id.clone(),
                reason: "multiple text actions require disableImport".to_string(),
            });
        }
    }
    Ok(())
}

fn convert(entry: &ActionMappingConfig) -> ActionMapping {
    let mut editors = BTreeMap::new();
    let columns = [
        (MappingFamily::VSCode, vscode_descriptors(&entry.vscode)),
        (MappingFamily::Windsurf, vscode_descriptors(&entry.windsurf)),
        (MappingFamily::Cursor, vscode_descriptors(&entry.cursor)),
        (MappingFamily::Zed, zed_descriptors(&entry.zed)),
        (MappingFamily::IntelliJ, intellij_descriptors(&entry.intellij)),
        (MappingFamily::Vim, modal_descriptors(&entry.vim)),
        (MappingFamily::Helix, modal_descriptors(&entry.helix)),
        (MappingFamily::Xcode, xcode_descriptors(&entry.xcode)),
    ];
    for (family, items) in columns {
        if let Some(editor) = editor_mapping(items) {
            editors.insert(family, editor);
        }
    }

    ActionMapping {
        id: entry.id.clone(),
        name: entry.name.clone(),
        description: entry.description.clone(),
        category: entry.category.clone(),
        featured: entry.featured,
        featured_reason: entry.featured_reason.clone(),
        fallbacks: entry.fallbacks.clone(),
        editors,
    }
}

fn editor_mapping(items: Vec<(ActionDescriptor, &EditorFlags)>) -> Option<EditorMapping> {
    if items.is_empty() {
        return None;
    }
    let not_supported = items.iter().find(|(_, f)| f.not_supported).map(|(_, f)| {
        non_empty(f.not_supported_reason.clone()).unwrap_or_else(|| NOT_SUPPORTED_NOTE.to_string())
    });
    Some(EditorMapping {
        descriptors: items.into_iter().map(|(d, _)| d).collect(),
        not_supported,
    })
}

fn vscode_descriptors(items: &[VscodeMapping]) -> Vec<(ActionDescriptor, &EditorFlags)> {
    items
        .iter()
        .map(|m| {
            let mut d = ActionDescriptor::new(m.command.clone())
                .context(m.when.clone())
                .with_flags(&m.flags);
            d.args = m.args.clone();
            (d, &m.flags)
        })
        .collect()
}

fn zed_descriptors(items: &[ZedMapping]) -> Vec<(ActionDescriptor, &EditorFlags)> {
    items
        .iter()
        .map(|m| {
            let mut d = ActionDescriptor::new(m.action.clone())
                .context(m.context.clone())
                .with_flags(&m.flags);
            d.args = m.args.clone();
            (d, &m.flags)
        })
        .collect()
}

fn intellij_descriptors(items: &[IntellijMapping]) -> Vec<(ActionDescriptor, &EditorFlags)> {
    items
        .iter()
        .map(|m| (ActionDescriptor::new(m.action.clone()).with_flags(&m.flags), &m.flags))
        .collect()
}

fn modal_descriptors(items: &[ModalMapping]) -> Vec<(ActionDescriptor, &EditorFlags)> {
    items
        .iter()
        .map(|m| {
            let d = ActionDescriptor::new(m.command.clone())
                .mode(m.mode.clone())
                .with_flags(&m.flags);
            (d, &m.flags)
        })
        .collect()
}

/// Menu actions keep their command id as context; text actions are tagged by mode
fn xcode_descriptors(items: &[XcodeMapping]) -> Vec<(ActionDescriptor, &EditorFlags)> {
    let mut out = Vec::new();
    for m in items {
        if !m.action.is_empty() {
            let d = ActionDescriptor::new(m.action.clone())
                .context(m.command_id.clone())
                .with_flags(&m.flags);
            out.push((d, &m.flags));
        }
        for text in &m.text_action {
            let d = ActionDescriptor::new(text.clone())
                .mode(XCODE_TEXT_MODE)
                .with_flags(&m.flags);
            out.push((d, &m.flags));
        }
        // notSupported entries carry neither
        if m.action.is_empty() && m.text_action.is_empty() {
            out.push((ActionDescriptor::new("").with_flags(&m.flags), &m.flags));
        }
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
