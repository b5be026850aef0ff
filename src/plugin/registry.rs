//! Explicit plugin registry, built once and passed to the services

use std::collections::BTreeMap;

use crate::editor::EditorType;

use super::{DemoPlugin, Plugin, VscodePlugin};

#[derive(Default)]
pub struct Registry {
    plugins: BTreeMap<EditorType, Box<dyn Plugin>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled plugin
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(VscodePlugin::vscode()));
        registry.register(Box::new(VscodePlugin::windsurf()));
        registry.register(Box::new(VscodePlugin::windsurf_next()));
        registry.register(Box::new(VscodePlugin::cursor()));
        registry.register(Box::new(DemoPlugin));
        registry
    }

    /// Add a plugin, replacing any previous one for the same editor
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        let editor = plugin.editor_type();
        if self.plugins.insert(editor, plugin).is_some() {
            tracing::debug!("Replaced plugin for {}", editor);
        }
    }

    pub fn get(&self, editor: EditorType) -> Option<&dyn Plugin> {
        self.plugins.get(&editor).map(|p| p.as_ref())
    }

    /// Registered editors in a stable order
    pub fn names(&self) -> Vec<EditorType> {
        self.plugins.keys().copied().collect()
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.values().map(|p| p.as_ref())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("plugins", &self.names())
            .finish()
    }
}
