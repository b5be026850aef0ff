//! Universal keymap model: bindings grouped under universal action ids

use std::fmt;

use crate::platform::Platform;

use super::grammar::{self, ParseError, DEFAULT_SEPARATOR};
use super::types::KeyChordSequence;

/// Platform used for identity and display inside the tool, independent of the user's OS
pub const REFERENCE_PLATFORM: Platform = Platform::MacOS;

/// A key sequence assigned to an action
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    pub chords: KeyChordSequence,
    /// Cached display text of `chords`, never read back as input
    pub readable: String,
    pub comment: Option<String>,
}

impl Binding {
    pub fn new(chords: KeyChordSequence) -> Self {
        Self {
            chords,
            readable: String::new(),
            comment: None,
        }
    }

    /// Parse with the default `+` separator
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        grammar::parse(text, DEFAULT_SEPARATOR).map(Self::new)
    }

    /// Builder method to attach a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn has_chords(&self) -> bool {
        !self.chords.is_empty()
    }

    /// Format for the given platform and separator
    pub fn format(&self, platform: Platform, separator: &str) -> Result<String, ParseError> {
        grammar::format(&self.chords, platform, separator)
    }

    /// Canonical chord text used for identity (`cmd+shift+p` style)
    ///
    /// Chords that cannot be formatted fall back to their debug form so they
    /// still compare unequal to every valid chord.
    pub fn canonical(&self) -> String {
        self.format(REFERENCE_PLATFORM, DEFAULT_SEPARATOR)
            .unwrap_or_else(|_| format!("{:?}", self.chords))
    }

    /// Recompute `readable` from `chords`
    pub fn refresh_readable(&mut self) {
        self.readable = self
            .format(REFERENCE_PLATFORM, DEFAULT_SEPARATOR)
            .unwrap_or_default();
    }
}

/// Identity of one (action, binding) pair, the atomic unit of diffing
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(action: &str, binding: &Binding) -> Self {
        PairKey(format!("{}|{}", action, binding.canonical()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A universal action and the bindings assigned to it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    /// Universal action id, e.g. `actions.edit.copy`
    pub name: String,
    pub bindings: Vec<Binding>,
    pub display_name: String,
    pub description: String,
    pub category: String,
    pub comment: Option<String>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder method to add a binding
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Builder method parsing a `+`-separated key sequence
    pub fn bind(self, keys: &str) -> Result<Self, ParseError> {
        Ok(self.with_binding(Binding::parse(keys)?))
    }

    /// Copy of this action carrying only `binding`
    pub fn with_only(&self, binding: Binding) -> Self {
        Self {
            bindings: vec![binding],
            ..self.clone()
        }
    }

    pub fn pair_keys(&self) -> impl Iterator<Item = PairKey> + '_ {
        self.bindings.iter().map(|b| PairKey::new(&self.name, b))
    }
}

/// Ordered list of actions
///
/// Raw keymaps may carry repeated action names; pipeline outputs have at most
/// one `Action` per name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keymap {
    pub actions: Vec<Action>,
}

impl Keymap {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// First action with this id
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Every (action, binding) pair in order
    pub fn bindings(&self) -> impl Iterator<Item = (&Action, &Binding)> {
        self.actions
            .iter()
            .flat_map(|a| a.bindings.iter().map(move |b| (a, b)))
    }

    /// Total number of bindings across all actions
    pub fn binding_count(&self) -> usize {
        self.actions.iter().map(|a| a.bindings.len()).sum()
    }

    /// Stable sort by action id
    pub fn sort_by_name(&mut self) {
        self.actions.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

impl FromIterator<Action> for Keymap {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_uses_reference_platform() {
        let binding = Binding::parse("meta+shift+p").unwrap();
        assert_eq!(
            PairKey::new("actions.palette", &binding).as_str(),
            "actions.palette|cmd+shift+p"
        );
    }

    #[test]
    fn test_pair_key_ignores_modifier_input_order() {
        let a = Binding::parse("shift+ctrl+k").unwrap();
        let b = Binding::parse("ctrl+shift+k").unwrap();
        assert_eq!(PairKey::new("x", &a), PairKey::new("x", &b));
    }

    #[test]
    fn test_pair_key_empty_chords_are_equal() {
        let a = Binding::default();
        let b = Binding::new(KeyChordSequence::new(Vec::new()));
        assert_eq!(PairKey::new("x", &a), PairKey::new("x", &b));
        assert_eq!(PairKey::new("x", &a).as_str(), "x|");
    }

    #[test]
    fn test_refresh_readable() {
        let mut binding = Binding::parse("win+k ctrl+s").unwrap();
        assert!(binding.readable.is_empty());
        binding.refresh_readable();
        assert_eq!(binding.readable, "cmd+k ctrl+s");
    }

    #[test]
    fn test_action_builders() {
        let action = Action::new("actions.edit.copy")
            .bind("ctrl+c")
            .unwrap()
            .with_binding(Binding::parse("ctrl+insert").unwrap().with_comment("legacy"));
        assert_eq!(action.bindings.len(), 2);
        assert_eq!(action.bindings[1].comment.as_deref(), Some("legacy"));
        assert_eq!(action.pair_keys().count(), 2);
    }

    #[test]
    fn test_keymap_sort_is_stable() {
        let mut keymap: Keymap = vec![
            Action::new("b").bind("x").unwrap(),
            Action::new("a"),
            Action::new("b").bind("y").unwrap(),
        ]
        .into_iter()
        .collect();
        keymap.sort_by_name();
        let names: Vec<_> = keymap.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "b"]);
        assert_eq!(keymap.actions[1].bindings[0].canonical(), "x");
        assert_eq!(keymap.binding_count(), 2);
    }
}
