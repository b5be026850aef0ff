//! Validation report accumulated by a rule chain

use std::fmt;

/// One action taking part in a keybinding conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictAction {
    pub action: String,
    /// Native command of the source editor, empty when unknown
    pub editor_command: String,
}

/// A problem found by a validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Several actions share one chord
    KeybindConflict {
        keybinding: String,
        actions: Vec<ConflictAction>,
    },
    /// Action id unknown to the mapping table
    DanglingAction { action: String, suggestion: String },
    /// Same (action, chord) pair listed twice
    DuplicateMapping {
        action: String,
        keybinding: String,
        message: String,
    },
    /// Action has nothing to export to the target editor
    UnsupportedAction {
        action: String,
        keybinding: String,
        target_editor: String,
        note: String,
    },
    /// Chord is a well-known platform shortcut
    PotentialShadowing {
        action: String,
        keybinding: String,
        target_editor: String,
        message: String,
    },
}

impl Issue {
    /// Short rule label used in listings
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::KeybindConflict { .. } => "keybind conflict",
            Issue::DanglingAction { .. } => "dangling action",
            Issue::DuplicateMapping { .. } => "duplicate mapping",
            Issue::UnsupportedAction { .. } => "unsupported action",
            Issue::PotentialShadowing { .. } => "potential shadowing",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::KeybindConflict {
                keybinding,
                actions,
            } => {
                write!(f, "{} is bound to multiple actions:", keybinding)?;
                for a in actions {
                    if a.editor_command.is_empty() {
                        write!(f, " {}", a.action)?;
                    } else {
                        write!(f, " {} ({})", a.action, a.editor_command)?;
                    }
                }
                Ok(())
            }
            Issue::DanglingAction { action, suggestion } => {
                write!(f, "Unknown action '{}'. {}", action, suggestion)
            }
            Issue::DuplicateMapping {
                action,
                keybinding,
                message,
            } => write!(f, "{} on {}: {}", action, keybinding, message),
            Issue::UnsupportedAction {
                action,
                keybinding,
                target_editor,
                note,
            } => {
                write!(
                    f,
                    "{} ({}) cannot be exported to {}",
                    action, keybinding, target_editor
                )?;
                if !note.is_empty() {
                    write!(f, ": {}", note)?;
                }
                Ok(())
            }
            Issue::PotentialShadowing {
                action,
                keybinding,
                target_editor,
                message,
            } => write!(
                f,
                "{} for {} in {}: {}",
                keybinding, action, target_editor, message
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub succeeded: usize,
}

/// Issues block blind acceptance; warnings are advisory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub source_editor: String,
    pub summary: Summary,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(source_editor: impl Into<String>, processed: usize) -> Self {
        Self {
            source_editor: source_editor.into(),
            summary: Summary {
                processed,
                succeeded: 0,
            },
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn add_warning(&mut self, warning: Issue) {
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }

    /// Recompute `succeeded` from the issue count
    pub fn finish(&mut self) {
        self.summary.succeeded = self.summary.processed.saturating_sub(self.issues.len());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validated {} actions ({} ok)",
            self.summary.processed, self.summary.succeeded
        )?;
        for issue in &self.issues {
            writeln!(f, "  error [{}] {}", issue.kind(), issue)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning [{}] {}", warning.kind(), warning)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_clamps_at_zero() {
        let mut report = ValidationReport::new("vscode", 1);
        for action in ["a", "b"] {
            report.add_issue(Issue::DanglingAction {
                action: action.to_string(),
                suggestion: String::new(),
            });
        }
        report.finish();
        assert_eq!(report.summary.succeeded, 0);
    }

    #[test]
    fn test_display_lists_issues_then_warnings() {
        let mut report = ValidationReport::new("vscode", 3);
        report.add_warning(Issue::DuplicateMapping {
            action: "actions.edit.copy".to_string(),
            keybinding: "cmd+c".to_string(),
            message: "defined twice".to_string(),
        });
        report.add_issue(Issue::KeybindConflict {
            keybinding: "cmd+k".to_string(),
            actions: vec![
                ConflictAction {
                    action: "a".to_string(),
                    editor_command: "cmdA".to_string(),
                },
                ConflictAction {
                    action: "b".to_string(),
                    editor_command: String::new(),
                },
            ],
        });
        report.finish();
        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Validated 3 actions (2 ok)");
        assert_eq!(
            lines[1],
            "  error [keybind conflict] cmd+k is bound to multiple actions: a (cmdA) b"
        );
        assert!(lines[2].starts_with("  warning [duplicate mapping]"));
        assert!(!report.is_clean());
    }
}
