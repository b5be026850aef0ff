//! Export pipeline
//!
//! Universal bindings are resolved into editor-native entries, merged with
//! the user's existing config so entries the tool does not manage survive,
//! and the change is presented as a diff.

mod diff;
mod entries;
mod marker;
mod service;

pub use diff::{structured_diff, unified_diff, DiffStyle};
pub use entries::{generate_entries, merge, partition, ConfigEntry, KeyFormat};
pub use marker::{ExportMarker, ExportSkipAction, ACTION_NOT_SUPPORTED};
pub use service::{ExportOptions, ExportOutput, ExportReport, ExportService};
