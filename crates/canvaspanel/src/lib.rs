//! Schema-driven configuration panel for a selected canvas node.
//!
//! The panel edits a draft copy of the node's label and config, renders
//! per-kind field editors from the block type's schema, and writes
//! validated updates back into the graph on save. Failed saves and
//! discarded drafts never corrupt the node's last-saved state.

mod draft;
mod editors;

pub use draft::{ConfigDraft, FieldState};
pub use editors::{EditorWidget, FieldEditor};
