//! Metadata flattening engine.
//!
//! Turns nested work/fileset metadata into one string per requested field:
//!
//! ```text
//! "subject.label" ─▶ FieldPath ─▶ resolve ─▶ ModifierPipeline ─▶ flatten ─▶ "A | B"
//! ```
//!
//! - `field_path`: parse field specs (`title.primary`, `contributor-batch`, ...)
//! - `resolve`: look a field up in a record and narrow it by key
//! - `modifiers`: raw / batch / json / values / permalink / thumbnail / default
//! - `flattener`: depth-first collapse, joined with `" | "`
//! - `projector`: rows for a whole record stream, plus field discovery
//!
//! ## Example
//!
//! ```rust,ignore
//! use dcexport::flatten::{ModifierPipeline, RowProjector};
//!
//! let projector = RowProjector::new(&["id", "title", "subject.label"], ModifierPipeline::default());
//! for row in projector.project(&hits) {
//!     println!("{}", row.join(","));
//! }
//! ```

pub mod field_path;
pub mod flattener;
pub mod modifiers;
pub mod projector;
pub mod resolve;

// Re-exports for convenience
pub use field_path::{FieldPath, ModifierKind, PERMALINK_FIELD, THUMBNAIL_FIELD};
pub use flattener::{flatten, flatten_cell, DELIMITER};
pub use modifiers::ModifierPipeline;
pub use projector::{discover_fields, RowProjector};
pub use resolve::{resolve, resolve_path};
