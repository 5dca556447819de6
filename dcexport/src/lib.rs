//! # dcexport - Digital-collection metadata export
//!
//! dcexport queries a digital-collection search index for work and fileset
//! records, flattens their nested metadata into one string per requested field
//! and writes CSV or XML.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Search    │────▶│  FieldPath  │────▶│  Modifiers  │────▶│  CSV / XML  │
//! │  (scroll)   │     │  + resolve  │     │  + flatten  │     │   writer    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use dcexport::{ModifierPipeline, Record, RowProjector, SchemaProfile, TermTables};
//! use serde_json::json;
//!
//! let record = Record::from_json(json!({
//!     "title": {"primary": ["A", "B"], "alternate": ["C"]},
//!     "permalink": "99999/fk4x",
//! }));
//! let pipeline = ModifierPipeline::new(SchemaProfile::donut(), TermTables::builtin());
//! let projector = RowProjector::new(&["title", "title.primary", "permalink"], pipeline);
//!
//! let row = projector.project_record(&record);
//! assert_eq!(row.cells(), ["A | B | C", "A | B", "https://n2t.net/99999/fk4x"]);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Value, Record, SearchHit, Row
//! - [`flatten`] - Field paths, resolution, modifiers, flattening, projection
//! - [`config`] - Schema profiles, search environments, field lists
//! - [`terms`] - Relator and coded-term lookup tables
//! - [`search`] - Query builders and record sources
//! - [`writer`] - CSV and XML sinks
//! - [`export`] - End-to-end export runs
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Flattening engine
pub mod flatten;

// Configuration
pub mod config;
pub mod terms;

// Collaborators
pub mod export;
pub mod search;
pub mod writer;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, ExportError, ExportResult, SearchError, SearchResult, WriteError,
    WriteResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Mapping, Record, Row, Scalar, SearchHit, Value};

// =============================================================================
// Re-exports - Flattening
// =============================================================================

pub use flatten::{
    discover_fields, flatten, flatten_cell, resolve, resolve_path, FieldPath, ModifierKind,
    ModifierPipeline, RowProjector, DELIMITER,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{
    output_headers, parse_field_list, Environment, SchemaProfile, SearchConfig, MEADOW_FIELDS,
};
pub use terms::{TermTable, TermTables};

// =============================================================================
// Re-exports - Search
// =============================================================================

pub use search::{
    collection_query, fileset_title_query, query_string, works_with_multiple_filesets,
    MemorySource, RecordSource, SearchClient, SearchQuery,
};

// =============================================================================
// Re-exports - Writers
// =============================================================================

pub use writer::{create_writer, output_path, CsvTableWriter, OutputFormat, TableWriter, XmlTableWriter};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{
    export_hits, list_fields, run_export, run_files_match, ExportOptions, ExportSummary,
    FieldSelection,
};
