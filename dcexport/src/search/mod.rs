//! Record sources: where search hits come from.
//!
//! - `query`: query builders (opaque to the flattening core)
//! - `client`: scroll-based HTTP client for the search proxy
//! - `memory`: in-memory / file-backed source
//! - `filter`: fileset-membership filtering for `files-match`

pub mod client;
pub mod filter;
pub mod memory;
pub mod query;

use futures::stream::BoxStream;

use crate::error::SearchResult;
use crate::models::SearchHit;

pub use client::{parse_page, SearchClient};
pub use filter::{collect_ids, has_any_member, works_with_filesets};
pub use memory::MemorySource;
pub use query::{
    collection_query, fileset_title_query, query_string, works_with_multiple_filesets, SearchQuery,
};

/// Produces a finite, lazy stream of hits for a query.
///
/// Transport failures are yielded as stream items and end the export; sources
/// do not retry.
pub trait RecordSource {
    fn scan<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, SearchResult<SearchHit>>;
}
