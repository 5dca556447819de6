//! In-memory record source, e.g. a saved dump of search hits.

use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{SearchError, SearchResult};
use crate::models::SearchHit;

use super::client::HitsEnvelope;
use super::query::SearchQuery;
use super::RecordSource;

/// Accepted dump layouts: a bare array of hits, or a search response.
#[derive(Deserialize)]
#[serde(untagged)]
enum HitsDump {
    Hits(Vec<SearchHit>),
    Response { hits: HitsEnvelope },
}

/// Serves a fixed list of hits for every query.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    hits: Vec<SearchHit>,
}

impl MemorySource {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits }
    }

    pub fn from_json(json: &str) -> SearchResult<Self> {
        let dump: HitsDump = serde_json::from_str(json)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        let hits = match dump {
            HitsDump::Hits(hits) => hits,
            HitsDump::Response { hits } => hits.hits,
        };
        Ok(Self::new(hits))
    }

    pub fn from_file(path: impl AsRef<Path>) -> SearchResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl RecordSource for MemorySource {
    /// The query is ignored.
    fn scan<'a>(&'a self, _query: &'a SearchQuery) -> BoxStream<'a, SearchResult<SearchHit>> {
        stream::iter(self.hits.iter().cloned().map(Ok)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::query_string;
    use futures::TryStreamExt;

    #[test]
    fn test_from_hits_array() {
        let source = MemorySource::from_json(r#"[{"_id": "a", "_source": {"x": 1}}]"#).unwrap();
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_from_search_response() {
        let source = MemorySource::from_json(
            r#"{"took": 1, "hits": {"hits": [{"_id": "a", "_source": {}}, {"_id": "b", "_source": {}}]}}"#,
        )
        .unwrap();
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_invalid_dump() {
        assert!(MemorySource::from_json(r#"{"nope": true}"#).is_err());
    }

    #[tokio::test]
    async fn test_scan_yields_all_hits() {
        let source = MemorySource::from_json(r#"[{"_id": "a"}, {"_id": "b"}]"#).unwrap();
        let query = query_string("Image", "*");
        let ids: Vec<String> = source.scan(&query).map_ok(|h| h.id).try_collect().await.unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
