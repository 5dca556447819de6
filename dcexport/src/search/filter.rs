//! Work filtering by fileset membership.

use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use std::collections::HashSet;

use crate::error::SearchResult;
use crate::models::SearchHit;

use super::query::SearchQuery;
use super::RecordSource;

/// Ids of every hit returned for `query`.
pub async fn collect_ids<S>(source: &S, query: &SearchQuery) -> SearchResult<HashSet<String>>
where
    S: RecordSource + ?Sized,
{
    source.scan(query).map_ok(|hit| hit.id).try_collect().await
}

/// True when any of the work's `member_ids` is in `fileset_ids`.
pub fn has_any_member(work: &SearchHit, fileset_ids: &HashSet<String>) -> bool {
    work.member_ids().iter().any(|id| fileset_ids.contains(*id))
}

/// Keep only works that contain at least one of `fileset_ids`.
pub fn works_with_filesets<'a>(
    works: BoxStream<'a, SearchResult<SearchHit>>,
    fileset_ids: &'a HashSet<String>,
) -> BoxStream<'a, SearchResult<SearchHit>> {
    works
        .try_filter(move |work| future::ready(has_any_member(work, fileset_ids)))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{query::query_string, MemorySource};

    fn works() -> MemorySource {
        MemorySource::from_json(
            r#"[
                {"_id": "w1", "_source": {"member_ids": ["1", "2", "3"]}},
                {"_id": "w2", "_source": {"member_ids": ["5", "6", "7"]}},
                {"_id": "w3", "_source": {"member_ids": ["2", "3", "4"]}},
                {"_id": "w4", "_source": {}}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_has_any_member() {
        let ids: HashSet<String> = ["1".to_string()].into_iter().collect();
        let source = works();
        let query = query_string("Image", "*");
        let hits: Vec<SearchHit> = futures::executor::block_on(source.scan(&query).try_collect()).unwrap();

        assert!(has_any_member(&hits[0], &ids));
        assert!(!has_any_member(&hits[1], &ids));
        assert!(!has_any_member(&hits[3], &ids));
    }

    #[tokio::test]
    async fn test_works_with_filesets() {
        let source = works();
        let query = query_string("Image", "*");
        let fids: HashSet<String> = ["1", "2"].iter().map(|s| s.to_string()).collect();

        let kept: Vec<String> = works_with_filesets(source.scan(&query), &fids)
            .map_ok(|w| w.id)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(kept, vec!["w1", "w3"]);
    }

    #[tokio::test]
    async fn test_collect_ids() {
        let source = works();
        let ids = collect_ids(&source, &query_string("FileSet", "simple_title:*.tif")).await.unwrap();
        assert_eq!(ids.len(), 4);
        assert!(ids.contains("w2"));
    }
}
