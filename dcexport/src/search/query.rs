//! Query builders for the search backend.
//!
//! The flattening core never looks inside a query; these only exist so the CLI
//! does not have to spell out nested Elasticsearch JSON.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ConfigError, ConfigResult};

/// Page size requested from the backend.
pub const PAGE_SIZE: &str = "500";

/// An opaque, already-built backend query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(Value);

impl SearchQuery {
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

/// Query-string search restricted to one model, e.g.
/// `description:(Smokey AND Bear) OR date:[1930-01-01 TO 1937-01-01]`.
pub fn query_string(model: &str, query: &str) -> SearchQuery {
    SearchQuery(json!({
        "size": PAGE_SIZE,
        "query": {
            "bool": {
                "must": [
                    {"match": {"model.name": model}},
                    {"query_string": {"query": query}}
                ]
            }
        }
    }))
}

/// All records of `model` in a collection.
pub fn collection_query(model: &str, collection_id: &str) -> ConfigResult<SearchQuery> {
    let id = Uuid::parse_str(collection_id.trim())
        .map_err(|_| ConfigError::InvalidCollectionId(collection_id.to_string()))?;
    Ok(query_string(model, &format!("collection.id:{}", id)))
}

/// Filesets whose title matches a wildcard such as `*.tif`.
pub fn fileset_title_query(fileset_model: &str, pattern: &str) -> SearchQuery {
    query_string(fileset_model, &format!("simple_title:{}", pattern))
}

/// Works with two or more filesets.
pub fn works_with_multiple_filesets(model: &str) -> SearchQuery {
    SearchQuery(json!({
        "size": PAGE_SIZE,
        "query": {
            "bool": {
                "filter": {
                    "script": {
                        "script": {
                            "lang": "painless",
                            "source": "doc['member_ids.keyword'].values.length >= 2"
                        }
                    }
                },
                "must": [
                    {"term": {"model.name.keyword": model}}
                ]
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string() {
        let query = query_string("Image", r#""Chicago" AND "New York""#);
        assert_eq!(
            query.as_json(),
            &json!({
                "size": "500",
                "query": {"bool": {"must": [
                    {"match": {"model.name": "Image"}},
                    {"query_string": {"query": "\"Chicago\" AND \"New York\""}}
                ]}}
            })
        );
    }

    #[test]
    fn test_collection_query() {
        let query = collection_query("Image", "1c2e2200-c12d-4c7f-8b87-a935c349898a").unwrap();
        assert_eq!(
            query.as_json()["query"]["bool"]["must"][1]["query_string"]["query"],
            "collection.id:1c2e2200-c12d-4c7f-8b87-a935c349898a"
        );
    }

    #[test]
    fn test_collection_query_rejects_bad_id() {
        let err = collection_query("Image", "not-a-uuid").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCollectionId(_)));
    }

    #[test]
    fn test_fileset_title_query() {
        let query = fileset_title_query("FileSet", "*.tif");
        assert_eq!(query.as_json()["query"]["bool"]["must"][0]["match"]["model.name"], "FileSet");
        assert_eq!(
            query.as_json()["query"]["bool"]["must"][1]["query_string"]["query"],
            "simple_title:*.tif"
        );
    }

    #[test]
    fn test_multiple_filesets_query() {
        let query = works_with_multiple_filesets("Image");
        let script = &query.as_json()["query"]["bool"]["filter"]["script"]["script"];
        assert_eq!(script["lang"], "painless");
        assert_eq!(query.as_json()["query"]["bool"]["must"][0]["term"]["model.name.keyword"], "Image");
    }
}
