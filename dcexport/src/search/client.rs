//! HTTP client for the search proxy.
//!
//! Pages through results with the scroll API:
//!
//! ```text
//! POST {base}{index}/_search?scroll=5m   (query)       -> page 1 + scroll id
//! POST {base}_search/scroll              (scroll id)   -> page 2..n
//! DELETE {base}_search/scroll            (scroll id)   -> release context
//! ```
//!
//! No retries: a failed request ends the stream with the error.

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{Environment, SearchConfig};
use crate::error::{SearchError, SearchResult};
use crate::logs::{log_debug, log_warning};
use crate::models::SearchHit;

use super::query::SearchQuery;
use super::RecordSource;

/// One page of a scroll.
#[derive(Debug, Deserialize)]
pub struct ScrollPage {
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,
    pub hits: HitsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug)]
enum ScanState {
    Start,
    Scrolling(String),
    Done,
}

/// Search proxy client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Client for a deployed environment (`DCEXPORT_SEARCH_URL` overrides).
    pub fn for_environment(environment: Environment) -> SearchResult<Self> {
        Self::new(SearchConfig::for_environment(environment))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn search_url(&self) -> String {
        format!(
            "{}{}/_search?scroll={}",
            self.config.base_url, self.config.index, self.config.scroll_ttl
        )
    }

    fn scroll_url(&self) -> String {
        format!("{}_search/scroll", self.config.base_url)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> SearchResult<ScrollPage> {
        log_debug(format!("POST {}", url));
        let response = self.http.post(url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_page(&text)
    }

    async fn clear_scroll(&self, scroll_id: &str) {
        let result = self
            .http
            .delete(self.scroll_url())
            .json(&json!({ "scroll_id": [scroll_id] }))
            .send()
            .await;

        if let Err(e) = result {
            log_warning(format!("Could not clear scroll context: {}", e));
        }
    }

    async fn step(
        &self,
        query: &SearchQuery,
        state: ScanState,
    ) -> SearchResult<Option<(Vec<SearchHit>, ScanState)>> {
        let page = match state {
            ScanState::Start => {
                log_debug(format!("Query: {}", query.as_json()));
                self.post(&self.search_url(), query).await?
            }
            ScanState::Scrolling(scroll_id) => {
                let body = json!({
                    "scroll": self.config.scroll_ttl,
                    "scroll_id": scroll_id,
                });
                self.post(&self.scroll_url(), &body).await?
            }
            ScanState::Done => return Ok(None),
        };

        if page.hits.hits.is_empty() {
            if let Some(scroll_id) = page.scroll_id {
                self.clear_scroll(&scroll_id).await;
            }
            return Ok(None);
        }

        log_debug(format!("Received {} hits", page.hits.hits.len()));
        let next = match page.scroll_id {
            Some(scroll_id) => ScanState::Scrolling(scroll_id),
            None => ScanState::Done,
        };
        Ok(Some((page.hits.hits, next)))
    }
}

impl RecordSource for SearchClient {
    fn scan<'a>(&'a self, query: &'a SearchQuery) -> BoxStream<'a, SearchResult<SearchHit>> {
        stream::try_unfold(ScanState::Start, move |state| self.step(query, state))
            .map_ok(|hits| stream::iter(hits.into_iter().map(Ok::<_, SearchError>)))
            .try_flatten()
            .boxed()
    }
}

/// Parse a search or scroll response body.
pub fn parse_page(body: &str) -> SearchResult<ScrollPage> {
    serde_json::from_str(body).map_err(|e| {
        SearchError::InvalidResponse(format!(
            "{}. Response was: {}",
            e,
            body.chars().take(500).collect::<String>()
        ))
    })
}
