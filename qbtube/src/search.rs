//! Search client
//!
//! Fresh queries scrape the results page's embedded payload; follow-up
//! pages go through the site's internal paging endpoint with the
//! continuation token from the previous page. Both paths share the same
//! defensive item extraction: a missing field becomes an empty string, an
//! item without an id is dropped, and any failure yields an empty page.

use crate::client::{TubeClient, INNERTUBE_CLIENT_VERSION};
use crate::error::{Error, Result};
use crate::models::{runs_text, simple_text, thumbnail_url, SearchPage, SearchResultItem};
use crate::scan::initial_data;
use serde_json::{json, Value};
use tracing::warn;
use url::Url;

/// Cap on results per page; the site returns about this many anyway
const MAX_SEARCH_RESULTS: usize = 20;

impl TubeClient {
    /// Searches the video site.
    ///
    /// Pass an empty `continuation` for a fresh query; pass the token from
    /// a previous [`SearchPage`] to fetch the next page (the query string
    /// is ignored then; the token encodes it).
    ///
    /// Never fails: network and parse errors produce an empty page with an
    /// empty token (logged).
    pub async fn search(&self, query: &str, continuation: &str) -> SearchPage {
        let result = if continuation.is_empty() {
            self.search_fresh(query).await
        } else {
            self.search_continuation(continuation).await
        };
        match result {
            Ok(page) => page,
            Err(e) => {
                warn!(query, "Search failed: {}", e);
                SearchPage::default()
            }
        }
    }

    async fn search_fresh(&self, query: &str) -> Result<SearchPage> {
        let url = Url::parse_with_params(
            &format!("{}/results", self.base_url),
            &[("search_query", query)],
        )?;
        let html = self.fetch_text(url.as_str()).await?;
        let data = initial_data(&html)?;
        parse_results_page(&data)
    }

    async fn search_continuation(&self, token: &str) -> Result<SearchPage> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": "WEB",
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "continuation": token,
        });
        let response: Value = self
            .client
            .post(format!("{}/youtubei/v1/search?prettyPrint=false", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_continuation_response(&response)
    }
}

/// Parses a fresh results page payload
fn parse_results_page(data: &Value) -> Result<SearchPage> {
    let sections = data
        .get("contents")
        .and_then(|c| c.get("twoColumnSearchResultsRenderer"))
        .and_then(|c| c.get("primaryContents"))
        .and_then(|c| c.get("sectionListRenderer"))
        .and_then(|c| c.get("contents"))
        .and_then(Value::as_array)
        .ok_or(Error::Payload("search results container not found"))?;

    Ok(collect_sections(sections))
}

/// Parses the envelope of a paging request, which only carries the newly
/// appended items
fn parse_continuation_response(response: &Value) -> Result<SearchPage> {
    let sections = response
        .get("onResponseReceivedCommands")
        .and_then(Value::as_array)
        .and_then(|commands| {
            commands.iter().find_map(|c| {
                c.get("appendContinuationItemsAction")?
                    .get("continuationItems")?
                    .as_array()
            })
        })
        .ok_or(Error::Payload("continuation items not found"))?;

    Ok(collect_sections(sections))
}

/// Walks a list of section nodes, gathering video items and the next
/// continuation token wherever they appear
fn collect_sections(sections: &[Value]) -> SearchPage {
    let mut page = SearchPage::default();

    for section in sections {
        if let Some(items) = section
            .get("itemSectionRenderer")
            .and_then(|s| s.get("contents"))
            .and_then(Value::as_array)
        {
            for item in items {
                if page.results.len() >= MAX_SEARCH_RESULTS {
                    break;
                }
                if let Some(video) = item.get("videoRenderer").and_then(extract_video) {
                    page.results.push(video);
                }
            }
        }
        if let Some(token) = continuation_token(section) {
            page.continuation = token;
        }
    }

    page
}

/// Extracts one result item; only a missing id drops the item
fn extract_video(v: &Value) -> Option<SearchResultItem> {
    let id = v.get("videoId").and_then(Value::as_str)?.to_string();
    Some(SearchResultItem {
        title: runs_text(v.get("title")),
        duration: simple_text(v.get("lengthText")),
        channel: runs_text(v.get("ownerText")),
        views: simple_text(v.get("viewCountText")),
        thumbnail: thumbnail_url(&id),
        id,
    })
}

/// Token of a `continuationItemRenderer` node, if this section is one
fn continuation_token(section: &Value) -> Option<String> {
    section
        .get("continuationItemRenderer")?
        .get("continuationEndpoint")?
        .get("continuationCommand")?
        .get("token")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(id: &str, title: &str) -> Value {
        json!({"videoRenderer": {
            "videoId": id,
            "title": {"runs": [{"text": title}]},
            "lengthText": {"simpleText": "3:32"},
            "ownerText": {"runs": [{"text": "Channel"}]},
            "viewCountText": {"simpleText": "1.2M views"}
        }})
    }

    fn results_page(sections: Vec<Value>) -> Value {
        json!({"contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
            "sectionListRenderer": {"contents": sections}
        }}}})
    }

    #[test]
    fn test_parse_results_page_with_token() {
        let data = results_page(vec![
            json!({"itemSectionRenderer": {"contents": [
                video("aaaaaaaaaaa", "First"),
                {"adSlotRenderer": {}},
                video("bbbbbbbbbbb", "Second"),
            ]}}),
            json!({"continuationItemRenderer": {"continuationEndpoint": {
                "continuationCommand": {"token": "NEXT_TOKEN"}
            }}}),
        ]);

        let page = parse_results_page(&data).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, "aaaaaaaaaaa");
        assert_eq!(page.results[0].title, "First");
        assert_eq!(page.results[0].duration, "3:32");
        assert_eq!(
            page.results[0].thumbnail,
            "https://i.ytimg.com/vi/aaaaaaaaaaa/mqdefault.jpg"
        );
        assert_eq!(page.continuation, "NEXT_TOKEN");
    }

    #[test]
    fn test_item_with_missing_fields_is_kept() {
        let data = results_page(vec![json!({"itemSectionRenderer": {"contents": [
            {"videoRenderer": {"videoId": "ccccccccccc"}},
            {"videoRenderer": {"title": {"runs": [{"text": "no id, dropped"}]}}},
        ]}})]);

        let page = parse_results_page(&data).unwrap();
        assert_eq!(page.results.len(), 1);
        let item = &page.results[0];
        assert_eq!(item.id, "ccccccccccc");
        assert_eq!(item.title, "");
        assert_eq!(item.duration, "");
        assert_eq!(item.channel, "");
        assert_eq!(item.views, "");
        assert_eq!(page.continuation, "");
    }

    #[test]
    fn test_drifted_page_shape_is_an_error() {
        assert!(parse_results_page(&json!({"contents": {}})).is_err());
        assert!(parse_results_page(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_continuation_envelope() {
        let response = json!({"onResponseReceivedCommands": [
            {"appendContinuationItemsAction": {"continuationItems": [
                {"itemSectionRenderer": {"contents": [video("ddddddddddd", "More")]}},
                {"continuationItemRenderer": {"continuationEndpoint": {
                    "continuationCommand": {"token": "EVEN_MORE"}
                }}}
            ]}}
        ]});

        let page = parse_continuation_response(&response).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "More");
        assert_eq!(page.continuation, "EVEN_MORE");
    }

    #[test]
    fn test_result_cap() {
        let items: Vec<Value> = (0..40)
            .map(|i| video(&format!("{i:0>11}"), "v"))
            .collect();
        let data = results_page(vec![json!({"itemSectionRenderer": {"contents": items}})]);
        let page = parse_results_page(&data).unwrap();
        assert_eq!(page.results.len(), MAX_SEARCH_RESULTS);
    }
}
