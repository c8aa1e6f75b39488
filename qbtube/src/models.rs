//! Search result models and defensive field extraction

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One search result.
///
/// Every field except `id` may be empty when the source page omitted it;
/// an item is only dropped when its id is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    /// Human-readable length, e.g. "3:32"
    pub duration: String,
    pub channel: String,
    /// Human-readable view count, e.g. "1.2M views"
    pub views: String,
    #[serde(rename = "thumb")]
    pub thumbnail: String,
}

/// One page of search results plus the token resuming the listing.
///
/// An empty `continuation` means no further page is known. The default
/// value doubles as the "search failed" response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub continuation: String,
}

/// Standard thumbnail URL for a video id
pub(crate) fn thumbnail_url(id: &str) -> String {
    format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg")
}

/// Text of `node.runs[0].text`, or empty
pub(crate) fn runs_text(node: Option<&Value>) -> String {
    node.and_then(|n| n.get("runs"))
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Text of `node.simpleText`, or empty
pub(crate) fn simple_text(node: Option<&Value>) -> String {
    node.and_then(|n| n.get("simpleText"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_runs_text_missing_pieces() {
        let full = json!({"runs": [{"text": "hello"}]});
        assert_eq!(runs_text(Some(&full)), "hello");

        let empty_runs = json!({"runs": []});
        assert_eq!(runs_text(Some(&empty_runs)), "");
        assert_eq!(runs_text(Some(&json!({}))), "");
        assert_eq!(runs_text(None), "");
    }

    #[test]
    fn test_simple_text() {
        assert_eq!(simple_text(Some(&json!({"simpleText": "3:32"}))), "3:32");
        assert_eq!(simple_text(Some(&json!({"simpleText": 7}))), "");
        assert_eq!(simple_text(None), "");
    }

    #[test]
    fn test_search_page_serializes_thumb_key() {
        let page = SearchPage {
            results: vec![SearchResultItem {
                id: "abc".into(),
                thumbnail: "t".into(),
                ..Default::default()
            }],
            continuation: String::new(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["results"][0]["thumb"], "t");
    }
}
