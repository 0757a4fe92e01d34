//! Typed views of the JSON documents returned by the API.
//!
//! The client never requires them: every call returns the decoded JSON as is, and these types
//! can be obtained from it with [crate::response::ApiResponse::parse].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::endpoints::{AssetId, PageId};

/// A page, identified by its path on the customer site.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page {
    pub id: PageId,
    pub path: String,
    /// Creation time as a unix timestamp.
    pub created: i64,
}

/// A page asset: a code snippet processed by the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Asset {
    pub id: AssetId,
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Base64 encoded source.
    pub input: String,
    /// Base64 encoded result, once processed.
    #[serde(default)]
    pub output: Option<String>,
    pub created: i64,
    #[serde(default)]
    pub completed: Option<i64>,
    pub status: serde_json::Value,
}

/// Pagination links of list operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Links {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Pages keyed by id. `links` is only present on list operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PagesResponse {
    pub pages: BTreeMap<String, Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Assets of a page keyed by id. `links` is only present on list operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AssetsResponse {
    pub assets: BTreeMap<String, Asset>,
    pub page: Page,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Error document returned with unsuccessful statuses.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    /// Stable code such as `SH-v1-011`.
    pub error_code: String,
    pub error_title: String,
    pub error_message: String,
    pub error_ref: String,
    pub documentation: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pages_list() {
        let value = json!({
            "pages": {
                "12": {"id": 12, "path": "/test", "created": 1_700_000_000},
                "13": {"id": 13, "path": "/test/new", "created": 1_700_000_100}
            },
            "links": {
                "previous": null,
                "current": "https://api.smallhay.com/v1/pages?offset=0&limit=100",
                "next": "https://api.smallhay.com/v1/pages?offset=100&limit=100"
            }
        });

        let pages: PagesResponse = serde_json::from_value(value).unwrap();

        assert_eq!(pages.pages.len(), 2);
        assert_eq!(pages.pages["12"].path, "/test");
        let links = pages.links.unwrap();
        assert_eq!(links.previous, None);
        assert!(links.next.unwrap().contains("offset=100"));
    }

    #[test]
    fn single_page_has_no_links() {
        let value = json!({"pages": {"12": {"id": 12, "path": "/test", "created": 1}}});

        let pages: PagesResponse = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(pages.links, None);
        assert_eq!(serde_json::to_value(&pages).unwrap(), value);
    }

    #[test]
    fn assets_of_a_page() {
        let value = json!({
            "assets": {
                "7": {
                    "id": 7,
                    "type": "javascript",
                    "input": "YWxlcnQoMSk=",
                    "output": null,
                    "created": 1_700_000_000,
                    "completed": null,
                    "status": "pending"
                }
            },
            "page": {"id": 12, "path": "/test", "created": 1_700_000_000}
        });

        let assets: AssetsResponse = serde_json::from_value(value).unwrap();

        assert_eq!(assets.page.id, 12);
        assert_eq!(assets.assets["7"].asset_type, "javascript");
        assert_eq!(assets.assets["7"].output, None);
    }
}
