//! Operations of the API and the request each of them resolves to.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::dispatcher::Verb;

pub type PageId = u64;
pub type AssetId = u64;

const DEFAULT_LIMIT: u64 = 100;
const ALL_ASSET_TYPES: &str = "all";

/// Everything but the unreserved characters is escaped in query values.
const QUERY_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// JSON document sent with write operations.
///
/// It is forwarded untouched: the service validates payloads and reports its own errors.
#[derive(Clone, PartialEq, Default)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value.to_string().into_bytes())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({})", String::from_utf8_lossy(&self.0))
    }
}

/// Offset based pagination of list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Filter of the page assets list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    /// Asset type (`javascript`...), or `all`.
    pub asset_type: String,
    pub pagination: Pagination,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            asset_type: ALL_ASSET_TYPES.to_string(),
            pagination: Pagination::default(),
        }
    }
}

/// Every operation exposed by the API, named after its operation id.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    CreatePages(Payload),
    ListPages(Pagination),
    ModifyPages(Payload),
    DeletePages(Payload),
    ListPage(PageId),
    ModifyPage(PageId, Payload),
    DeletePage(PageId),
    CreateAssets(PageId, Payload),
    ListAssets(PageId, AssetQuery),
    ModifyAssets(PageId, Payload),
    DeleteAssets(PageId, Payload),
    ListAsset(PageId, AssetId),
    ModifyAsset(PageId, AssetId, Payload),
    DeleteAsset(PageId, AssetId),
}

/// Request an [Endpoint] resolves to. `path` is relative to the api base url.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCall {
    pub verb: Verb,
    pub path: String,
    pub body: Option<Payload>,
}

impl Endpoint {
    pub fn verb(&self) -> Verb {
        match self {
            Endpoint::CreatePages(_) | Endpoint::CreateAssets(..) => Verb::Post,
            Endpoint::ListPages(_)
            | Endpoint::ListPage(_)
            | Endpoint::ListAssets(..)
            | Endpoint::ListAsset(..) => Verb::Get,
            Endpoint::ModifyPages(_)
            | Endpoint::ModifyPage(..)
            | Endpoint::ModifyAssets(..)
            | Endpoint::ModifyAsset(..) => Verb::Put,
            Endpoint::DeletePages(_)
            | Endpoint::DeletePage(_)
            | Endpoint::DeleteAssets(..)
            | Endpoint::DeleteAsset(..) => Verb::Delete,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::CreatePages(_) | Endpoint::ModifyPages(_) | Endpoint::DeletePages(_) => {
                "pages".to_string()
            }
            Endpoint::ListPages(Pagination { offset, limit }) => {
                format!("pages?offset={offset}&limit={limit}")
            }
            Endpoint::ListPage(page_id)
            | Endpoint::ModifyPage(page_id, _)
            | Endpoint::DeletePage(page_id) => format!("pages/{page_id}"),
            Endpoint::CreateAssets(page_id, _)
            | Endpoint::ModifyAssets(page_id, _)
            | Endpoint::DeleteAssets(page_id, _) => format!("pages/{page_id}/assets"),
            Endpoint::ListAssets(page_id, query) => format!(
                "pages/{page_id}/assets?type={}&offset={}&limit={}",
                utf8_percent_encode(&query.asset_type, QUERY_VALUE_ENCODE_SET),
                query.pagination.offset,
                query.pagination.limit
            ),
            Endpoint::ListAsset(page_id, asset_id)
            | Endpoint::ModifyAsset(page_id, asset_id, _)
            | Endpoint::DeleteAsset(page_id, asset_id) => {
                format!("pages/{page_id}/assets/{asset_id}")
            }
        }
    }

    pub fn into_call(self) -> EndpointCall {
        let verb = self.verb();
        let path = self.path();
        let body = match self {
            Endpoint::CreatePages(payload)
            | Endpoint::ModifyPages(payload)
            | Endpoint::DeletePages(payload)
            | Endpoint::ModifyPage(_, payload)
            | Endpoint::CreateAssets(_, payload)
            | Endpoint::ModifyAssets(_, payload)
            | Endpoint::DeleteAssets(_, payload)
            | Endpoint::ModifyAsset(_, _, payload) => Some(payload),
            Endpoint::ListPages(_)
            | Endpoint::ListPage(_)
            | Endpoint::DeletePage(_)
            | Endpoint::ListAssets(..)
            | Endpoint::ListAsset(..)
            | Endpoint::DeleteAsset(..) => None,
        };

        EndpointCall { verb, path, body }
    }
}
