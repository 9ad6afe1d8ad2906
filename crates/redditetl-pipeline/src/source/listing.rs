//! Reddit listing envelope and conversion into [`RawPost`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::RawPost;

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub(super) access_token: String,
    #[serde(default)]
    pub(super) expires_in: Option<u64>,
}

/// Reddit listing wrapper.
#[derive(Debug, Deserialize)]
pub(super) struct Listing {
    pub(super) data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListingData {
    pub(super) children: Vec<Thing>,
    pub(super) after: Option<String>,
}

/// A listing child. `data` stays untyped; coercion happens in the transformer.
#[derive(Debug, Deserialize)]
pub(super) struct Thing {
    pub(super) data: Map<String, Value>,
}

const DELETED_AUTHOR: &str = "[deleted]";
const AUTHOR_SENTINEL: &str = "None";

pub(super) fn to_raw_post(data: &Map<String, Value>) -> RawPost {
    let field = |name: &str| data.get(name).cloned();

    // Deleted accounts come back as "[deleted]" or null; both map to the sentinel.
    let author = match data.get("author") {
        Some(Value::String(name)) if name != DELETED_AUTHOR && !name.is_empty() => name.clone(),
        _ => AUTHOR_SENTINEL.to_string(),
    };

    RawPost {
        title: field("title"),
        score: field("score"),
        id: field("id"),
        url: field("url"),
        num_comments: field("num_comments"),
        created_utc: field("created_utc"),
        author: Some(Value::String(author)),
        over_18: field("over_18"),
        edited: field("edited"),
        spoiler: field("spoiler"),
        stickied: field("stickied"),
    }
}
