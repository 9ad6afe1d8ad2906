//! Reddit API client (client-credentials OAuth) serving subreddit top listings.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use redditetl_core::RedditCredentials;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;

use super::listing::{to_raw_post, Listing, ListingData, TokenResponse};
use super::PostSource;
use crate::error::ClientError;
use crate::types::RawPost;

const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com/";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com/";
/// Reddit caps listing pages at 100 items.
const PAGE_LIMIT: u32 = 100;
/// Listings stop at roughly 1000 items; this also bounds cycling cursors.
const MAX_PAGES: usize = 20;
/// Ranking window for `top`. Reddit's own default.
const TOP_WINDOW: &str = "all";
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
/// Refresh tokens this long before Reddit would expire them.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Reddit API client.
///
/// Build once at startup with [`RedditClient::new`] and share it across runs;
/// the bearer token is fetched lazily and refreshed when it nears expiry.
/// [`RedditClient::with_base_urls`] points both endpoints at a mock server.
pub struct RedditClient {
    client: Client,
    credentials: RedditCredentials,
    auth_base: Url,
    api_base: Url,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Creates a client pointed at the production Reddit endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: RedditCredentials, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_urls(credentials, timeout_secs, DEFAULT_AUTH_BASE, DEFAULT_API_BASE)
    }

    /// Creates a client with custom token and API base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidRequest`] if either base URL does not parse.
    pub fn with_base_urls(
        credentials: RedditCredentials,
        timeout_secs: u64,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, ClientError> {
        // oauth.reddit.com sometimes blocks rustls via TLS fingerprinting.
        // If rejected, enable `native-tls` on reqwest and call `.use_native_tls()`.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(credentials.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            credentials,
            auth_base: parse_base(auth_base)?,
            api_base: parse_base(api_base)?,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, ClientError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }
        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    async fn fetch_token(&self) -> Result<CachedToken, ClientError> {
        let url = join(&self.auth_base, "api/v1/access_token")?;
        let response = self
            .client
            .post(url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|source| ClientError::Deserialize {
                context: "access_token".to_string(),
                source,
            })?;

        let ttl = Duration::from_secs(token.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS));
        tracing::debug!(ttl_secs = ttl.as_secs(), "obtained Reddit access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + ttl.saturating_sub(TOKEN_REFRESH_MARGIN),
        })
    }

    async fn fetch_page(
        &self,
        token: &str,
        collection: &str,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<ListingData, ClientError> {
        let url = join(&self.api_base, &format!("r/{collection}/top"))?;
        let mut params: Vec<(&str, String)> = vec![
            ("t", TOP_WINDOW.to_string()),
            ("limit", page_size.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        // Unknown subreddits redirect to the search page instead of 404ing.
        if status == StatusCode::NOT_FOUND
            || response.url().path().starts_with("/subreddits/search")
        {
            return Err(ClientError::NotFound {
                collection: collection.to_string(),
            });
        }
        if status == StatusCode::UNAUTHORIZED {
            self.forget_token().await;
            return Err(ClientError::Auth {
                status: status.as_u16(),
            });
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ClientError::Forbidden {
                collection: collection.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let listing: Listing =
            serde_json::from_str(&body).map_err(|source| ClientError::Deserialize {
                context: format!("r/{collection}/top"),
                source,
            })?;
        Ok(listing.data)
    }
}

impl PostSource for RedditClient {
    async fn top_posts(&self, collection: &str, limit: u32) -> Result<Vec<RawPost>, ClientError> {
        let token = self.access_token().await?;

        let target = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut posts = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut duplicates = 0usize;
        let mut after: Option<String> = None;
        let mut pages = 0usize;

        while posts.len() < target {
            let remaining = u32::try_from(target - posts.len()).unwrap_or(u32::MAX);
            let page_size = remaining.min(PAGE_LIMIT);
            let page = self
                .fetch_page(&token, collection, page_size, after.as_deref())
                .await?;
            pages += 1;

            let fetched = page.children.len();
            for thing in &page.children {
                if posts.len() >= target {
                    break;
                }
                // Rankings can shift between pages; keep the first sighting of an id.
                if let Some(id) = thing.data.get("id") {
                    if !seen_ids.insert(id.to_string()) {
                        duplicates += 1;
                        continue;
                    }
                }
                posts.push(to_raw_post(&thing.data));
            }

            after = page.after;
            if fetched == 0 || after.is_none() || pages >= MAX_PAGES {
                break;
            }
        }

        tracing::debug!(
            subreddit = collection,
            requested = limit,
            fetched = posts.len(),
            pages,
            duplicates,
            "fetched Reddit top listing"
        );

        Ok(posts)
    }
}

/// Ensure the base URL ends with exactly one slash so `join` appends rather
/// than replacing the last path segment.
fn parse_base(raw: &str) -> Result<Url, ClientError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid base URL '{raw}': {e}")))
}

fn join(base: &Url, path: &str) -> Result<Url, ClientError> {
    base.join(path)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid request path '{path}': {e}")))
}
