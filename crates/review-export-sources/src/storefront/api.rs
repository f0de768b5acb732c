use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SourceError;
use crate::normalize::normalize_rating;
use crate::traits::PublicReviewApi;

pub const STOREFRONT_BASE: &str = "https://itunes.apple.com";

/// A review as listed on the public storefront
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReview {
    pub id: String,
    pub user_name: String,
    pub title: String,
    pub text: String,
    pub version: Option<String>,
    pub rating: u8,
    pub updated: String,
}

#[derive(Debug, Default, Deserialize)]
struct Label {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Default, Deserialize)]
struct Author {
    #[serde(default)]
    name: Label,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    id: Label,
    #[serde(default)]
    author: Author,
    #[serde(default)]
    title: Label,
    #[serde(default)]
    content: Label,
    #[serde(rename = "im:version")]
    version: Option<Label>,
    #[serde(rename = "im:rating")]
    rating: Option<Label>,
    #[serde(default)]
    updated: Label,
}

// The feed collapses a single-entry list into a bare object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Feed {
    entry: Option<OneOrMany<FeedEntry>>,
}

#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    feed: Feed,
}

impl From<FeedEntry> for PublicReview {
    fn from(entry: FeedEntry) -> Self {
        Self {
            id: entry.id.label,
            user_name: entry.author.name.label,
            title: entry.title.label,
            text: entry.content.label,
            version: entry.version.map(|v| v.label),
            rating: normalize_rating(entry.rating.and_then(|r| r.label.trim().parse().ok())),
            updated: entry.updated.label,
        }
    }
}

/// Parse a customer-review feed body.
/// Entries without a rating describe the app itself and are skipped.
pub fn parse_feed(body: &str) -> Result<Vec<PublicReview>, SourceError> {
    let doc: FeedDocument = serde_json::from_str(body)?;
    Ok(doc
        .feed
        .entry
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.rating.is_some())
        .map(PublicReview::from)
        .collect())
}

/// Client for the unauthenticated storefront customer-review feed
#[derive(Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, STOREFRONT_BASE)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn feed_url(&self, app_id: &str, country: &str) -> String {
        format!(
            "{}/{}/rss/customerreviews/page=1/id={}/sortby=mostrecent/json",
            self.base_url, country, app_id
        )
    }
}

#[async_trait]
impl PublicReviewApi for StorefrontClient {
    async fn first_page(&self, app_id: &str, country: &str) -> Result<Vec<PublicReview>, SourceError> {
        let url = self.feed_url(app_id, country);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::api(
                Some(status.as_u16()),
                format!("storefront feed returned HTTP {}", status),
            ));
        }

        let body = response.text().await?;
        parse_feed(&body)
    }
}
