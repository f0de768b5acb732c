use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::auth::AccessToken;
use crate::error::SourceError;
use crate::traits::CustomerReviewApi;

pub const API_BASE: &str = "https://api.appstoreconnect.apple.com/v1";

// App Store Connect caps a single page at 200 reviews
const MAX_PAGE_LIMIT: u32 = 200;

const REVIEW_FIELDS: &str = "rating,title,body,reviewerNickname,createdDate,territory,response";
const RESPONSE_FIELDS: &str = "responseBody,lastModifiedDate,state,review";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAttributes {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub reviewer_nickname: Option<String>,
    pub created_date: Option<String>,
    /// ISO-3166 alpha-3 storefront code
    pub territory: Option<String>,
    pub app_store_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub related: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    pub links: Option<RelationshipLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRelationships {
    pub response: Option<Relationship>,
}

/// A `customerReviews` resource as returned by the list call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOfficialReview {
    pub id: String,
    #[serde(default)]
    pub attributes: ReviewAttributes,
    #[serde(default)]
    pub relationships: Option<ReviewRelationships>,
}

impl RawOfficialReview {
    /// Whether the review links to a developer response sub-resource
    pub fn has_response_link(&self) -> bool {
        self.relationships
            .as_ref()
            .and_then(|r| r.response.as_ref())
            .and_then(|r| r.links.as_ref())
            .and_then(|l| l.related.as_deref())
            .is_some_and(|related| !related.is_empty())
    }
}

/// Attributes of a `customerReviewResponses` resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperResponse {
    pub response_body: Option<String>,
    pub last_modified_date: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewsDocument {
    #[serde(default)]
    data: Vec<RawOfficialReview>,
}

#[derive(Debug, Deserialize)]
struct ResponseResource {
    #[serde(default)]
    attributes: DeveloperResponse,
}

#[derive(Debug, Deserialize)]
struct ResponseDocument {
    data: Option<ResponseResource>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    detail: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

/// Extract `errors[0].detail` (or its title) from an error body
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let doc: ErrorDocument = serde_json::from_str(body).ok()?;
    let first = doc.errors.into_iter().next()?;
    first.detail.or(first.title)
}

/// reqwest implementation of the App Store Connect customer review endpoints
#[derive(Clone)]
pub struct AppStoreConnectApi {
    client: Client,
    base_url: String,
}

impl AppStoreConnectApi {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, API_BASE)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SourceError::api(Some(status.as_u16()), detail));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CustomerReviewApi for AppStoreConnectApi {
    async fn list_reviews(
        &self,
        token: &AccessToken,
        app_id: &str,
        limit: u32,
    ) -> Result<Vec<RawOfficialReview>, SourceError> {
        let url = format!("{}/apps/{}/customerReviews", self.base_url, app_id);
        let query = [
            ("limit", limit.clamp(1, MAX_PAGE_LIMIT).to_string()),
            ("sort", "-createdDate".to_string()),
            ("fields[customerReviews]", REVIEW_FIELDS.to_string()),
            ("fields[customerReviewResponses]", RESPONSE_FIELDS.to_string()),
            ("include", "response".to_string()),
        ];

        let doc: ReviewsDocument = self.get_json(token, &url, &query).await?;
        Ok(doc.data)
    }

    async fn get_response(
        &self,
        token: &AccessToken,
        review_id: &str,
    ) -> Result<DeveloperResponse, SourceError> {
        let url = format!("{}/customerReviews/{}/response", self.base_url, review_id);
        let doc: ResponseDocument = self.get_json(token, &url, &[]).await?;
        doc.data
            .map(|resource| resource.attributes)
            .ok_or_else(|| SourceError::api(Some(404), format!("review {} has no response", review_id)))
    }
}
