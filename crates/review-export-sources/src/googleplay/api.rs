use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::auth::{ServiceAccountTokenProvider, ANDROID_PUBLISHER_SCOPE};
use crate::error::SourceError;
use crate::traits::{AccessTokenProvider, PlayReviewApi};

pub const API_BASE: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";

/// Protobuf-style timestamp. `seconds` is an int64, which the API
/// serializes as a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayTimestamp {
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub seconds: Option<i64>,
    #[serde(default)]
    pub nanos: Option<i64>,
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(i64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserComment {
    pub text: Option<String>,
    pub title: Option<String>,
    pub last_modified: Option<PlayTimestamp>,
    pub star_rating: Option<i64>,
    /// Language tag such as `en`, `en_GB` or `pt-BR`
    pub reviewer_language: Option<String>,
    pub app_version_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperComment {
    pub text: Option<String>,
    pub last_modified: Option<PlayTimestamp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayComment {
    pub user_comment: Option<UserComment>,
    pub developer_comment: Option<DeveloperComment>,
}

/// A review resource from the Play Developer API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAndroidReview {
    #[serde(default)]
    pub review_id: String,
    pub author_name: Option<String>,
    #[serde(default)]
    pub comments: Vec<PlayComment>,
}

#[derive(Debug, Deserialize)]
struct ReviewsListResponse {
    #[serde(default)]
    reviews: Vec<RawAndroidReview>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDocument {
    error: Option<GoogleErrorBody>,
}

/// Extract `error.message` from a Google API error body
pub(crate) fn error_message(body: &str) -> Option<String> {
    let doc: GoogleErrorDocument = serde_json::from_str(body).ok()?;
    doc.error?.message
}

/// reqwest implementation of the Play Developer API reviews list
pub struct GooglePlayApi<T = ServiceAccountTokenProvider> {
    client: Client,
    tokens: T,
    base_url: String,
}

impl<T: AccessTokenProvider> GooglePlayApi<T> {
    pub fn new(client: Client, tokens: T) -> Self {
        Self::with_base_url(client, tokens, API_BASE)
    }

    pub fn with_base_url(client: Client, tokens: T, base_url: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl<T: AccessTokenProvider> PlayReviewApi for GooglePlayApi<T> {
    async fn list_reviews(
        &self,
        package_name: &str,
        max_results: u32,
    ) -> Result<Vec<RawAndroidReview>, SourceError> {
        let token = self.tokens.access_token(&[ANDROID_PUBLISHER_SCOPE]).await?;

        let url = format!("{}/applications/{}/reviews", self.base_url, package_name);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("maxResults", max_results.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SourceError::api(Some(status.as_u16()), message));
        }

        let body = response.text().await?;
        let list: ReviewsListResponse = serde_json::from_str(&body)?;
        Ok(list.reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
        "reviews": [
            {
                "reviewId": "gp:AOqpTOE",
                "authorName": "Jane",
                "comments": [
                    {
                        "userComment": {
                            "text": "\tGreat app",
                            "lastModified": {"seconds": "1710498600", "nanos": 12000000},
                            "starRating": 5,
                            "reviewerLanguage": "en_GB",
                            "device": "a10",
                            "androidOsVersion": 33,
                            "appVersionCode": 412,
                            "appVersionName": "4.1.2"
                        }
                    },
                    {
                        "developerComment": {
                            "text": "Thank you!",
                            "lastModified": {"seconds": 1710585000}
                        }
                    }
                ]
            }
        ],
        "tokenPagination": {"nextPageToken": "abc"}
    }"#;

    #[test]
    fn test_parse_reviews_list() {
        let list: ReviewsListResponse = serde_json::from_str(LIST_BODY).unwrap();
        assert_eq!(list.reviews.len(), 1);

        let review = &list.reviews[0];
        assert_eq!(review.review_id, "gp:AOqpTOE");
        assert_eq!(review.author_name.as_deref(), Some("Jane"));

        let user = review.comments[0].user_comment.as_ref().unwrap();
        assert_eq!(user.star_rating, Some(5));
        assert_eq!(user.app_version_name.as_deref(), Some("4.1.2"));
        assert_eq!(user.last_modified.as_ref().unwrap().seconds, Some(1710498600));

        let dev = review.comments[1].developer_comment.as_ref().unwrap();
        assert_eq!(dev.last_modified.as_ref().unwrap().seconds, Some(1710585000));
    }

    #[test]
    fn test_empty_list_has_no_reviews_field() {
        let list: ReviewsListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.reviews.is_empty());
    }

    #[test]
    fn test_timestamp_without_seconds() {
        let ts: PlayTimestamp = serde_json::from_str(r#"{"nanos": 5}"#).unwrap();
        assert_eq!(ts.seconds, None);
    }

    #[test]
    fn test_timestamp_with_bad_seconds() {
        assert!(serde_json::from_str::<PlayTimestamp>(r#"{"seconds": "soon"}"#).is_err());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("The caller does not have permission")
        );
        assert_eq!(error_message("Bad Gateway"), None);
    }
}
