use async_trait::async_trait;
use review_export_models::{Platform, ReviewRecord};

use crate::appstore::api::{DeveloperResponse, RawOfficialReview};
use crate::appstore::auth::AccessToken;
use crate::error::SourceError;
use crate::googleplay::api::RawAndroidReview;
use crate::storefront::PublicReview;

/// One store listing, producing canonical records ready for export
#[async_trait]
pub trait ReviewSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetch, enrich and normalize the listing's reviews.
    /// Soft failures are absorbed inside; an error here is fatal for the platform.
    async fn fetch_reviews(&self) -> Result<Vec<ReviewRecord>, SourceError>;
}

/// Signed-token transport to the official App Store review API
#[async_trait]
pub trait CustomerReviewApi: Send + Sync {
    /// List up to `limit` reviews, newest first
    async fn list_reviews(
        &self,
        token: &AccessToken,
        app_id: &str,
        limit: u32,
    ) -> Result<Vec<RawOfficialReview>, SourceError>;

    /// Fetch the developer response of one review.
    /// A review without a response yields an error with status 404.
    async fn get_response(
        &self,
        token: &AccessToken,
        review_id: &str,
    ) -> Result<DeveloperResponse, SourceError>;
}

/// Unauthenticated storefront review listing
#[async_trait]
pub trait PublicReviewApi: Send + Sync {
    /// First page of the most recent reviews for one storefront country
    async fn first_page(&self, app_id: &str, country: &str) -> Result<Vec<PublicReview>, SourceError>;
}

/// Scoped OAuth2 access token minting for a service account
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, SourceError>;
}

/// Google Play Developer API review listing
#[async_trait]
pub trait PlayReviewApi: Send + Sync {
    async fn list_reviews(
        &self,
        package_name: &str,
        max_results: u32,
    ) -> Result<Vec<RawAndroidReview>, SourceError>;
}
