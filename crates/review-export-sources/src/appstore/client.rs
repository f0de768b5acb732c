use async_trait::async_trait;
use review_export_models::{Platform, ReviewRecord};
use tracing::info;

use super::api::AppStoreConnectApi;
use super::auth::TokenIssuer;
use super::fetcher::fetch_official_reviews;
use super::mapper::to_located_record;
use super::reconcile::{reconcile, ExactTripleMatcher, ReviewMatcher};
use crate::error::SourceError;
use crate::storefront::StorefrontClient;
use crate::traits::{CustomerReviewApi, PublicReviewApi, ReviewSource};

/// iOS review source: official API reviews with developer responses,
/// versions recovered from the public storefront feed
pub struct AppStoreSource<A = AppStoreConnectApi, P = StorefrontClient> {
    api: A,
    storefront: P,
    issuer: TokenIssuer,
    app_id: String,
    max_results: u32,
    matcher: Box<dyn ReviewMatcher>,
}

impl<A, P> AppStoreSource<A, P>
where
    A: CustomerReviewApi,
    P: PublicReviewApi,
{
    pub fn new(
        api: A,
        storefront: P,
        issuer: TokenIssuer,
        app_id: impl Into<String>,
        max_results: u32,
    ) -> Self {
        Self {
            api,
            storefront,
            issuer,
            app_id: app_id.into(),
            max_results,
            matcher: Box::new(ExactTripleMatcher),
        }
    }

    /// Replace the rule used to pair official and public reviews
    pub fn with_matcher(mut self, matcher: impl ReviewMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }
}

#[async_trait]
impl<A, P> ReviewSource for AppStoreSource<A, P>
where
    A: CustomerReviewApi,
    P: PublicReviewApi,
{
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn fetch_reviews(&self) -> Result<Vec<ReviewRecord>, SourceError> {
        let token = self.issuer.issue()?;

        let official =
            fetch_official_reviews(&self.api, &token, &self.app_id, self.max_results).await?;
        let mut located: Vec<_> = official.iter().map(to_located_record).collect();

        reconcile(&self.storefront, &self.app_id, &mut located, self.matcher.as_ref()).await;

        info!("Prepared {} iOS reviews", located.len());
        Ok(located.into_iter().map(|l| l.record).collect())
    }
}
