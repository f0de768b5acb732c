use async_trait::async_trait;
use review_export_models::{Platform, ReviewRecord};
use tracing::info;

use super::api::GooglePlayApi;
use super::mapper::to_record;
use crate::error::SourceError;
use crate::traits::{PlayReviewApi, ReviewSource};

/// Android review source backed by the Play Developer API
pub struct GooglePlaySource<G = GooglePlayApi> {
    api: G,
    package_name: String,
    max_results: u32,
}

impl<G: PlayReviewApi> GooglePlaySource<G> {
    pub fn new(api: G, package_name: impl Into<String>, max_results: u32) -> Self {
        Self {
            api,
            package_name: package_name.into(),
            max_results,
        }
    }
}

#[async_trait]
impl<G: PlayReviewApi> ReviewSource for GooglePlaySource<G> {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn fetch_reviews(&self) -> Result<Vec<ReviewRecord>, SourceError> {
        info!("Fetching Google Play reviews for {}...", self.package_name);
        let reviews = self
            .api
            .list_reviews(&self.package_name, self.max_results)
            .await
            .map_err(|e| e.into_api("Google Play review fetch failed"))?;
        info!("Found {} reviews", reviews.len());

        Ok(reviews.iter().map(to_record).collect())
    }
}
