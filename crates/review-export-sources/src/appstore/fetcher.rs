use futures::future::join_all;
use tracing::{debug, info, warn};

use super::api::{DeveloperResponse, RawOfficialReview};
use super::auth::AccessToken;
use crate::error::SourceError;
use crate::traits::CustomerReviewApi;

/// An official review paired with its developer response, if any
#[derive(Debug, Clone)]
pub struct OfficialReview {
    pub review: RawOfficialReview,
    pub response: Option<DeveloperResponse>,
}

/// Fetch up to `limit` reviews and resolve their developer responses.
///
/// Response lookups run concurrently and never fail the batch: a 404 means
/// "no reply yet", any other error is logged and treated the same way.
/// The result keeps the order of the list call.
pub async fn fetch_official_reviews<A>(
    api: &A,
    token: &AccessToken,
    app_id: &str,
    limit: u32,
) -> Result<Vec<OfficialReview>, SourceError>
where
    A: CustomerReviewApi + ?Sized,
{
    info!("Fetching App Store reviews...");
    let reviews = api
        .list_reviews(token, app_id, limit)
        .await
        .map_err(|e| e.into_api("App Store review fetch failed"))?;
    info!("Found {} reviews", reviews.len());

    let responses = join_all(
        reviews
            .iter()
            .map(|review| resolve_response(api, token, review)),
    )
    .await;

    Ok(reviews
        .into_iter()
        .zip(responses)
        .map(|(review, response)| OfficialReview { review, response })
        .collect())
}

async fn resolve_response<A>(
    api: &A,
    token: &AccessToken,
    review: &RawOfficialReview,
) -> Option<DeveloperResponse>
where
    A: CustomerReviewApi + ?Sized,
{
    if !review.has_response_link() {
        return None;
    }

    match api.get_response(token, &review.id).await {
        Ok(response) => Some(response),
        Err(e) if e.is_not_found() => {
            debug!("Review {} has no developer response", review.id);
            None
        }
        Err(e) => {
            warn!("Failed to fetch response for review {}: {}", review.id, e);
            None
        }
    }
}
