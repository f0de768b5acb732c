// Recovers the app version of official reviews from the public storefront feed.
// The two feeds share no identifier, so reviews are joined on their content.

use futures::future::join_all;
use review_export_models::ReviewRecord;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use super::mapper::LocatedReview;
use crate::normalize::VERSION_UNAVAILABLE;
use crate::storefront::PublicReview;
use crate::traits::PublicReviewApi;

/// Public reviews keyed by 2-letter country code
pub type PublicReviewsByCountry = HashMap<String, Vec<PublicReview>>;

/// Decides whether a public storefront review is the same review as an
/// official one. Implementations must be pure.
pub trait ReviewMatcher: Send + Sync {
    fn matches(&self, official: &ReviewRecord, public: &PublicReview) -> bool;
}

/// Exact equality on author, title and review text.
/// A review edited between the two fetches will not match, and a record
/// with all three fields empty never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTripleMatcher;

impl ReviewMatcher for ExactTripleMatcher {
    fn matches(&self, official: &ReviewRecord, public: &PublicReview) -> bool {
        if official.author.is_empty() && official.title.is_empty() && official.review.is_empty() {
            return false;
        }

        public.user_name == official.author
            && public.title == official.title
            && public.text == official.review
    }
}

/// Distinct non-empty 2-letter country codes of the given reviews
pub fn distinct_countries(reviews: &[LocatedReview]) -> BTreeSet<String> {
    reviews
        .iter()
        .map(|r| r.country.code2.clone())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Fetch the first public page for every country concurrently.
/// A failed country maps to an empty list; the map always has one entry per country.
pub async fn fetch_public_reviews_by_country<P>(
    api: &P,
    app_id: &str,
    countries: &BTreeSet<String>,
) -> PublicReviewsByCountry
where
    P: PublicReviewApi + ?Sized,
{
    let fetches = countries.iter().map(|country| async move {
        info!("Fetching public reviews for {}...", country);
        let reviews = match api.first_page(app_id, &country.to_lowercase()).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!("Failed to fetch public reviews for {}: {}", country, e);
                Vec::new()
            }
        };
        (country.clone(), reviews)
    });

    join_all(fetches).await.into_iter().collect()
}

/// First public review that the matcher accepts for this record
pub fn find_public_match<'a, M>(
    record: &ReviewRecord,
    candidates: &'a [PublicReview],
    matcher: &M,
) -> Option<&'a PublicReview>
where
    M: ReviewMatcher + ?Sized,
{
    candidates.iter().find(|public| matcher.matches(record, public))
}

/// Overwrite the version of every review that has a public match.
/// Unmatched reviews keep their version untouched. Returns the match count.
pub fn apply_public_versions<M>(
    reviews: &mut [LocatedReview],
    by_country: &PublicReviewsByCountry,
    matcher: &M,
) -> usize
where
    M: ReviewMatcher + ?Sized,
{
    let mut matched = 0;

    for review in reviews.iter_mut() {
        let candidates = by_country
            .get(&review.country.code2)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if let Some(public) = find_public_match(&review.record, candidates, matcher) {
            review.record.version = public
                .version
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| VERSION_UNAVAILABLE.to_string());
            matched += 1;
        }
    }

    matched
}

/// Fetch the public feeds for every country present and apply the matches
pub async fn reconcile<P, M>(api: &P, app_id: &str, reviews: &mut [LocatedReview], matcher: &M)
where
    P: PublicReviewApi + ?Sized,
    M: ReviewMatcher + ?Sized,
{
    let countries = distinct_countries(reviews);
    if countries.is_empty() {
        return;
    }

    let by_country = fetch_public_reviews_by_country(api, app_id, &countries).await;
    let matched = apply_public_versions(reviews, &by_country, matcher);
    debug!(
        "Recovered app version for {}/{} reviews from {} storefronts",
        matched,
        reviews.len(),
        countries.len()
    );
}
