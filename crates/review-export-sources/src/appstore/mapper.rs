use review_export_models::{resolve_country, CountryInfo, ReviewRecord};

use super::fetcher::OfficialReview;
use crate::normalize::{format_date, normalize_rating};

/// A canonical iOS record that still knows its storefront country codes,
/// which reconciliation needs to pick the right public feed
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedReview {
    pub country: CountryInfo,
    pub record: ReviewRecord,
}

/// Map an official review and its response into the canonical record.
///
/// Defaults: empty strings for absent text and dates, rating 0, version
/// empty until reconciliation fills it.
pub fn to_located_record(official: &OfficialReview) -> LocatedReview {
    let attributes = &official.review.attributes;
    let response = official.response.as_ref();
    let country = resolve_country(attributes.territory.as_deref().unwrap_or(""));

    let record = ReviewRecord {
        version: attributes.app_store_version.clone().unwrap_or_default(),
        author: attributes.reviewer_nickname.clone().unwrap_or_default(),
        date: attributes.created_date.as_deref().map(format_date).unwrap_or_default(),
        rating: normalize_rating(attributes.rating),
        title: attributes.title.clone().unwrap_or_default(),
        review: attributes.body.clone().unwrap_or_default(),
        country: country.name.clone(),
        developer_reply: response
            .and_then(|r| r.response_body.clone())
            .unwrap_or_default(),
        reply_date: response
            .and_then(|r| r.last_modified_date.as_deref())
            .map(format_date)
            .unwrap_or_default(),
    };

    LocatedReview { country, record }
}
