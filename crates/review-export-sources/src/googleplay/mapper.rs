use review_export_models::{resolve_country, ReviewRecord};

use super::api::{DeveloperComment, PlayTimestamp, RawAndroidReview, UserComment};
use crate::normalize::{format_epoch_seconds, normalize_rating, ANONYMOUS_AUTHOR, VERSION_UNAVAILABLE};

/// Country part of a reviewer language tag: `en_GB` -> `GB`, `en` -> `en`
fn language_region(language: &str) -> &str {
    language
        .split(['_', '-'])
        .nth(1)
        .filter(|region| !region.is_empty())
        .unwrap_or(language)
}

fn timestamp_date(timestamp: Option<&PlayTimestamp>) -> String {
    format_epoch_seconds(timestamp.and_then(|t| t.seconds))
}

/// Map a Play review into the canonical record.
/// The user comment is expected first, the developer reply second.
pub fn to_record(review: &RawAndroidReview) -> ReviewRecord {
    let empty_user = UserComment::default();
    let empty_developer = DeveloperComment::default();

    let user = review
        .comments
        .first()
        .and_then(|c| c.user_comment.as_ref())
        .unwrap_or(&empty_user);
    let developer = review
        .comments
        .get(1)
        .and_then(|c| c.developer_comment.as_ref())
        .unwrap_or(&empty_developer);

    let country = resolve_country(language_region(user.reviewer_language.as_deref().unwrap_or("")));

    ReviewRecord {
        version: user
            .app_version_name
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| VERSION_UNAVAILABLE.to_string()),
        author: review
            .author_name
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
        date: timestamp_date(user.last_modified.as_ref()),
        rating: normalize_rating(user.star_rating),
        title: user.title.clone().unwrap_or_default(),
        review: user.text.clone().unwrap_or_default(),
        country: country.name,
        developer_reply: developer.text.clone().unwrap_or_default(),
        reply_date: timestamp_date(developer.last_modified.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::googleplay::api::PlayComment;

    fn ts(seconds: i64) -> Option<PlayTimestamp> {
        Some(PlayTimestamp {
            seconds: Some(seconds),
            nanos: None,
        })
    }

    #[test]
    fn test_maps_review_with_reply() {
        let review = RawAndroidReview {
            review_id: "gp:1".to_string(),
            author_name: Some("Jane".to_string()),
            comments: vec![
                PlayComment {
                    user_comment: Some(UserComment {
                        text: Some("Great app".to_string()),
                        title: None,
                        last_modified: ts(1710498600),
                        star_rating: Some(5),
                        reviewer_language: Some("fr".to_string()),
                        app_version_name: Some("4.1.2".to_string()),
                    }),
                    developer_comment: None,
                },
                PlayComment {
                    user_comment: None,
                    developer_comment: Some(DeveloperComment {
                        text: Some("Merci !".to_string()),
                        last_modified: ts(1710585000),
                    }),
                },
            ],
        };

        let record = to_record(&review);
        assert_eq!(record.version, "4.1.2");
        assert_eq!(record.author, "Jane");
        assert_eq!(record.date, "2024-03-15");
        assert_eq!(record.rating, 5);
        assert_eq!(record.title, "");
        assert_eq!(record.review, "Great app");
        assert_eq!(record.country, resolve_country("FR").name);
        assert_eq!(record.developer_reply, "Merci !");
        assert_eq!(record.reply_date, "2024-03-16");
    }

    #[test]
    fn test_review_without_comments_uses_defaults() {
        let review = RawAndroidReview {
            review_id: "gp:2".to_string(),
            author_name: None,
            comments: vec![],
        };

        let record = to_record(&review);
        assert_eq!(record.version, "N/A");
        assert_eq!(record.author, "Anonymous");
        assert_eq!(record.date, "");
        assert_eq!(record.rating, 0);
        assert_eq!(record.review, "");
        assert_eq!(record.country, "");
        assert_eq!(record.developer_reply, "");
        assert_eq!(record.reply_date, "");
    }

    #[test]
    fn test_zero_seconds_is_no_date() {
        let review = RawAndroidReview {
            comments: vec![PlayComment {
                user_comment: Some(UserComment {
                    last_modified: ts(0),
                    ..UserComment::default()
                }),
                developer_comment: None,
            }],
            ..RawAndroidReview::default()
        };

        assert_eq!(to_record(&review).date, "");
    }

    #[test]
    fn test_language_region() {
        assert_eq!(language_region("en_GB"), "GB");
        assert_eq!(language_region("pt-BR"), "BR");
        assert_eq!(language_region("de"), "de");
        assert_eq!(language_region(""), "");
    }

    #[test]
    fn test_region_subtag_resolves_country() {
        let review = RawAndroidReview {
            comments: vec![PlayComment {
                user_comment: Some(UserComment {
                    reviewer_language: Some("en_GB".to_string()),
                    ..UserComment::default()
                }),
                developer_comment: None,
            }],
            ..RawAndroidReview::default()
        };

        let record = to_record(&review);
        assert_eq!(record.country, resolve_country("GB").name);
        assert_eq!(record.developer_reply, "");
        assert_eq!(record.reply_date, "");
    }
}
