// In-memory fakes for the provider seams

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::appstore::api::{
    DeveloperResponse, RawOfficialReview, Relationship, RelationshipLinks, ReviewAttributes,
    ReviewRelationships,
};
use crate::appstore::auth::AccessToken;
use crate::error::SourceError;
use crate::googleplay::api::{PlayComment, RawAndroidReview, UserComment};
use crate::storefront::PublicReview;
use crate::traits::{CustomerReviewApi, PlayReviewApi, PublicReviewApi};

pub(crate) fn test_token() -> AccessToken {
    AccessToken::new("test-token", Utc::now() + Duration::minutes(20))
}

pub(crate) fn official_review(
    id: &str,
    author: &str,
    title: &str,
    body: &str,
    territory: &str,
    with_response_link: bool,
) -> RawOfficialReview {
    let relationships = with_response_link.then(|| ReviewRelationships {
        response: Some(Relationship {
            links: Some(RelationshipLinks {
                self_link: None,
                related: Some(format!(
                    "https://api.appstoreconnect.apple.com/v1/customerReviews/{}/response",
                    id
                )),
            }),
        }),
    });

    RawOfficialReview {
        id: id.to_string(),
        attributes: ReviewAttributes {
            reviewer_nickname: Some(author.to_string()),
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            territory: Some(territory.to_string()),
            ..ReviewAttributes::default()
        },
        relationships,
    }
}

pub(crate) fn public_review(author: &str, title: &str, text: &str, version: Option<&str>) -> PublicReview {
    PublicReview {
        user_name: author.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        version: version.map(str::to_string),
        rating: 5,
        ..PublicReview::default()
    }
}

pub(crate) fn android_review(id: &str, author: Option<&str>, text: &str, rating: i64) -> RawAndroidReview {
    RawAndroidReview {
        review_id: id.to_string(),
        author_name: author.map(str::to_string),
        comments: vec![PlayComment {
            user_comment: Some(UserComment {
                text: Some(text.to_string()),
                star_rating: Some(rating),
                reviewer_language: Some("en".to_string()),
                ..UserComment::default()
            }),
            developer_comment: None,
        }],
    }
}

enum ResponseOutcome {
    Found(DeveloperResponse),
    Failed(u16, String),
}

pub(crate) struct FakeCustomerReviewApi {
    reviews: Vec<RawOfficialReview>,
    list_error: Option<(u16, String)>,
    responses: HashMap<String, ResponseOutcome>,
    delays: HashMap<String, u64>,
    response_requests: Mutex<Vec<String>>,
    last_limit: Mutex<Option<u32>>,
}

impl FakeCustomerReviewApi {
    pub(crate) fn new(reviews: Vec<RawOfficialReview>) -> Self {
        Self {
            reviews,
            list_error: None,
            responses: HashMap::new(),
            delays: HashMap::new(),
            response_requests: Mutex::new(Vec::new()),
            last_limit: Mutex::new(None),
        }
    }

    pub(crate) fn failing(status: u16, detail: &str) -> Self {
        let mut api = Self::new(Vec::new());
        api.list_error = Some((status, detail.to_string()));
        api
    }

    pub(crate) fn with_response(mut self, id: &str, body: &str, date: &str) -> Self {
        self.responses.insert(
            id.to_string(),
            ResponseOutcome::Found(DeveloperResponse {
                response_body: Some(body.to_string()),
                last_modified_date: Some(date.to_string()),
                state: Some("PUBLISHED".to_string()),
            }),
        );
        self
    }

    pub(crate) fn with_response_error(mut self, id: &str, status: u16, detail: &str) -> Self {
        self.responses
            .insert(id.to_string(), ResponseOutcome::Failed(status, detail.to_string()));
        self
    }

    pub(crate) fn with_response_delay(mut self, id: &str, millis: u64) -> Self {
        self.delays.insert(id.to_string(), millis);
        self
    }

    pub(crate) fn response_requests(&self) -> Vec<String> {
        self.response_requests.lock().unwrap().clone()
    }

    pub(crate) fn last_limit(&self) -> Option<u32> {
        *self.last_limit.lock().unwrap()
    }
}

#[async_trait]
impl CustomerReviewApi for FakeCustomerReviewApi {
    async fn list_reviews(
        &self,
        _token: &AccessToken,
        _app_id: &str,
        limit: u32,
    ) -> Result<Vec<RawOfficialReview>, SourceError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        match &self.list_error {
            Some((status, detail)) => Err(SourceError::api(Some(*status), detail.clone())),
            None => Ok(self.reviews.clone()),
        }
    }

    async fn get_response(
        &self,
        _token: &AccessToken,
        review_id: &str,
    ) -> Result<DeveloperResponse, SourceError> {
        self.response_requests.lock().unwrap().push(review_id.to_string());

        if let Some(millis) = self.delays.get(review_id) {
            tokio::time::sleep(std::time::Duration::from_millis(*millis)).await;
        }

        match self.responses.get(review_id) {
            Some(ResponseOutcome::Found(response)) => Ok(response.clone()),
            Some(ResponseOutcome::Failed(status, detail)) => {
                Err(SourceError::api(Some(*status), detail.clone()))
            }
            None => Err(SourceError::api(Some(404), "no response")),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakePublicReviewApi {
    pages: HashMap<String, Vec<PublicReview>>,
    failing: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl FakePublicReviewApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, country: &str, reviews: Vec<PublicReview>) -> Self {
        self.pages.insert(country.to_string(), reviews);
        self
    }

    pub(crate) fn failing_for(mut self, country: &str) -> Self {
        self.failing.insert(country.to_string());
        self
    }

    pub(crate) fn requested_countries(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublicReviewApi for FakePublicReviewApi {
    async fn first_page(&self, _app_id: &str, country: &str) -> Result<Vec<PublicReview>, SourceError> {
        self.requested.lock().unwrap().push(country.to_string());

        if self.failing.contains(country) {
            return Err(SourceError::api(Some(503), "storefront unavailable"));
        }
        Ok(self.pages.get(country).cloned().unwrap_or_default())
    }
}

pub(crate) struct FakePlayReviewApi {
    reviews: Vec<RawAndroidReview>,
    error: Mutex<Option<SourceError>>,
    last_request: Mutex<Option<(String, u32)>>,
}

impl FakePlayReviewApi {
    pub(crate) fn new(reviews: Vec<RawAndroidReview>) -> Self {
        Self {
            reviews,
            error: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn failing(error: SourceError) -> Self {
        let api = Self::new(Vec::new());
        *api.error.lock().unwrap() = Some(error);
        api
    }

    pub(crate) fn last_request(&self) -> Option<(String, u32)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayReviewApi for FakePlayReviewApi {
    async fn list_reviews(
        &self,
        package_name: &str,
        max_results: u32,
    ) -> Result<Vec<RawAndroidReview>, SourceError> {
        *self.last_request.lock().unwrap() = Some((package_name.to_string(), max_results));

        match self.error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.reviews.clone()),
        }
    }
}
