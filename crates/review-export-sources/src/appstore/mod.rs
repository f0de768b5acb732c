pub mod api;
pub mod auth;
pub mod client;
pub mod fetcher;
pub mod mapper;
pub mod reconcile;

pub use api::AppStoreConnectApi;
pub use auth::{AccessToken, TokenIssuer};
pub use client::AppStoreSource;
pub use reconcile::{ExactTripleMatcher, ReviewMatcher};
