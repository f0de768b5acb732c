pub mod api;
pub mod auth;
pub mod client;
pub mod mapper;

pub use api::GooglePlayApi;
pub use auth::{ServiceAccountCredential, ServiceAccountTokenProvider, ANDROID_PUBLISHER_SCOPE};
pub use client::GooglePlaySource;
