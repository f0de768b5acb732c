pub mod appstore;
pub mod error;
pub mod factory;
pub mod googleplay;
pub mod normalize;
pub mod storefront;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use appstore::AppStoreSource;
pub use error::SourceError;
pub use factory::{build_http_client, SourceFactory, SourceFactoryRegistry};
pub use googleplay::GooglePlaySource;
pub use traits::{AccessTokenProvider, CustomerReviewApi, PlayReviewApi, PublicReviewApi, ReviewSource};
