pub mod api;

pub use api::{parse_feed, PublicReview, StorefrontClient, STOREFRONT_BASE};
