pub mod country;
pub mod platform;
pub mod review;

pub use country::{resolve_country, CountryInfo};
pub use platform::Platform;
pub use review::{ExportRow, ReviewRecord};
