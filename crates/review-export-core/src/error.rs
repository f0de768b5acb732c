use review_export_models::Platform;
use review_export_sources::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A platform's fetch failed; nothing is written for the run
    #[error("{platform} review fetch failed: {source}")]
    Platform {
        platform: Platform,
        #[source]
        source: SourceError,
    },

    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("no platform is enabled for export")]
    NoSources,
}

impl ExportError {
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::Platform { platform, .. } => Some(*platform),
            _ => None,
        }
    }
}
