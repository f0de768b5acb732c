use serde::{Deserialize, Serialize};

/// Normalized review, identical for both store platforms.
///
/// Every field is always populated: absent upstream data is mapped to an
/// empty string (or `0` for the rating) by the platform mappers, so a
/// spreadsheet row never has gaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub version: String,
    pub author: String,
    pub date: String, // YYYY-MM-DD
    pub rating: u8,
    pub title: String,
    pub review: String,
    pub country: String, // Display name, not the code
    pub developer_reply: String,
    pub reply_date: String,
}

impl ReviewRecord {
    pub fn has_developer_reply(&self) -> bool {
        !self.developer_reply.is_empty()
    }
}

/// A record ready for the workbook: the canonical review plus its translation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    #[serde(flatten)]
    pub record: ReviewRecord,
    pub translated_review: String,
}

impl ExportRow {
    pub fn new(record: ReviewRecord, translated_review: String) -> Self {
        Self {
            record,
            translated_review,
        }
    }

    /// Row used when no translation was requested
    pub fn untranslated(record: ReviewRecord) -> Self {
        let translated_review = record.review.clone();
        Self::new(record, translated_review)
    }
}
