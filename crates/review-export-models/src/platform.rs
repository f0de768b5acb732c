use serde::{Deserialize, Serialize};
use std::fmt;

/// Store listing a review was collected from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn all() -> [Platform; 2] {
        [Platform::Ios, Platform::Android]
    }

    /// Worksheet name used for this platform in the exported workbook
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}
