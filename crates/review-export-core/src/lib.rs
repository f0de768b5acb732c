pub mod error;
pub mod export;
pub mod translate;
pub mod workbook;

pub use error::ExportError;
pub use export::{ExportOptions, ExportOrchestrator, ExportProgress, ExportSummary, PlatformSummary};
pub use translate::{translate_records, BaiduTranslator, PassthroughTranslator, Translator};
pub use workbook::{write_workbook, ReviewSheet, COLUMNS};
