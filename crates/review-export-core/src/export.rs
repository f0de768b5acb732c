use review_export_models::Platform;
use review_export_sources::ReviewSource;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::error::ExportError;
use crate::translate::{translate_records, Translator};
use crate::workbook::{write_workbook, ReviewSheet};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_path: PathBuf,
    /// Translation requests in flight at once
    pub translation_concurrency: usize,
}

/// Progress events for the CLI; the orchestrator itself only logs
#[derive(Debug, Clone, PartialEq)]
pub enum ExportProgress {
    Fetching(Platform),
    Fetched { platform: Platform, reviews: usize },
    Translated { platform: Platform, done: usize, total: usize },
    Writing(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub platform: Platform,
    pub reviews: usize,
    pub with_reply: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub platforms: Vec<PlatformSummary>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

impl ExportSummary {
    pub fn total_reviews(&self) -> usize {
        self.platforms.iter().map(|p| p.reviews).sum()
    }
}

type ProgressCallback = Box<dyn Fn(&ExportProgress) + Send + Sync>;

/// Runs one export: each platform is fetched and translated in turn, then
/// every sheet is written to a single workbook.
///
/// A platform failure aborts the run before anything is written.
pub struct ExportOrchestrator {
    sources: Vec<Box<dyn ReviewSource>>,
    translator: Box<dyn Translator>,
    options: ExportOptions,
    progress: Option<ProgressCallback>,
}

impl ExportOrchestrator {
    pub fn new(
        sources: Vec<Box<dyn ReviewSource>>,
        translator: Box<dyn Translator>,
        options: ExportOptions,
    ) -> Self {
        Self {
            sources,
            translator,
            options,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: impl Fn(&ExportProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    fn report(&self, event: ExportProgress) {
        if let Some(progress) = &self.progress {
            progress(&event);
        }
    }

    async fn collect_sheet(&self, source: &dyn ReviewSource) -> Result<ReviewSheet, ExportError> {
        let platform = source.platform();
        self.report(ExportProgress::Fetching(platform));

        let records = source
            .fetch_reviews()
            .await
            .map_err(|source| ExportError::Platform { platform, source })?;

        let total = records.len();
        info!("Fetched {} {} reviews", total, platform);
        self.report(ExportProgress::Fetched {
            platform,
            reviews: total,
        });

        let rows = translate_records(
            self.translator.as_ref(),
            records,
            self.options.translation_concurrency,
            |done| {
                self.report(ExportProgress::Translated {
                    platform,
                    done,
                    total,
                })
            },
        )
        .await;

        Ok(ReviewSheet::new(platform, rows))
    }

    #[instrument(skip(self), fields(output = %self.options.output_path.display()))]
    pub async fn run(&self) -> Result<ExportSummary, ExportError> {
        if self.sources.is_empty() {
            return Err(ExportError::NoSources);
        }

        let started = Instant::now();
        let mut sheets = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            sheets.push(self.collect_sheet(source.as_ref()).await?);
        }

        self.report(ExportProgress::Writing(self.options.output_path.clone()));
        write_workbook(&self.options.output_path, &sheets)?;
        info!("Successfully exported reviews");

        Ok(ExportSummary {
            output_path: self.options.output_path.clone(),
            platforms: sheets
                .iter()
                .map(|sheet| PlatformSummary {
                    platform: sheet.platform,
                    reviews: sheet.rows.len(),
                    with_reply: sheet
                        .rows
                        .iter()
                        .filter(|row| row.record.has_developer_reply())
                        .count(),
                })
                .collect(),
            duration: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests;
