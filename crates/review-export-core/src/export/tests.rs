use super::*;
use crate::translate::PassthroughTranslator;
use async_trait::async_trait;
use review_export_models::ReviewRecord;
use review_export_sources::SourceError;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct StaticSource {
    platform: Platform,
    result: Mutex<Option<Result<Vec<ReviewRecord>, SourceError>>>,
}

impl StaticSource {
    fn ok(platform: Platform, records: Vec<ReviewRecord>) -> Box<dyn ReviewSource> {
        Box::new(Self {
            platform,
            result: Mutex::new(Some(Ok(records))),
        })
    }

    fn failing(platform: Platform, error: SourceError) -> Box<dyn ReviewSource> {
        Box::new(Self {
            platform,
            result: Mutex::new(Some(Err(error))),
        })
    }
}

#[async_trait]
impl ReviewSource for StaticSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_reviews(&self) -> Result<Vec<ReviewRecord>, SourceError> {
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

struct UppercaseTranslator;

#[async_trait]
impl Translator for UppercaseTranslator {
    async fn translate(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

fn record(author: &str, review: &str, reply: &str) -> ReviewRecord {
    ReviewRecord {
        author: author.to_string(),
        review: review.to_string(),
        developer_reply: reply.to_string(),
        rating: 4,
        ..ReviewRecord::default()
    }
}

fn options(dir: &TempDir) -> ExportOptions {
    ExportOptions {
        output_path: dir.path().join("app_reviews.xlsx"),
        translation_concurrency: 4,
    }
}

#[tokio::test]
async fn test_export_writes_all_platforms_in_order() {
    let dir = TempDir::new().unwrap();
    let orchestrator = ExportOrchestrator::new(
        vec![
            StaticSource::ok(
                Platform::Ios,
                vec![record("A", "great", "Thanks"), record("B", "bad", "")],
            ),
            StaticSource::ok(Platform::Android, vec![record("C", "ok", "")]),
        ],
        Box::new(PassthroughTranslator),
        options(&dir),
    );

    let summary = orchestrator.run().await.unwrap();

    assert!(summary.output_path.exists());
    assert_eq!(summary.total_reviews(), 3);
    assert_eq!(summary.platforms.len(), 2);
    assert_eq!(summary.platforms[0].platform, Platform::Ios);
    assert_eq!(summary.platforms[0].reviews, 2);
    assert_eq!(summary.platforms[0].with_reply, 1);
    assert_eq!(summary.platforms[1].platform, Platform::Android);
    assert_eq!(summary.platforms[1].reviews, 1);
}

#[tokio::test]
async fn test_platform_failure_aborts_without_writing() {
    let dir = TempDir::new().unwrap();
    let orchestrator = ExportOrchestrator::new(
        vec![
            StaticSource::ok(Platform::Ios, vec![record("A", "great", "")]),
            StaticSource::failing(
                Platform::Android,
                SourceError::api(Some(403), "Google Play review fetch failed: permission denied"),
            ),
        ],
        Box::new(PassthroughTranslator),
        options(&dir),
    );

    let err = orchestrator.run().await.unwrap_err();

    assert_eq!(err.platform(), Some(Platform::Android));
    assert_eq!(
        err.to_string(),
        "Android review fetch failed: Google Play review fetch failed: permission denied"
    );
    assert!(!dir.path().join("app_reviews.xlsx").exists());
}

#[tokio::test]
async fn test_ios_failure_stops_before_android() {
    let dir = TempDir::new().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = events.clone();

    let orchestrator = ExportOrchestrator::new(
        vec![
            StaticSource::failing(Platform::Ios, SourceError::credential("missing key")),
            StaticSource::ok(Platform::Android, vec![record("C", "ok", "")]),
        ],
        Box::new(PassthroughTranslator),
        options(&dir),
    )
    .with_progress(move |event| recorded.lock().unwrap().push(event.clone()));

    let err = orchestrator.run().await.unwrap_err();

    assert_eq!(err.platform(), Some(Platform::Ios));
    assert_eq!(
        *events.lock().unwrap(),
        vec![ExportProgress::Fetching(Platform::Ios)]
    );
}

#[tokio::test]
async fn test_progress_events() {
    let dir = TempDir::new().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = events.clone();

    let orchestrator = ExportOrchestrator::new(
        vec![StaticSource::ok(Platform::Android, vec![record("C", "ok", "")])],
        Box::new(UppercaseTranslator),
        options(&dir),
    )
    .with_progress(move |event| recorded.lock().unwrap().push(event.clone()));

    orchestrator.run().await.unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            ExportProgress::Fetching(Platform::Android),
            ExportProgress::Fetched {
                platform: Platform::Android,
                reviews: 1
            },
            ExportProgress::Translated {
                platform: Platform::Android,
                done: 1,
                total: 1
            },
            ExportProgress::Writing(dir.path().join("app_reviews.xlsx")),
        ]
    );
}

#[tokio::test]
async fn test_collect_sheet_translates_reviews() {
    let dir = TempDir::new().unwrap();
    let orchestrator = ExportOrchestrator::new(Vec::new(), Box::new(UppercaseTranslator), options(&dir));

    let source = StaticSource::ok(Platform::Ios, vec![record("A", "très bien", "")]);
    let sheet = orchestrator.collect_sheet(source.as_ref()).await.unwrap();

    assert_eq!(sheet.platform, Platform::Ios);
    assert_eq!(sheet.rows[0].record.review, "très bien");
    assert_eq!(sheet.rows[0].translated_review, "TRÈS BIEN");
}

#[tokio::test]
async fn test_no_sources_is_an_error() {
    let dir = TempDir::new().unwrap();
    let orchestrator = ExportOrchestrator::new(Vec::new(), Box::new(PassthroughTranslator), options(&dir));

    assert!(matches!(orchestrator.run().await, Err(ExportError::NoSources)));
}

#[test]
fn test_summary_serializes_duration_in_millis() {
    let summary = ExportSummary {
        output_path: PathBuf::from("out.xlsx"),
        platforms: vec![PlatformSummary {
            platform: Platform::Ios,
            reviews: 2,
            with_reply: 1,
        }],
        duration: Duration::from_millis(1500),
    };

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["duration_ms"], 1500);
    assert_eq!(json["platforms"][0]["platform"], "ios");
}
