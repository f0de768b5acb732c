// Review text translation. Failures never abort an export: the original
// text is kept and a warning logged.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use md5::{Digest, Md5};
use reqwest::Client;
use review_export_models::{ExportRow, ReviewRecord};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

pub const BAIDU_TRANSLATE_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

/// Text-in, text-out translation. Implementations return the input on failure.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> String;
}

/// Used when translation is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// `md5(appid + q + salt + secret)` as lowercase hex
pub fn sign(app_id: &str, query: &str, salt: &str, secret_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(app_id.as_bytes());
    hasher.update(query.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct TransResult {
    #[serde(default)]
    dst: String,
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    // Sent as a string by the API, but older responses used a number
    error_code: Option<serde_json::Value>,
    error_msg: Option<String>,
    trans_result: Option<Vec<TransResult>>,
}

/// Translated text from a response body, or the reason there is none
fn parse_translation(body: &str) -> Result<String, String> {
    let response: BaiduResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected response: {}", e))?;

    if let Some(code) = response.error_code {
        return Err(format!(
            "error {}: {}",
            code,
            response.error_msg.unwrap_or_default()
        ));
    }

    match response.trans_result {
        Some(results) => Ok(results
            .into_iter()
            .map(|r| r.dst)
            .collect::<Vec<_>>()
            .join("\n")),
        None => Err("response has no trans_result".to_string()),
    }
}

/// Baidu general translation API client
pub struct BaiduTranslator {
    client: Client,
    app_id: String,
    secret_key: String,
    target_language: String,
    base_url: String,
}

impl BaiduTranslator {
    pub fn new(
        client: Client,
        app_id: impl Into<String>,
        secret_key: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            secret_key: secret_key.into(),
            target_language: target_language.into(),
            base_url: BAIDU_TRANSLATE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(&self, text: &str) -> Result<String, String> {
        let salt = Utc::now().timestamp_millis().to_string();
        let signature = sign(&self.app_id, text, &salt, &self.secret_key);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", text),
                ("from", "auto"),
                ("to", self.target_language.as_str()),
                ("appid", self.app_id.as_str()),
                ("salt", salt.as_str()),
                ("sign", signature.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let body = response.text().await.map_err(|e| e.to_string())?;
        parse_translation(&body)
    }
}

#[async_trait]
impl Translator for BaiduTranslator {
    async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.request(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation error: {}", e);
                text.to_string()
            }
        }
    }
}

/// Translate every record's review text with at most `concurrency` requests
/// in flight. Output order matches input order.
///
/// `on_progress` is called with the number of records finished so far.
pub async fn translate_records<T, F>(
    translator: &T,
    records: Vec<ReviewRecord>,
    concurrency: usize,
    on_progress: F,
) -> Vec<ExportRow>
where
    T: Translator + ?Sized,
    F: Fn(usize) + Send + Sync,
{
    let finished = AtomicUsize::new(0);
    debug!("Translating {} reviews, {} at a time", records.len(), concurrency.max(1));

    let finished = &finished;
    let on_progress = &on_progress;
    stream::iter(records)
        .map(move |record| async move {
            let translated = translator.translate(&record.review).await;
            on_progress(finished.fetch_add(1, Ordering::SeqCst) + 1);
            ExportRow::new(record, translated)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
