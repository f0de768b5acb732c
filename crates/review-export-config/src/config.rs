use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_IOS_MAX_RESULTS: u32 = 10;
pub const DEFAULT_ANDROID_MAX_RESULTS: u32 = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub ios: Option<IosConfig>,
    #[serde(default)]
    pub android: Option<AndroidConfig>,
    #[serde(default)]
    pub translation: Option<TranslationConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// App Store Connect API key and app listing
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct IosConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub issuer_id: String,
    #[serde(default)]
    pub key_id: String,
    /// Path to the `.p8` key downloaded from App Store Connect
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,
    /// Inline PEM, used when no key file is configured
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default = "default_ios_max_results")]
    pub max_results: u32,
}

/// Google Play Developer API service account and package
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AndroidConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    /// Service account JSON key file, alternative to client_email + private_key
    #[serde(default)]
    pub service_account_file: Option<PathBuf>,
    #[serde(default = "default_android_max_results")]
    pub max_results: u32,
}

impl AndroidConfig {
    /// Private key with escaped `\n` sequences turned into real newlines.
    /// Keys pasted into env vars or single-line TOML strings arrive escaped.
    pub fn private_key_pem(&self) -> String {
        self.private_key.replace("\\n", "\n")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_translation_concurrency")]
    pub concurrency: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            app_id: String::new(),
            secret_key: String::new(),
            target_language: default_target_language(),
            concurrency: default_translation_concurrency(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub file_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: default_output_path(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ios_max_results() -> u32 {
    DEFAULT_IOS_MAX_RESULTS
}

fn default_android_max_results() -> u32 {
    DEFAULT_ANDROID_MAX_RESULTS
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_translation_concurrency() -> usize {
    4
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./app_reviews.xlsx")
}

fn default_timeout_seconds() -> u64 {
    30
}

fn parse_limit(value: &str, default: u32) -> u32 {
    value.trim().parse().ok().filter(|n| *n > 0).unwrap_or(default)
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the effective configuration for a run.
    ///
    /// An explicitly given path must exist. The default location is optional,
    /// since a scheduled run may supply everything through the environment.
    pub fn load(explicit_path: Option<&Path>, default_path: &Path) -> anyhow::Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e)
            })?,
            None if default_path.exists() => Self::load_from_file(default_path).map_err(|e| {
                anyhow::anyhow!("Failed to load config from {}: {}", default_path.display(), e)
            })?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from `IOS_*`, `ANDROID_*`, `GOOGLE_*`, `TRANSLATION_*`
    /// and `OUTPUT_FILE_PATH` environment variables onto the file configuration.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let ios_vars = [
            "IOS_ISSUER_ID",
            "IOS_KEY_ID",
            "IOS_PRIVATE_KEY_PATH",
            "IOS_APP_ID",
            "IOS_APP_NAME",
            "IOS_MAX_RESULTS",
        ];
        if ios_vars.iter().any(|key| var(*key).is_some()) {
            let ios = self.ios.get_or_insert_with(|| IosConfig {
                enabled: true,
                max_results: DEFAULT_IOS_MAX_RESULTS,
                ..IosConfig::default()
            });
            if let Some(v) = var("IOS_ISSUER_ID") {
                ios.issuer_id = v;
            }
            if let Some(v) = var("IOS_KEY_ID") {
                ios.key_id = v;
            }
            if let Some(v) = var("IOS_PRIVATE_KEY_PATH") {
                ios.private_key_path = Some(PathBuf::from(v));
            }
            if let Some(v) = var("IOS_APP_ID") {
                ios.app_id = v;
            }
            if let Some(v) = var("IOS_APP_NAME") {
                ios.app_name = Some(v);
            }
            if let Some(v) = var("IOS_MAX_RESULTS") {
                ios.max_results = parse_limit(&v, DEFAULT_IOS_MAX_RESULTS);
            }
        }

        let android_vars = [
            "ANDROID_PACKAGE_NAME",
            "GOOGLE_CLIENT_EMAIL",
            "GOOGLE_PRIVATE_KEY",
            "ANDROID_MAX_RESULTS",
        ];
        if android_vars.iter().any(|key| var(*key).is_some()) {
            let android = self.android.get_or_insert_with(|| AndroidConfig {
                enabled: true,
                max_results: DEFAULT_ANDROID_MAX_RESULTS,
                ..AndroidConfig::default()
            });
            if let Some(v) = var("ANDROID_PACKAGE_NAME") {
                android.package_name = v;
            }
            if let Some(v) = var("GOOGLE_CLIENT_EMAIL") {
                android.client_email = v;
            }
            if let Some(v) = var("GOOGLE_PRIVATE_KEY") {
                android.private_key = v;
            }
            if let Some(v) = var("ANDROID_MAX_RESULTS") {
                android.max_results = parse_limit(&v, DEFAULT_ANDROID_MAX_RESULTS);
            }
        }

        if var("TRANSLATION_APP_ID").is_some() || var("TRANSLATION_API_KEY").is_some() {
            let translation = self.translation.get_or_insert_with(TranslationConfig::default);
            if let Some(v) = var("TRANSLATION_APP_ID") {
                translation.app_id = v;
            }
            if let Some(v) = var("TRANSLATION_API_KEY") {
                translation.secret_key = v;
            }
        }

        if let Some(v) = var("OUTPUT_FILE_PATH") {
            self.output.file_path = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.enabled_ios().is_none() && self.enabled_android().is_none() {
            return Err(anyhow::anyhow!(
                "No platform is enabled; configure [ios] and/or [android]"
            ));
        }

        let mut missing = Vec::new();

        if let Some(ios) = self.enabled_ios() {
            if ios.issuer_id.is_empty() {
                missing.push("ios.issuer_id (IOS_ISSUER_ID)");
            }
            if ios.key_id.is_empty() {
                missing.push("ios.key_id (IOS_KEY_ID)");
            }
            if ios.private_key_path.is_none() && ios.private_key.as_deref().unwrap_or("").is_empty() {
                missing.push("ios.private_key_path (IOS_PRIVATE_KEY_PATH)");
            }
            if ios.app_id.is_empty() {
                missing.push("ios.app_id (IOS_APP_ID)");
            }
        }

        if let Some(android) = self.enabled_android() {
            if android.package_name.is_empty() {
                missing.push("android.package_name (ANDROID_PACKAGE_NAME)");
            }
            if android.service_account_file.is_none() {
                if android.client_email.is_empty() {
                    missing.push("android.client_email (GOOGLE_CLIENT_EMAIL)");
                }
                if android.private_key.is_empty() {
                    missing.push("android.private_key (GOOGLE_PRIVATE_KEY)");
                }
            }
        }

        if let Some(translation) = self.enabled_translation() {
            if translation.app_id.is_empty() {
                missing.push("translation.app_id (TRANSLATION_APP_ID)");
            }
            if translation.secret_key.is_empty() {
                missing.push("translation.secret_key (TRANSLATION_API_KEY)");
            }
        }

        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required configuration: {}",
                missing.join(", ")
            ));
        }

        if self.enabled_ios().is_some_and(|ios| ios.max_results == 0)
            || self.enabled_android().is_some_and(|a| a.max_results == 0)
        {
            return Err(anyhow::anyhow!("max_results must be at least 1"));
        }

        if self.enabled_translation().is_some_and(|t| t.concurrency == 0) {
            return Err(anyhow::anyhow!("translation.concurrency must be at least 1"));
        }

        Ok(())
    }

    pub fn enabled_ios(&self) -> Option<&IosConfig> {
        self.ios.as_ref().filter(|ios| ios.enabled)
    }

    pub fn enabled_android(&self) -> Option<&AndroidConfig> {
        self.android.as_ref().filter(|android| android.enabled)
    }

    pub fn enabled_translation(&self) -> Option<&TranslationConfig> {
        self.translation.as_ref().filter(|t| t.enabled)
    }
}
