//! Source factory pattern for creating review sources from configuration
//!
//! Each platform registers a factory; the registry creates every enabled
//! source in a fixed platform order (iOS first, then Android).

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use review_export_config::{Config, HttpConfig};
use review_export_models::Platform;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::ReviewSource;

/// Build the shared HTTP client with the configured request timeout
pub fn build_http_client(http: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(http.timeout_seconds))
        .user_agent(concat!("review-export/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Factory trait for creating review sources from configuration
#[async_trait]
pub trait SourceFactory: Send + Sync {
    /// The platform this factory creates a source for
    fn platform(&self) -> Platform;

    /// Create a source instance from configuration
    /// Returns None if the platform is not enabled or not configured
    async fn create_source(
        &self,
        config: &Config,
        client: &Client,
    ) -> Result<Option<Box<dyn ReviewSource>>>;

    /// Validate that the platform configuration is usable
    fn validate_config(&self, config: &Config) -> Result<()>;
}

/// Registry of source factories
pub struct SourceFactoryRegistry {
    factories: BTreeMap<Platform, Box<dyn SourceFactory>>,
}

impl SourceFactoryRegistry {
    /// Create a new registry with both platform factories registered
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };

        registry.register(Box::new(ios::AppStoreSourceFactory));
        registry.register(Box::new(android::GooglePlaySourceFactory));

        registry
    }

    /// Register a factory, replacing any previous one for the same platform
    pub fn register(&mut self, factory: Box<dyn SourceFactory>) {
        self.factories.insert(factory.platform(), factory);
    }

    /// Create all enabled sources, restricted to `only` when it is non-empty
    pub async fn create_sources(
        &self,
        config: &Config,
        client: &Client,
        only: &[Platform],
    ) -> Result<Vec<Box<dyn ReviewSource>>> {
        let mut sources = Vec::new();

        for (platform, factory) in &self.factories {
            if !only.is_empty() && !only.contains(platform) {
                continue;
            }
            if let Some(source) = factory.create_source(config, client).await? {
                sources.push(source);
            }
        }

        Ok(sources)
    }

    /// Validate all platform configurations
    pub fn validate_all_configs(&self, config: &Config) -> Result<()> {
        for factory in self.factories.values() {
            factory.validate_config(config)?;
        }
        Ok(())
    }
}

impl Default for SourceFactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

mod ios {
    use super::*;
    use crate::appstore::{AppStoreConnectApi, AppStoreSource, TokenIssuer};
    use crate::storefront::StorefrontClient;

    pub struct AppStoreSourceFactory;

    #[async_trait]
    impl SourceFactory for AppStoreSourceFactory {
        fn platform(&self) -> Platform {
            Platform::Ios
        }

        async fn create_source(
            &self,
            config: &Config,
            client: &Client,
        ) -> Result<Option<Box<dyn ReviewSource>>> {
            let Some(ios) = config.enabled_ios() else {
                return Ok(None);
            };

            let issuer = match (&ios.private_key_path, &ios.private_key) {
                (Some(path), _) => TokenIssuer::from_key_file(&ios.issuer_id, &ios.key_id, path),
                (None, Some(pem)) => {
                    TokenIssuer::new(&ios.issuer_id, &ios.key_id, pem.replace("\\n", "\n"))
                }
                (None, None) => {
                    return Err(anyhow::anyhow!(
                        "iOS is enabled but no private key is configured"
                    ))
                }
            };

            Ok(Some(Box::new(AppStoreSource::new(
                AppStoreConnectApi::new(client.clone()),
                StorefrontClient::new(client.clone()),
                issuer,
                &ios.app_id,
                ios.max_results,
            ))))
        }

        fn validate_config(&self, config: &Config) -> Result<()> {
            if let Some(ios) = config.enabled_ios() {
                if ios.issuer_id.is_empty() || ios.key_id.is_empty() {
                    return Err(anyhow::anyhow!(
                        "iOS is enabled but issuer_id/key_id are not configured"
                    ));
                }
                if ios.private_key_path.is_none() && ios.private_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "iOS is enabled but no private key is configured"
                    ));
                }
                if ios.app_id.is_empty() {
                    return Err(anyhow::anyhow!("iOS is enabled but app_id is not configured"));
                }
            }
            Ok(())
        }
    }
}

mod android {
    use super::*;
    use crate::googleplay::{
        GooglePlayApi, GooglePlaySource, ServiceAccountCredential, ServiceAccountTokenProvider,
    };

    pub struct GooglePlaySourceFactory;

    #[async_trait]
    impl SourceFactory for GooglePlaySourceFactory {
        fn platform(&self) -> Platform {
            Platform::Android
        }

        async fn create_source(
            &self,
            config: &Config,
            client: &Client,
        ) -> Result<Option<Box<dyn ReviewSource>>> {
            let Some(android) = config.enabled_android() else {
                return Ok(None);
            };

            let credential = match &android.service_account_file {
                Some(path) => ServiceAccountCredential::File(path.clone()),
                None => ServiceAccountCredential::Inline {
                    client_email: android.client_email.clone(),
                    private_key: android.private_key_pem(),
                },
            };

            let api = GooglePlayApi::new(client.clone(), ServiceAccountTokenProvider::new(credential));
            Ok(Some(Box::new(GooglePlaySource::new(
                api,
                &android.package_name,
                android.max_results,
            ))))
        }

        fn validate_config(&self, config: &Config) -> Result<()> {
            if let Some(android) = config.enabled_android() {
                if android.package_name.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Android is enabled but package_name is not configured"
                    ));
                }
                if android.service_account_file.is_none()
                    && (android.client_email.is_empty() || android.private_key.is_empty())
                {
                    return Err(anyhow::anyhow!(
                        "Android is enabled but the service account is not configured"
                    ));
                }
            }
            Ok(())
        }
    }
}
