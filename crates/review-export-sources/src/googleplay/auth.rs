use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::debug;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::error::SourceError;
use crate::traits::AccessTokenProvider;

pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Where the service account key comes from
#[derive(Clone)]
pub enum ServiceAccountCredential {
    /// Client email and PEM private key given directly
    Inline {
        client_email: String,
        private_key: String,
    },
    /// JSON key file downloaded from the Cloud console
    File(PathBuf),
}

impl fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { client_email, .. } => f
                .debug_struct("Inline")
                .field("client_email", client_email)
                .field("private_key", &"***")
                .finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl ServiceAccountCredential {
    async fn into_key(self) -> Result<ServiceAccountKey, SourceError> {
        match self {
            Self::Inline {
                client_email,
                private_key,
            } => serde_json::from_value(serde_json::json!({
                "type": "service_account",
                "client_email": client_email,
                "private_key": private_key,
                "token_uri": GOOGLE_TOKEN_URI,
            }))
            .map_err(|e| SourceError::credential(format!("invalid service account: {}", e))),
            Self::File(path) => yup_oauth2::read_service_account_key(&path)
                .await
                .map_err(|e| {
                    SourceError::credential(format!(
                        "reading service account {}: {}",
                        path.display(),
                        e
                    ))
                }),
        }
    }
}

/// Mints scoped access tokens for a Google service account.
///
/// The authenticator is built on first use and caches tokens until they
/// expire, so key problems surface on the first fetch.
pub struct ServiceAccountTokenProvider {
    credential: ServiceAccountCredential,
    authenticator: OnceCell<DefaultAuthenticator>,
}

impl ServiceAccountTokenProvider {
    pub fn new(credential: ServiceAccountCredential) -> Self {
        Self {
            credential,
            authenticator: OnceCell::new(),
        }
    }

    async fn authenticator(&self) -> Result<&DefaultAuthenticator, SourceError> {
        self.authenticator
            .get_or_try_init(|| async {
                let key = self.credential.clone().into_key().await?;
                debug!("Building service account authenticator for {}", key.client_email);
                ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|e| SourceError::credential(format!("service account setup: {}", e)))
            })
            .await
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, SourceError> {
        let token = self
            .authenticator()
            .await?
            .token(scopes)
            .await
            .map_err(SourceError::credential)?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| SourceError::credential("token endpoint returned no access token"))
    }
}
