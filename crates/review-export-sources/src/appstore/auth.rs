use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::error::SourceError;

pub const AUDIENCE: &str = "appstoreconnect-v1";

/// App Store Connect rejects tokens that live longer than 20 minutes
pub const TOKEN_LIFETIME_MINUTES: i64 = 20;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

/// Signed bearer token for the App Store Connect API.
///
/// Minted once per export run and passed by reference to every call.
/// It is never refreshed; calls made after `expires_at` fail at the provider.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

enum KeyMaterial {
    Pem(Vec<u8>),
    File(PathBuf),
}

impl KeyMaterial {
    fn load(&self) -> Result<Cow<'_, [u8]>, SourceError> {
        match self {
            KeyMaterial::Pem(pem) => Ok(Cow::Borrowed(pem)),
            KeyMaterial::File(path) => std::fs::read(path).map(Cow::Owned).map_err(|e| {
                SourceError::credential(format!("reading key {}: {}", path.display(), e))
            }),
        }
    }
}

/// Issues ES256 tokens from an App Store Connect API key
pub struct TokenIssuer {
    issuer_id: String,
    key_id: String,
    key: KeyMaterial,
}

impl TokenIssuer {
    pub fn new(
        issuer_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key_pem: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            key_id: key_id.into(),
            key: KeyMaterial::Pem(private_key_pem.into()),
        }
    }

    /// Use the `.p8` key file issued by App Store Connect.
    /// The file is read each time a token is issued.
    pub fn from_key_file(
        issuer_id: impl Into<String>,
        key_id: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            issuer_id: issuer_id.into(),
            key_id: key_id.into(),
            key: KeyMaterial::File(path.into()),
        }
    }


    pub fn issue(&self) -> Result<AccessToken, SourceError> {
        self.issue_at(Utc::now())
    }

    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<AccessToken, SourceError> {
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());
        header.typ = Some("JWT".to_string());

        let expires_at = now + Duration::minutes(TOKEN_LIFETIME_MINUTES);
        let claims = Claims {
            iss: self.issuer_id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            aud: AUDIENCE.to_string(),
        };

        let pem = self.key.load()?;
        let key = EncodingKey::from_ec_pem(&pem)
            .map_err(|e| SourceError::credential(format!("invalid private key: {}", e)))?;
        let value = encode(&header, &claims, &key).map_err(SourceError::credential)?;

        Ok(AccessToken::new(value, expires_at))
    }
}
