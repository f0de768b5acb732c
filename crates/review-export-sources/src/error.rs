use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Token issuance failed (unreadable key, signing failure)
    #[error("token generation failed: {0}")]
    Credential(String),

    /// The provider answered with an error; `detail` is the provider's own message
    #[error("{detail}")]
    Api { status: Option<u16>, detail: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    pub fn api(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    pub fn credential(message: impl std::fmt::Display) -> Self {
        Self::Credential(message.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Report a failed required call as an API error with context.
    /// Credential errors keep their kind.
    pub fn into_api(self, context: &str) -> Self {
        match self {
            Self::Credential(_) => self,
            other => {
                let status = other.status();
                Self::api(status, format!("{}: {}", context, other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_provider_detail() {
        let err = SourceError::api(Some(401), "The provided credentials are not valid.");
        assert_eq!(err.to_string(), "The provided credentials are not valid.");
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_into_api_adds_context_and_keeps_status() {
        let err = SourceError::api(Some(404), "not found").into_api("App Store review fetch failed");
        assert_eq!(err.to_string(), "App Store review fetch failed: not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_into_api_keeps_credential_errors() {
        let err = SourceError::credential("bad key").into_api("context");
        assert!(matches!(err, SourceError::Credential(_)));
        assert_eq!(err.to_string(), "token generation failed: bad key");
    }
}
