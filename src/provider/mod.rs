//! Text-to-image inference providers.
//!
//! The gateway only ever sees [`ImageProvider`]; which backend sits behind it
//! is decided once at startup by [`from_config`].

mod cloudflare;
mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

use crate::config::{AppConfig, ProviderKind};

pub use cloudflare::CloudflareProvider;
pub use mock::{MockCall, MockImageProvider, PLACEHOLDER_PNG};

/// Failure reported by an inference provider.
///
/// `Display` is the bare provider message; callers add their own prefix.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    NotConfigured(String),
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Api { status: u16, message: String },
}

/// A remote capability that turns a prompt into raw image bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, model_id: &str, prompt: &str) -> Result<Bytes, ProviderError>;
}

pub fn from_config(config: &AppConfig) -> Result<Arc<dyn ImageProvider>, ProviderError> {
    match config.provider {
        ProviderKind::Cloudflare => {
            let account_id = config.account_id.as_deref().ok_or_else(|| {
                ProviderError::NotConfigured("CLOUDFLARE_ACCOUNT_ID is not set".into())
            })?;
            let api_token = config.api_token.as_deref().ok_or_else(|| {
                ProviderError::NotConfigured("CLOUDFLARE_API_TOKEN is not set".into())
            })?;
            let provider = CloudflareProvider::new(
                &config.api_base,
                account_id,
                api_token,
                config.request_timeout,
            )?;
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => Ok(Arc::new(MockImageProvider::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloudflare_requires_credentials() {
        let config = AppConfig {
            account_id: Some("acct".into()),
            ..AppConfig::default()
        };
        let err = from_config(&config).err().expect("missing token must fail");
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert_eq!(err.to_string(), "CLOUDFLARE_API_TOKEN is not set");
    }

    #[test]
    fn mock_needs_no_credentials() {
        let config = AppConfig {
            provider: ProviderKind::Mock,
            ..AppConfig::default()
        };
        assert!(from_config(&config).is_ok());
    }
}
