use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ImageProvider, ProviderError};

/// Workers AI over the Cloudflare REST API.
pub struct CloudflareProvider {
    client: Client,
    api_base: String,
    account_id: String,
    api_token: String,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

impl CloudflareProvider {
    pub fn new(
        api_base: &str,
        account_id: &str,
        api_token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("http client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn run_url(&self, model_id: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.api_base, self.account_id, model_id
        )
    }
}

#[async_trait]
impl ImageProvider for CloudflareProvider {
    async fn generate_image(&self, model_id: &str, prompt: &str) -> Result<Bytes, ProviderError> {
        tracing::debug!(model = %model_id, prompt_len = prompt.len(), "running text-to-image model");

        let response = self
            .client
            .post(self.run_url(model_id))
            .bearer_auth(&self.api_token)
            .json(&RunRequest { prompt })
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(body)
    }
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let messages: Vec<&str> = envelope
            .errors
            .iter()
            .map(|e| e.message.trim())
            .filter(|m| !m.is_empty())
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_messages_are_joined() {
        let body = br#"{"success":false,"errors":[{"code":3036,"message":"quota exceeded"},{"code":1,"message":"try later"}],"result":null}"#;
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, body),
            "quota exceeded; try later"
        );
    }

    #[test]
    fn plain_bodies_and_empty_bodies() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"  upstream down \n"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, br#"{"errors":[]}"#),
            r#"{"errors":[]}"#
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, b""),
            "503 Service Unavailable"
        );
    }

    #[test]
    fn run_url_keeps_model_path() {
        let provider =
            CloudflareProvider::new("https://api.example.com/client/v4/", "acct", "token", None)
                .unwrap();
        assert_eq!(
            provider.run_url("@cf/stabilityai/stable-diffusion-xl-base-1.0"),
            "https://api.example.com/client/v4/accounts/acct/ai/run/@cf/stabilityai/stable-diffusion-xl-base-1.0"
        );
    }
}
