use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error("Error generating image: {0}")]
    MalformedBody(String),
    #[error("Error generating image: {0}")]
    Provider(#[from] ProviderError),
    #[error("Not Found")]
    NotFound,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingPrompt => StatusCode::BAD_REQUEST,
            GatewayError::MalformedBody(_) | GatewayError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let GatewayError::Provider(ref err) = self {
            tracing::warn!(error = %err, "image generation failed");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_keep_the_message_verbatim() {
        let err = GatewayError::from(ProviderError::Network("quota exceeded".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error generating image: quota exceeded");
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(GatewayError::MissingPrompt.to_string(), "Prompt is required");
        assert_eq!(GatewayError::NotFound.to_string(), "Not Found");
        assert_eq!(GatewayError::NotFound.status(), StatusCode::NOT_FOUND);
    }
}
