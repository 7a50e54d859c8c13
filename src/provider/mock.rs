use async_trait::async_trait;
use axum::body::Bytes;
use parking_lot::Mutex;

use super::{ImageProvider, ProviderError};

/// A transparent 1x1 PNG.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64, 0x60, 0xF8, 0x5F,
    0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub model_id: String,
    pub prompt: String,
}

enum Outcome {
    Image(Bytes),
    Failure(String),
}

/// Offline provider with a fixed outcome. Every invocation is recorded.
pub struct MockImageProvider {
    outcome: Outcome,
    calls: Mutex<Vec<MockCall>>,
}

impl MockImageProvider {
    pub fn succeeding(image: impl Into<Bytes>) -> Self {
        Self {
            outcome: Outcome::Image(image.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::succeeding(Bytes::from_static(PLACEHOLDER_PNG))
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate_image(&self, model_id: &str, prompt: &str) -> Result<Bytes, ProviderError> {
        self.calls.lock().push(MockCall {
            model_id: model_id.to_string(),
            prompt: prompt.to_string(),
        });

        match &self.outcome {
            Outcome::Image(bytes) => Ok(bytes.clone()),
            Outcome::Failure(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }
}
