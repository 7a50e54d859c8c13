use std::sync::Arc;

use axum::{
    Form, Router, async_trait,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{config::AppConfig, error::GatewayError, page, provider::ImageProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn ImageProvider>,
}

pub fn build_router(config: Arc<AppConfig>, provider: Arc<dyn ImageProvider>) -> Router {
    let state = AppState { config, provider };

    // Known paths answer unknown methods with 404, not 405. `get` also
    // answers HEAD unless HEAD is routed explicitly.
    Router::new()
        .route("/", get(index).head(not_found).fallback(not_found))
        .route("/generate", post(generate).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

async fn index() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], page::INDEX_HTML)
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound
}

async fn generate(
    State(state): State<AppState>,
    PromptForm(raw): PromptForm,
) -> Result<impl IntoResponse, GatewayError> {
    let prompt = normalize_prompt(raw.as_deref()).ok_or(GatewayError::MissingPrompt)?;

    info!(model = %state.config.model_id, prompt_len = prompt.len(), "generating image");
    let image = state
        .provider
        .generate_image(&state.config.model_id, &prompt)
        .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], image))
}

/// Trimmed prompt, or `None` when absent or blank.
pub fn normalize_prompt(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// The raw `prompt` field of an urlencoded or multipart form body.
pub struct PromptForm(pub Option<String>);

#[async_trait]
impl<S> FromRequest<S> for PromptForm
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| GatewayError::MalformedBody(e.body_text()))?;
            let prompt = pairs
                .into_iter()
                .find_map(|(key, value)| (key == "prompt").then_some(value));
            return Ok(PromptForm(prompt));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| GatewayError::MalformedBody(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| GatewayError::MalformedBody(e.body_text()))?
        {
            if field.name() == Some("prompt") {
                let text = field
                    .text()
                    .await
                    .map_err(|e| GatewayError::MalformedBody(e.body_text()))?;
                return Ok(PromptForm(Some(text)));
            }
        }

        Ok(PromptForm(None))
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_prompt;

    #[test]
    fn prompt_is_trimmed() {
        assert_eq!(
            normalize_prompt(Some("  cyberpunk cat \n")),
            Some("cyberpunk cat".to_string())
        );
    }

    #[test]
    fn blank_or_missing_prompt_is_rejected() {
        assert_eq!(normalize_prompt(None), None);
        assert_eq!(normalize_prompt(Some("")), None);
        assert_eq!(normalize_prompt(Some(" \t\n ")), None);
    }
}
