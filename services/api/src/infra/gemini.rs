use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::domain::repository::RecommendationModel;
use crate::error::ApiError;

/// Gemini `generateContent` over REST.
#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl GeminiClient {
    pub fn new(http: HttpClient, api_key: String, model: String, api_url: String) -> Self {
        Self {
            http,
            api_key,
            model,
            api_url: api_url.trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
pub(crate) fn response_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.is_empty()).then_some(text)
}

impl RecommendationModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, detail, "Gemini generateContent failed");
            return Err(ApiError::Upstream(format!("Gemini returned {status}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("invalid Gemini response: {e}")))?;
        let text = response_text(parsed)
            .ok_or_else(|| ApiError::Upstream("Gemini returned no text".to_owned()))?;
        tracing::debug!(model = %self.model, chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}
