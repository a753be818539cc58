// Gemini gateway implementation
use crate::application::analysis_gateway::{AnalysisGateway, GatewayError};
use crate::domain::analysis::AnalysisResult;
use crate::domain::chat::ChatTurn;
use crate::domain::project::ProjectIdea;
use crate::infrastructure::config::GeminiSettings;
use crate::infrastructure::gemini_request::{
    GenerateContentResponse, analysis_request, chat_request, projects_request, strip_code_fence,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const CHAT_FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response at this time.";

#[derive(Debug, Deserialize)]
struct ProjectIdeasEnvelope {
    projects: Vec<ProjectIdea>,
}

#[derive(Clone)]
pub struct GeminiGateway {
    api_base: String,
    api_key: Option<String>,
    analysis_model: String,
    chat_model: String,
    client: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(settings: &GeminiSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            api_base: settings.api_base.trim().trim_end_matches('/').to_string(),
            api_key: settings
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            analysis_model: settings.analysis_model.clone(),
            chat_model: settings.chat_model.clone(),
            client,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// POST one generateContent request and return the model's text.
    async fn generate(&self, model: &str, body: &Value) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingCredentials)?;
        let url = self.endpoint_for_model(model);
        tracing::debug!("Sending generateContent request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let data = response.json::<GenerateContentResponse>().await?;
        data.text().ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl AnalysisGateway for GeminiGateway {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<AnalysisResult, GatewayError> {
        let body = analysis_request(&BASE64.encode(image), mime_type);
        let text = self.generate(&self.analysis_model, &body).await?;
        Ok(AnalysisResult::from_json(strip_code_fence(&text))?)
    }

    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, GatewayError> {
        let body = chat_request(prior_turns, message);
        match self.generate(&self.chat_model, &body).await {
            Ok(text) => Ok(text),
            Err(GatewayError::EmptyResponse) => Ok(CHAT_FALLBACK_REPLY.to_string()),
            Err(e) => Err(e),
        }
    }

    async fn suggest_projects(&self, component_list: &str) -> Result<Vec<ProjectIdea>, GatewayError> {
        let body = projects_request(component_list);
        let text = self.generate(&self.analysis_model, &body).await?;
        let envelope: ProjectIdeasEnvelope = serde_json::from_str(strip_code_fence(&text))?;
        Ok(envelope.projects)
    }
}
