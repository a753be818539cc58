// Gateway trait for the remote vision/language model
use crate::domain::analysis::AnalysisResult;
use crate::domain::chat::ChatTurn;
use crate::domain::project::ProjectIdea;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured for the analysis service")]
    MissingCredentials,
    #[error("request to the analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("analysis service returned no text")]
    EmptyResponse,
    #[error("analysis service response did not match the expected schema: {0}")]
    Validation(#[from] serde_json::Error),
    #[error("analysis task aborted: {0}")]
    Aborted(String),
}

impl GatewayError {
    /// Short, actionable text for the user. Raw details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::MissingCredentials => {
                "The analysis service is not configured. Set an API key and try again."
            }
            GatewayError::Transport(_) | GatewayError::Status { .. } => {
                "Failed to reach the analysis service. Please check your connection and try again."
            }
            GatewayError::EmptyResponse | GatewayError::Validation(_) => {
                "The analysis service returned an unexpected response. Please try again."
            }
            GatewayError::Aborted(_) => "Failed to analyze image. Please try again.",
        }
    }
}

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Analyze one board image. The returned value has been validated against the schema.
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<AnalysisResult, GatewayError>;

    /// Continue a conversation given every prior turn and the new user message
    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, GatewayError>;

    async fn suggest_projects(&self, component_list: &str) -> Result<Vec<ProjectIdea>, GatewayError>;
}
