// Chat service - Append-only assistant transcript
use crate::application::analysis_gateway::AnalysisGateway;
use crate::domain::chat::{ChatMessage, ChatRole, ChatTurn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub const GREETING: &str = "Hello! I'm the salvage assistant. Ask me about components, \
repair steps, or what you could build from the parts on your board.";

pub const APOLOGY: &str = "I couldn't reach the assistant just now. Please try again in a moment.";

#[derive(Debug, Error, PartialEq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
}

pub struct ChatService {
    gateway: Arc<dyn AnalysisGateway>,
    transcript: Mutex<Vec<ChatMessage>>,
}

impl ChatService {
    pub fn new(gateway: Arc<dyn AnalysisGateway>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            gateway,
            transcript: Mutex::new(vec![ChatMessage::new(
                "welcome",
                ChatRole::Model,
                GREETING,
                now,
            )]),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    /// Append the user's message, ask the gateway, and append its reply.
    ///
    /// Gateway failures never surface here: the apology text is appended as
    /// the model's reply instead.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let prior_turns: Vec<ChatTurn> = {
            let mut transcript = self.lock();
            let prior = transcript.iter().map(ChatMessage::to_turn).collect();
            let user_message = self.next_message(&transcript, ChatRole::User, text);
            transcript.push(user_message);
            prior
        };

        let reply = match self.gateway.chat(&prior_turns, text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                APOLOGY.to_string()
            }
        };

        let mut transcript = self.lock();
        let model_message = self.next_message(&transcript, ChatRole::Model, &reply);
        transcript.push(model_message.clone());
        Ok(model_message)
    }

    fn next_message(&self, transcript: &[ChatMessage], role: ChatRole, text: &str) -> ChatMessage {
        let now = chrono::Utc::now().timestamp_millis();
        ChatMessage::new(format!("{}-{}", now, transcript.len()), role, text, now)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
