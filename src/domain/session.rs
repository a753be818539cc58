// Analysis view state
use super::analysis::AnalysisResult;

/// Settled axis of the view state. Exactly one applies at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Succeeded(AnalysisResult),
    Failed(String),
}

/// What the front end renders for the active session.
///
/// Replaced wholesale on every transition; `image_preview` is independent
/// of the phase and survives a failure so the user can see what failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisViewState {
    pub phase: SessionPhase,
    pub image_preview: Option<String>,
}

impl AnalysisViewState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading(image_preview: String) -> Self {
        Self {
            phase: SessionPhase::Loading,
            image_preview: Some(image_preview),
        }
    }

    pub fn succeeded(result: AnalysisResult, image_preview: Option<String>) -> Self {
        Self {
            phase: SessionPhase::Succeeded(result),
            image_preview,
        }
    }

    pub fn failed(message: impl Into<String>, image_preview: Option<String>) -> Self {
        Self {
            phase: SessionPhase::Failed(message.into()),
            image_preview,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            SessionPhase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}
