// Application state for HTTP handlers
use crate::application::analysis_session::AnalysisSession;
use crate::application::chat_service::ChatService;
use crate::application::project_service::ProjectService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AnalysisSession>,
    pub chat: Arc<ChatService>,
    pub projects: ProjectService,
}
