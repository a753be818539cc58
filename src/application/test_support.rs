// Test doubles shared by the application and presentation tests
use crate::application::analysis_gateway::{AnalysisGateway, GatewayError};
use crate::application::key_value_storage::{KeyValueStorage, StorageError};
use crate::domain::analysis::{AnalysisResult, sample_result};
use crate::domain::chat::ChatTurn;
use crate::domain::history::HistoryItem;
use crate::domain::project::{Difficulty, ProjectIdea};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

pub fn history_item(timestamp: i64) -> HistoryItem {
    HistoryItem::new(
        timestamp,
        sample_result(),
        format!("data:image/png;base64,{timestamp}"),
    )
}

/// Storage whose every call fails.
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Err(io_error(key))
    }

    fn write(&self, key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(io_error(key))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        Err(io_error(key))
    }
}

fn io_error(key: &str) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source: std::io::Error::other("disk unplugged"),
    }
}

/// What a [`ScriptedGateway`] does on its next `analyze` call.
pub enum AnalyzeOutcome {
    Ok(AnalysisResult),
    /// Raw model output, validated like a real response
    Raw(String),
    Fail(GatewayError),
    Panic,
}

#[derive(Default)]
pub struct ScriptedGateway {
    analyze: Mutex<VecDeque<AnalyzeOutcome>>,
    chat: Mutex<VecDeque<Result<String, GatewayError>>>,
    projects: Mutex<VecDeque<Result<Vec<ProjectIdea>, GatewayError>>>,
    analyze_calls: AtomicUsize,
    pub chat_calls: Mutex<Vec<(Vec<ChatTurn>, String)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(self, outcome: AnalyzeOutcome) -> Self {
        self.analyze.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_chat(self, reply: Result<String, GatewayError>) -> Self {
        self.chat.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_projects(self, reply: Result<Vec<ProjectIdea>, GatewayError>) -> Self {
        self.projects.lock().unwrap().push_back(reply);
        self
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedGateway {
    async fn analyze(&self, _image: &[u8], _mime_type: &str) -> Result<AnalysisResult, GatewayError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.analyze.lock().unwrap().pop_front();
        match outcome {
            Some(AnalyzeOutcome::Ok(result)) => Ok(result),
            Some(AnalyzeOutcome::Raw(raw)) => Ok(AnalysisResult::from_json(&raw)?),
            Some(AnalyzeOutcome::Fail(e)) => Err(e),
            Some(AnalyzeOutcome::Panic) => panic!("gateway blew up"),
            None => Ok(sample_result()),
        }
    }

    async fn chat(&self, prior_turns: &[ChatTurn], message: &str) -> Result<String, GatewayError> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((prior_turns.to_vec(), message.to_string()));
        let reply = self.chat.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(format!("echo: {message}")))
    }

    async fn suggest_projects(&self, _component_list: &str) -> Result<Vec<ProjectIdea>, GatewayError> {
        let reply = self.projects.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(vec![sample_project()]))
    }
}

pub fn sample_project() -> ProjectIdea {
    ProjectIdea {
        title: "Bench power indicator".to_string(),
        description: "Drive a status LED from the salvaged regulator".to_string(),
        difficulty: Difficulty::Beginner,
        missing_components: vec!["5mm LED".to_string()],
    }
}

/// Gateway that holds every `analyze` call until released.
pub struct BlockingGateway {
    started: Notify,
    release: Notify,
    outcome: Mutex<Option<Result<AnalysisResult, GatewayError>>>,
}

impl BlockingGateway {
    pub fn new(outcome: Result<AnalysisResult, GatewayError>) -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            outcome: Mutex::new(Some(outcome)),
        }
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl AnalysisGateway for BlockingGateway {
    async fn analyze(&self, _image: &[u8], _mime_type: &str) -> Result<AnalysisResult, GatewayError> {
        self.started.notify_one();
        self.release.notified().await;
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(sample_result()))
    }

    async fn chat(&self, _prior_turns: &[ChatTurn], _message: &str) -> Result<String, GatewayError> {
        Err(GatewayError::EmptyResponse)
    }

    async fn suggest_projects(&self, _component_list: &str) -> Result<Vec<ProjectIdea>, GatewayError> {
        Ok(Vec::new())
    }
}
