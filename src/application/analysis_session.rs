// Analysis session - Drives one image through the gateway and owns the view state
use crate::application::analysis_gateway::{AnalysisGateway, GatewayError};
use crate::application::history_store::HistoryStore;
use crate::domain::analysis::AnalysisResult;
use crate::domain::history::HistoryItem;
use crate::domain::image::{AcquisitionError, ImageUpload};
use crate::domain::session::AnalysisViewState;
use bytes::Bytes;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub const ACQUISITION_FAILED_MESSAGE: &str = "Error processing image file.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image could not be read: {0}")]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("analysis was superseded before it completed")]
    Superseded,
}

struct SessionInner {
    state: AnalysisViewState,
    /// Bumped by every transition a user initiates; completions carrying an
    /// older value are dropped.
    generation: u64,
    last_issued_ms: i64,
}

impl SessionInner {
    fn begin(&mut self, state: AnalysisViewState) -> u64 {
        self.generation += 1;
        self.state = state;
        self.generation
    }

    /// Strictly increasing creation time, so history ids never collide.
    fn next_timestamp(&mut self, now_ms: i64) -> i64 {
        let timestamp = now_ms.max(self.last_issued_ms + 1);
        self.last_issued_ms = timestamp;
        timestamp
    }
}

/// State shared between the session handle and its in-flight analyses.
struct SessionCore {
    history: Arc<HistoryStore>,
    inner: Mutex<SessionInner>,
}

impl SessionCore {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a gateway outcome if `generation` is still current.
    ///
    /// A success is recorded in memory together with the Succeeded
    /// transition; the caller persists it afterwards.
    fn settle(
        &self,
        generation: u64,
        preview: String,
        outcome: Result<AnalysisResult, GatewayError>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                "Discarding completion of analysis {} (current is {})",
                generation,
                inner.generation
            );
            return Err(AnalysisError::Superseded);
        }

        match outcome {
            Ok(result) => {
                let timestamp = inner.next_timestamp(chrono::Utc::now().timestamp_millis());
                let item = HistoryItem::new(timestamp, result.clone(), preview.clone());
                let history_len = self.history.record(item).len();
                inner.state = AnalysisViewState::succeeded(result.clone(), Some(preview));
                tracing::info!(
                    "Analysis {} succeeded: grade {}, {} components, {} items in history",
                    generation,
                    result.grade().as_str(),
                    result.components.len(),
                    history_len
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Analysis {} failed: {}", generation, e);
                inner.state = AnalysisViewState::failed(e.user_message(), Some(preview));
                Err(e.into())
            }
        }
    }
}

/// Gateway call plus settlement, run on its own task so the session settles
/// even when the caller stops waiting.
async fn run_analysis(
    core: Arc<SessionCore>,
    gateway: Arc<dyn AnalysisGateway>,
    generation: u64,
    upload: ImageUpload,
    preview: String,
) -> Result<AnalysisResult, AnalysisError> {
    // Separate task so a panicking gateway still settles the session.
    let ImageUpload { bytes, mime_type } = upload;
    let outcome = tokio::spawn(async move { gateway.analyze(&bytes, &mime_type).await })
        .await
        .unwrap_or_else(|e| Err(GatewayError::Aborted(e.to_string())));

    let settled = core.settle(generation, preview, outcome);
    if settled.is_ok() {
        let history = core.history.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || history.flush()).await {
            tracing::warn!("History flush did not complete: {}", e);
        }
    }
    settled
}

pub struct AnalysisSession {
    gateway: Arc<dyn AnalysisGateway>,
    core: Arc<SessionCore>,
}

impl AnalysisSession {
    pub fn new(gateway: Arc<dyn AnalysisGateway>, history: Arc<HistoryStore>) -> Self {
        // Ids already on disk may come from a clock ahead of this one.
        let last_issued_ms = history
            .snapshot()
            .iter()
            .map(|item| item.timestamp)
            .max()
            .unwrap_or(0);
        Self {
            gateway,
            core: Arc::new(SessionCore {
                history,
                inner: Mutex::new(SessionInner {
                    state: AnalysisViewState::idle(),
                    generation: 0,
                    last_issued_ms,
                }),
            }),
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.core.history
    }

    pub fn view_state(&self) -> AnalysisViewState {
        self.core.lock().state.clone()
    }

    /// Run one analysis to a settled state.
    ///
    /// The view goes to Loading immediately, then to Succeeded (with the
    /// result recorded in history) or Failed. If another transition happened
    /// while the gateway call was in flight the outcome is dropped and
    /// `Superseded` is returned. Dropping the returned future does not
    /// cancel the analysis.
    pub async fn start_analysis(
        &self,
        bytes: Bytes,
        mime_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let upload = match ImageUpload::new(bytes, mime_type) {
            Ok(upload) => upload,
            Err(e) => {
                tracing::warn!("Rejected image upload: {}", e);
                self.core
                    .lock()
                    .begin(AnalysisViewState::failed(ACQUISITION_FAILED_MESSAGE, None));
                return Err(e.into());
            }
        };

        let preview = upload.to_data_uri();
        let generation = self
            .core
            .lock()
            .begin(AnalysisViewState::loading(preview.clone()));
        tracing::debug!(
            "Analysis {} started ({}, {} bytes)",
            generation,
            upload.mime_type,
            upload.bytes.len()
        );

        tokio::spawn(run_analysis(
            self.core.clone(),
            self.gateway.clone(),
            generation,
            upload,
            preview,
        ))
        .await
        .unwrap_or_else(|e| Err(GatewayError::Aborted(e.to_string()).into()))
    }

    /// Show a stored result without calling the gateway or touching history.
    pub fn select_from_history(&self, item: &HistoryItem) -> AnalysisViewState {
        let state =
            AnalysisViewState::succeeded(item.result.clone(), Some(item.image_data.clone()));
        let mut inner = self.core.lock();
        inner.begin(state);
        tracing::debug!("Selected history item {}", item.id);
        inner.state.clone()
    }

    pub fn select_history_item(&self, id: &str) -> Option<AnalysisViewState> {
        let item = self.core.history.get(id)?;
        Some(self.select_from_history(&item))
    }

    pub fn reset(&self) -> AnalysisViewState {
        self.core.lock().begin(AnalysisViewState::idle());
        AnalysisViewState::idle()
    }
}
