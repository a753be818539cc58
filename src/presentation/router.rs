// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_history, delete_history_item, get_analysis, get_chat, health_check, list_history,
    reset_analysis, select_history_item, send_chat, start_analysis, suggest_projects,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/analysis", get(get_analysis).post(start_analysis))
        .route("/analysis/reset", post(reset_analysis))
        .route("/history", get(list_history).delete(clear_history))
        .route("/history/:id", delete(delete_history_item))
        .route("/history/:id/select", post(select_history_item))
        .route("/chat", get(get_chat).post(send_chat))
        .route("/projects", post(suggest_projects))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analysis_session::AnalysisSession;
    use crate::application::chat_service::ChatService;
    use crate::application::history_store::{DEFAULT_HISTORY_KEY, HistoryStore};
    use crate::application::project_service::ProjectService;
    use crate::application::test_support::{AnalyzeOutcome, ScriptedGateway, history_item};
    use crate::application::analysis_gateway::{AnalysisGateway, GatewayError};
    use crate::infrastructure::memory_storage::InMemoryStorage;
    use serde_json::{Value, json};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

    struct TestServer {
        base: String,
        history: Arc<HistoryStore>,
        client: reqwest::Client,
    }

    impl TestServer {
        async fn start(gateway: ScriptedGateway, max_upload_bytes: usize) -> Self {
            let gateway: Arc<dyn AnalysisGateway> = Arc::new(gateway);
            let history = Arc::new(HistoryStore::open(
                Arc::new(InMemoryStorage::new()),
                DEFAULT_HISTORY_KEY,
            ));
            let state = Arc::new(AppState {
                session: Arc::new(AnalysisSession::new(gateway.clone(), history.clone())),
                chat: Arc::new(ChatService::new(gateway.clone())),
                projects: ProjectService::new(gateway),
            });

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let router = build_router(state, max_upload_bytes);
            tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

            Self {
                base: format!("http://{}", addr),
                history,
                client: reqwest::Client::new(),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn upload(&self, bytes: &'static [u8], mime_type: &str) -> (u16, Value) {
            let response = self
                .client
                .post(self.url("/analysis"))
                .header("content-type", mime_type)
                .body(bytes)
                .send()
                .await
                .unwrap();
            let status = response.status().as_u16();
            (status, response.json().await.unwrap())
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = TestServer::start(ScriptedGateway::new(), 1024).await;
        let body = reqwest::get(server.url("/healthz")).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_analysis_round_trip_and_history() {
        let server = TestServer::start(ScriptedGateway::new(), 1024).await;

        let (status, view) = server.upload(PNG, "image/png").await;
        assert_eq!(status, 200);
        assert_eq!(view["isLoading"], false);
        assert_eq!(view["result"]["damageAssessment"]["conditionGrade"], "B");
        assert_eq!(view["valuationEstimate"], json!({ "min": 60, "max": 120 }));

        let history: Value = server
            .client
            .get(server.url("/history"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["imageData"], "data:image/png;base64,iVBORw==");

        let reset: Value = server
            .client
            .post(server.url("/analysis/reset"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(reset["result"].is_null());
        assert!(reset["imagePreview"].is_null());
    }

    #[tokio::test]
    async fn test_rejected_upload_and_gateway_failure_statuses() {
        let gateway = ScriptedGateway::new().with_analysis(AnalyzeOutcome::Fail(GatewayError::EmptyResponse));
        let server = TestServer::start(gateway, 1024).await;

        let (status, view) = server.upload(b"%PDF", "application/pdf").await;
        assert_eq!(status, 422);
        assert_eq!(view["error"], "Error processing image file.");

        let (status, view) = server.upload(PNG, "image/png").await;
        assert_eq!(status, 502);
        assert!(view["result"].is_null());
        assert!(!view["error"].as_str().unwrap().is_empty());
        assert!(server.history.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_refused() {
        static BIG: [u8; 4096] = [0u8; 4096];
        let server = TestServer::start(ScriptedGateway::new(), 1024).await;

        let response = server
            .client
            .post(server.url("/analysis"))
            .header("content-type", "image/png")
            .body(&BIG[..])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 413);
        assert!(server.history.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_history_select_delete_clear() {
        let server = TestServer::start(ScriptedGateway::new(), 1024).await;
        server.history.add(history_item(1));
        server.history.add(history_item(2));

        let response = server
            .client
            .post(server.url("/history/1/select"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let view: Value = response.json().await.unwrap();
        assert_eq!(view["imagePreview"], "data:image/png;base64,1");
        assert_eq!(server.history.snapshot().len(), 2);

        let response = server
            .client
            .post(server.url("/history/404/select"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        let remaining: Value = server
            .client
            .delete(server.url("/history/2"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(remaining.as_array().unwrap().len(), 1);

        let cleared: Value = server
            .client
            .delete(server.url("/history"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(cleared, json!([]));
    }

    #[tokio::test]
    async fn test_chat_and_projects() {
        let server = TestServer::start(ScriptedGateway::new(), 1024).await;

        let reply: Value = server
            .client
            .post(server.url("/chat"))
            .json(&json!({ "message": "hi" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reply["role"], "model");
        assert_eq!(reply["text"], "echo: hi");

        let transcript: Value = server
            .client
            .get(server.url("/chat"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(transcript.as_array().unwrap().len(), 3);

        let response = server
            .client
            .post(server.url("/projects"))
            .json(&json!({ "components": "  " }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        let ideas: Value = server
            .client
            .post(server.url("/projects"))
            .json(&json!({ "components": "LM7805, LEDs" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ideas[0]["difficulty"], "Beginner");
        assert_eq!(ideas[0]["missingComponents"], json!(["5mm LED"]));
    }
}
