// HTTP request handlers
use crate::application::analysis_session::AnalysisError;
use crate::application::chat_service::ChatError;
use crate::application::project_service::ProjectError;
use crate::presentation::app_state::AppState;
use crate::presentation::dto::{AnalysisViewDto, ChatRequest, ErrorBody, ProjectsRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_analysis(State(state): State<Arc<AppState>>) -> Json<AnalysisViewDto> {
    Json(state.session.view_state().into())
}

/// Analyze the uploaded image; the body is the raw image, `Content-Type` its MIME type.
pub async fn start_analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let outcome = state.session.start_analysis(body, &mime_type).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(AnalysisError::Acquisition(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Err(AnalysisError::Gateway(_)) => StatusCode::BAD_GATEWAY,
        Err(AnalysisError::Superseded) => StatusCode::CONFLICT,
    };

    let view: AnalysisViewDto = state.session.view_state().into();
    (status, Json(view)).into_response()
}

pub async fn reset_analysis(State(state): State<Arc<AppState>>) -> Json<AnalysisViewDto> {
    Json(state.session.reset().into())
}

pub async fn list_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.history().snapshot())
}

pub async fn select_history_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.session.select_history_item(&id) {
        Some(view) => Json(AnalysisViewDto::from(view)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new(format!("no history item {}", id))),
        )
            .into_response(),
    }
}

pub async fn delete_history_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.session.history().remove(&id))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session.history().clear())
}

pub async fn get_chat(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.chat.transcript())
}

pub async fn send_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.chat.send(&request.message).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e @ ChatError::EmptyMessage) => {
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response()
        }
    }
}

pub async fn suggest_projects(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProjectsRequest>,
) -> Response {
    match state.projects.suggest(&request.components).await {
        Ok(ideas) => Json(ideas).into_response(),
        Err(e @ ProjectError::EmptyComponentList) => {
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response()
        }
        Err(ProjectError::Gateway(e)) => {
            tracing::error!("Project generation failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(ErrorBody::new(e.user_message()))).into_response()
        }
    }
}
