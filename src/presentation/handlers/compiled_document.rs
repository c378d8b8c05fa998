use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::application::services::{AccessError, ChatServiceError, DownloadError};
use crate::domain::ChatId;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::CompiledDocumentDto;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state), fields(user_id = %user.0.as_uuid(), chat_id = %chat_id))]
pub async fn compiled_document_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    let chat_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .chat_service
        .get_compiled_document(user.0, chat_id)
        .await
    {
        Ok(document) => {
            (StatusCode::OK, Json(CompiledDocumentDto::from(&document))).into_response()
        }
        Err(ChatServiceError::Access(AccessError::ChatNotFound(_)))
        | Err(ChatServiceError::CompiledDocumentNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Compiled document not found".to_string(),
            }),
        )
            .into_response(),
        Err(ChatServiceError::Access(AccessError::Forbidden)) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "You do not have permission to access this document".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch compiled document");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch compiled document".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state), fields(user_id = %user.0.as_uuid(), chat_id = %chat_id))]
pub async fn download_compiled_document_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    let chat_id = match parse_chat_id(&chat_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.download_service.assemble_bundle(chat_id, user.0).await {
        Ok(bundle) => {
            let headers = [
                (header::CONTENT_TYPE, bundle.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", bundle.file_name),
                ),
            ];
            (StatusCode::OK, headers, bundle.buffer).into_response()
        }
        Err(DownloadError::Access(AccessError::ChatNotFound(_)))
        | Err(DownloadError::CompiledDocumentNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Compiled document not found".to_string(),
            }),
        )
            .into_response(),
        Err(DownloadError::Access(AccessError::Forbidden)) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "You do not have permission to download this document".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Compiled document download failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate compiled document".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn parse_chat_id(raw: &str) -> Result<ChatId, axum::response::Response> {
    Uuid::parse_str(raw).map(ChatId::from_uuid).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid chat ID: {}", raw),
            }),
        )
            .into_response()
    })
}
