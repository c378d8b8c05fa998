use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::application::services::{AccessError, ChatServiceError};
use crate::domain::ChatId;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::{ChatSummaryDto, MessageDto};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state), fields(user_id = %user.0.as_uuid()))]
pub async fn list_chats_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    match state.chat_service.list_chats(user.0).await {
        Ok(chats) => {
            let summaries: Vec<ChatSummaryDto> = chats.iter().map(ChatSummaryDto::from).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list chats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list chats".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state), fields(user_id = %user.0.as_uuid(), chat_id = %chat_id))]
pub async fn chat_messages_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
    Path(chat_id): Path<String>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    let chat_id = match Uuid::parse_str(&chat_id) {
        Ok(uuid) => ChatId::from_uuid(uuid),
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid chat ID: {}", chat_id),
                }),
            )
                .into_response();
        }
    };

    match state.chat_service.get_chat_messages(user.0, chat_id).await {
        Ok(messages) => {
            let messages: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();
            (StatusCode::OK, Json(messages)).into_response()
        }
        Err(ChatServiceError::Access(AccessError::ChatNotFound(chat_id))) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Chat not found: {}", chat_id.as_uuid()),
            }),
        )
            .into_response(),
        Err(ChatServiceError::Access(AccessError::Forbidden)) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "You do not have access to this chat".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch chat messages");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch chat messages".to_string(),
                }),
            )
                .into_response()
        }
    }
}
