use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::application::services::{ChatServiceError, SendMessageRequest};
use crate::application::services::AccessError;
use crate::domain::ChatId;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::SendMessageResponse;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub chat_id: Option<Uuid>,
    pub message: String,
    pub extracted_text: Option<String>,
    pub blob_pathname: Option<String>,
    pub original_file_name: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, body), fields(user_id = %user.0.as_uuid()))]
pub async fn send_message_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
    Json(body): Json<SendMessageBody>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    if body.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let request = SendMessageRequest {
        chat_id: body.chat_id.map(ChatId::from_uuid),
        message: body.message,
        extracted_text: body.extracted_text,
        blob_pathname: body.blob_pathname,
        original_file_name: body.original_file_name,
    };

    match state.chat_service.send_message(user.0, request).await {
        Ok(outcome) => (StatusCode::OK, Json(SendMessageResponse::from(&outcome))).into_response(),
        Err(ChatServiceError::DocumentRequired) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "A document is required to start a new chat".to_string(),
            }),
        )
            .into_response(),
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
            tracing::error!(error = %e, "Send message failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to process message".to_string(),
                }),
            )
                .into_response()
        }
    }
}
