use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::application::services::CreateChatRequest;
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::ChatSummaryDto;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatBody {
    pub blob_pathname: Option<String>,
    pub extracted_text: Option<String>,
    pub original_file_name: Option<String>,
    pub initial_user_message: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, body), fields(user_id = %user.0.as_uuid()))]
pub async fn create_chat_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateChatBody>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    // Every new chat starts from a document.
    let (blob_pathname, extracted_text) = match (body.blob_pathname, body.extracted_text) {
        (Some(blob), Some(text)) if !blob.trim().is_empty() => (blob, text),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "A document (blobPathname and extractedText) is required to create a new chat".to_string(),
                }),
            )
                .into_response();
        }
    };

    let request = CreateChatRequest {
        blob_pathname,
        extracted_text,
        original_file_name: body.original_file_name,
        initial_user_message: body.initial_user_message,
    };

    match state.chat_service.create_chat(user.0, request).await {
        Ok(chat) => (StatusCode::CREATED, Json(ChatSummaryDto::from(&chat))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Chat creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create chat".to_string(),
                }),
            )
                .into_response()
        }
    }
}
