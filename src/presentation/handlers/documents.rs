use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::dto::DocumentItemDto;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state), fields(user_id = %user.0.as_uuid()))]
pub async fn documents_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    user: AuthenticatedUser,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    match state.chat_service.list_documents(user.0).await {
        Ok(items) => {
            let items: Vec<DocumentItemDto> = items.iter().map(DocumentItemDto::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list documents");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list documents".to_string(),
                }),
            )
                .into_response()
        }
    }
}
