use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::domain::BlobPathname;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub blob_pathname: String,
    pub original_file_name: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let file_name = field.file_name().unwrap_or("unknown").to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    match state.extraction_service.store_upload(&file_name, data).await {
        Ok(pathname) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                blob_pathname: pathname.as_str().to_string(),
                original_file_name: file_name,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to store upload");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to store upload".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextBody {
    pub blob_pathname: String,
    pub original_file_name: String,
}

#[derive(Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

#[tracing::instrument(skip(state, body), fields(blob = %body.blob_pathname))]
pub async fn extract_text_handler<L, X, P>(
    State(state): State<AppState<L, X, P>>,
    Json(body): Json<ExtractTextBody>,
) -> impl IntoResponse
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    if body.blob_pathname.trim().is_empty() || body.original_file_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing blobPathname or originalFileName".to_string(),
            }),
        )
            .into_response();
    }

    let pathname = BlobPathname::from_raw(body.blob_pathname);
    match state
        .extraction_service
        .extract_text(&pathname, &body.original_file_name)
        .await
    {
        Ok(text) => (StatusCode::OK, Json(ExtractTextResponse { text })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Text extraction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Text extraction failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}
