use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{LlmClient, PdfRenderer, TextExtractor};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    chat_messages_handler, compiled_document_handler, create_chat_handler, documents_handler,
    download_compiled_document_handler, extract_text_handler, health_handler, list_chats_handler,
    send_message_handler, upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<L, X, P>(state: AppState<L, X, P>) -> Router
where
    L: LlmClient + 'static,
    X: TextExtractor + 'static,
    P: PdfRenderer + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/chat/message", post(send_message_handler::<L, X, P>))
        .route("/api/v1/chat/new", post(create_chat_handler::<L, X, P>))
        .route("/api/v1/chat/list", get(list_chats_handler::<L, X, P>))
        .route(
            "/api/v1/chat/{chat_id}/messages",
            get(chat_messages_handler::<L, X, P>),
        )
        .route(
            "/api/v1/chat/{chat_id}/compiled-document",
            get(compiled_document_handler::<L, X, P>),
        )
        .route(
            "/api/v1/chat/{chat_id}/download",
            get(download_compiled_document_handler::<L, X, P>),
        )
        .route("/api/v1/documents", get(documents_handler::<L, X, P>))
        .route("/api/v1/ocr/upload", post(upload_handler::<L, X, P>))
        .route(
            "/api/v1/ocr/extract-text",
            post(extract_text_handler::<L, X, P>),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
