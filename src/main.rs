use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use docuchat::application::ports::{
    BlobStore, ChatRepository, CompiledDocumentRepository, MessageRepository,
};
use docuchat::application::services::{
    AccessGuard, ChatService, DocumentSyncService, DownloadService, ExtractionService,
};
use docuchat::infrastructure::extraction::AzureOcrAdapter;
use docuchat::infrastructure::llm::OpenAiClient;
use docuchat::infrastructure::observability::{init_tracing, TracingConfig};
use docuchat::infrastructure::pdf::HttpPdfRenderer;
use docuchat::infrastructure::persistence::{
    create_pool, run_migrations, PgChatRepository, PgCompiledDocumentRepository,
    PgMessageRepository,
};
use docuchat::infrastructure::storage::LocalBlobStore;
use docuchat::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.as_str().to_string(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    run_migrations(&pool).await?;

    let chats: Arc<dyn ChatRepository> = Arc::new(PgChatRepository::new(pool.clone()));
    let messages: Arc<dyn MessageRepository> = Arc::new(PgMessageRepository::new(pool.clone()));
    let compiled_documents: Arc<dyn CompiledDocumentRepository> =
        Arc::new(PgCompiledDocumentRepository::new(pool.clone()));
    let blob_store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(PathBuf::from(
        &settings.blob_storage.root_path,
    ))?);

    let access = Arc::new(AccessGuard::new(Arc::clone(&chats)));
    let sync = Arc::new(DocumentSyncService::new(
        Arc::clone(&messages),
        Arc::clone(&compiled_documents),
    ));

    let llm_client = Arc::new(OpenAiClient::new(
        settings.llm.api_key.clone(),
        settings.llm.chat_model.clone(),
        settings.llm.max_tokens,
        settings.llm.temperature,
    ));
    let extractor = Arc::new(AzureOcrAdapter::new(
        &settings.ocr.endpoint,
        &settings.ocr.api_key,
    ));
    let renderer = Arc::new(HttpPdfRenderer::new(&settings.pdf_renderer.endpoint));

    let chat_service = Arc::new(ChatService::new(
        Arc::clone(&chats),
        Arc::clone(&messages),
        Arc::clone(&compiled_documents),
        Arc::clone(&access),
        llm_client,
        sync,
    ));
    let download_service = Arc::new(DownloadService::new(
        access,
        compiled_documents,
        Arc::clone(&blob_store),
        renderer,
    ));
    let extraction_service = Arc::new(ExtractionService::new(blob_store, extractor));

    let state = AppState {
        chat_service,
        extraction_service,
        download_service,
    };

    let router = create_router(state);

    let host: IpAddr = settings.server.host.parse()?;
    let addr = SocketAddr::new(host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
