use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

use crate::application::ports::{CompiledPdfPayload, PdfRenderer, PdfRendererError};

/// PDF-rendering collaborator reached over HTTP: posts the bundle payload
/// (original bytes base64-encoded) and receives the rendered PDF back.
pub struct HttpPdfRenderer {
    client: Client,
    endpoint: String,
}

impl HttpPdfRenderer {
    pub fn new(endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    #[tracing::instrument(
        skip(self, payload),
        fields(
            file_name = %payload.original_file_name,
            history_entries = payload.history_snapshot.len(),
            has_original = payload.raw_file_bytes.is_some()
        )
    )]
    async fn render_compiled_pdf(
        &self,
        payload: &CompiledPdfPayload,
    ) -> Result<Vec<u8>, PdfRendererError> {
        let body = serde_json::json!({
            "originalFileName": payload.original_file_name,
            "extractedText": payload.extracted_text,
            "chatHistory": payload.history_snapshot,
            "originalFile": payload
                .raw_file_bytes
                .as_ref()
                .map(|bytes| general_purpose::STANDARD.encode(bytes)),
            "originalFileType": payload.file_kind,
        });

        let url = format!("{}/render", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PdfRendererError::RenderFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PdfRendererError::RenderFailed(format!(
                "render returned {status}: {text}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PdfRendererError::InvalidResponse(e.to_string()))?;

        if !bytes.starts_with(b"%PDF") {
            return Err(PdfRendererError::InvalidResponse(
                "response body is not a pdf".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
