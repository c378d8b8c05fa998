mod http_pdf_renderer;

pub use http_pdf_renderer::HttpPdfRenderer;
