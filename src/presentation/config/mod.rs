mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BlobStorageSettings, DatabaseSettings, LlmSettings, LoggingSettings, OcrSettings,
    PdfRendererSettings, ServerSettings, Settings,
};
