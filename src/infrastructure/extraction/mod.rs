mod azure_ocr_adapter;

pub use azure_ocr_adapter::AzureOcrAdapter;
