use serde::Serialize;

/// File type of an uploaded original, classified from its file-name
/// extension. Unsupported kinds travel through the download bundle as
/// metadata only and are never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Png,
    Jpeg,
    Unsupported,
}

impl FileKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => FileKind::Pdf,
            Some("png") => FileKind::Png,
            Some("jpg") | Some("jpeg") => FileKind::Jpeg,
            _ => FileKind::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Png => "png",
            FileKind::Jpeg => "jpeg",
            FileKind::Unsupported => "unsupported",
        }
    }
}
